use geo::{Distance, Haversine, Point};

/// great-circle distance between two points in meters.
pub fn haversine_meters(a: &Point<f64>, b: &Point<f64>) -> f64 {
    Haversine.distance(*a, *b)
}

/// distance when both endpoints are known; None marks the pair as
/// uncheckable rather than zero-distance.
pub fn try_haversine_meters(a: &Option<Point<f64>>, b: &Option<Point<f64>>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(haversine_meters(a, b)),
        _ => None,
    }
}

/// arithmetic mean of known points, None if none are known. used for
/// joint trip representative coordinates.
pub fn mean_point(points: &[Option<Point<f64>>]) -> Option<Point<f64>> {
    let known: Vec<&Point<f64>> = points.iter().flatten().collect();
    if known.is_empty() {
        return None;
    }
    let n = known.len() as f64;
    let x = known.iter().map(|p| p.x()).sum::<f64>() / n;
    let y = known.iter().map(|p| p.y()).sum::<f64>() / n;
    Some(Point::new(x, y))
}

/// exact coordinate equality, used for collapsing repeated place records
/// at a work anchor. survey place records repeat geocodes verbatim, so
/// bitwise equality is the intended match.
pub fn same_coordinates(a: &Option<Point<f64>>, b: &Option<Point<f64>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.x() == b.x() && a.y() == b.y(),
        _ => false,
    }
}
