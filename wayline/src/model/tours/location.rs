use super::TourConfig;
use geo::Point;
use wayline_core::model::codebook::LocationType;
use wayline_core::model::record::{LinkedTrip, PersonAnchors};
use wayline_core::util::geo_utils::haversine_meters;

/// classifies a point against a person's reported anchors. the nearest
/// anchor within its match radius wins; when two anchors tie exactly,
/// the higher-priority location type is kept.
pub fn classify_point(
    point: &Option<Point<f64>>,
    anchors: &PersonAnchors,
    config: &TourConfig,
) -> LocationType {
    let point = match point {
        Some(p) => p,
        None => return LocationType::Other,
    };
    let candidates = [
        (LocationType::Home, &anchors.home, config.home_buffer_meters),
        (LocationType::Work, &anchors.work, config.work_buffer_meters),
        (
            LocationType::School,
            &anchors.school,
            config.school_buffer_meters,
        ),
    ];
    let mut best: Option<(LocationType, f64)> = None;
    for (location_type, anchor, buffer) in candidates {
        if let Some(anchor) = anchor {
            let distance = haversine_meters(point, anchor);
            if distance <= buffer {
                let closer = match best {
                    Some((_, best_distance)) => distance < best_distance,
                    None => true,
                };
                if closer {
                    best = Some((location_type, distance));
                }
            }
        }
    }
    match best {
        Some((location_type, _)) => location_type,
        None => LocationType::Other,
    }
}

/// classifies both endpoints of each journey in a person-day.
pub fn classify_endpoints(
    trips: &[LinkedTrip],
    anchors: &PersonAnchors,
    config: &TourConfig,
) -> Vec<(LocationType, LocationType)> {
    trips
        .iter()
        .map(|t| {
            (
                classify_point(&t.origin, anchors, config),
                classify_point(&t.destination, anchors, config),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors() -> PersonAnchors {
        PersonAnchors {
            home: Some(Point::new(-104.99, 39.70)),
            work: Some(Point::new(-104.95, 39.75)),
            school: None,
        }
    }

    #[test]
    fn test_point_near_home() {
        let config = TourConfig::default();
        // ~55m north of home, inside the 100m radius
        let point = Some(Point::new(-104.99, 39.7005));
        assert_eq!(
            classify_point(&point, &anchors(), &config),
            LocationType::Home
        );
    }

    #[test]
    fn test_point_outside_all_radii() {
        let config = TourConfig::default();
        // ~550m from home, nowhere near work
        let point = Some(Point::new(-104.99, 39.705));
        assert_eq!(
            classify_point(&point, &anchors(), &config),
            LocationType::Other
        );
    }

    #[test]
    fn test_missing_point_is_other() {
        let config = TourConfig::default();
        assert_eq!(
            classify_point(&None, &anchors(), &config),
            LocationType::Other
        );
    }

    #[test]
    fn test_nearest_anchor_wins_when_radii_overlap() {
        let config = TourConfig::default();
        let overlapping = PersonAnchors {
            home: Some(Point::new(-104.99, 39.70)),
            // work reported ~110m north of home; their radii overlap
            work: Some(Point::new(-104.99, 39.701)),
            school: None,
        };
        // ~33m from home, ~77m from work
        let point = Some(Point::new(-104.99, 39.7003));
        assert_eq!(
            classify_point(&point, &overlapping, &config),
            LocationType::Home
        );
        // ~89m from home, ~22m from work
        let point = Some(Point::new(-104.99, 39.7008));
        assert_eq!(
            classify_point(&point, &overlapping, &config),
            LocationType::Work
        );
    }

    #[test]
    fn test_missing_anchor_never_matches() {
        let config = TourConfig::default();
        let no_anchors = PersonAnchors::default();
        let point = Some(Point::new(-104.99, 39.70));
        assert_eq!(
            classify_point(&point, &no_anchors, &config),
            LocationType::Other
        );
    }
}
