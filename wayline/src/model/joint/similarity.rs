use super::JointError;
use wayline_core::model::record::LinkedTrip;
use wayline_core::util::geo_utils::try_haversine_meters;
use wayline_core::util::time_utils::try_minutes_between;

/// a pair of candidate trips with their four-dimensional separation:
/// origin and destination distance in meters, departure and arrival
/// offset in minutes. `distance` is the method's similarity measure,
/// lower meaning more alike.
#[derive(Clone, Debug)]
pub struct TripPair {
    pub i: usize,
    pub j: usize,
    pub deltas: [f64; 4],
    pub distance: f64,
}

/// enumerates trip pairs that could plausibly be shared: different
/// household members, complete endpoint and timestamp data, and
/// overlapping travel windows (the later departure precedes the earlier
/// arrival).
pub fn candidate_pairs(trips: &[LinkedTrip], indices: &[usize]) -> Vec<TripPair> {
    let mut pairs: Vec<TripPair> = vec![];
    for (a, i) in indices.iter().enumerate() {
        for j in indices.iter().skip(a + 1) {
            let (t1, t2) = (&trips[*i], &trips[*j]);
            if t1.person_id == t2.person_id {
                continue;
            }
            let origin_m = match try_haversine_meters(&t1.origin, &t2.origin) {
                Some(d) => d,
                None => continue,
            };
            let dest_m = match try_haversine_meters(&t1.destination, &t2.destination) {
                Some(d) => d,
                None => continue,
            };
            let depart_min = match try_minutes_between(&t1.depart_time, &t2.depart_time) {
                Some(d) => d.abs(),
                None => continue,
            };
            let arrive_min = match try_minutes_between(&t1.arrive_time, &t2.arrive_time) {
                Some(d) => d.abs(),
                None => continue,
            };
            let latest_depart = t1.depart_time.max(t2.depart_time);
            let earliest_arrive = t1.arrive_time.min(t2.arrive_time);
            if latest_depart > earliest_arrive {
                continue;
            }
            pairs.push(TripPair {
                i: *i,
                j: *j,
                deltas: [origin_m, dest_m, depart_min, arrive_min],
                distance: 0.0,
            });
        }
    }
    pairs
}

/// buffer filter: every delta must fall strictly under its threshold.
/// the retained distance is the largest threshold-normalized delta.
pub fn buffer_pairs(
    pairs: Vec<TripPair>,
    distance_meters: f64,
    time_minutes: f64,
) -> Vec<TripPair> {
    pairs
        .into_iter()
        .filter_map(|mut pair| {
            let [o, d, dep, arr] = pair.deltas;
            if o < distance_meters && d < distance_meters && dep < time_minutes && arr < time_minutes
            {
                let normalized = [
                    o / distance_meters,
                    d / distance_meters,
                    dep / time_minutes,
                    arr / time_minutes,
                ];
                pair.distance = normalized.into_iter().fold(0.0, f64::max);
                Some(pair)
            } else {
                None
            }
        })
        .collect()
}

/// mahalanobis filter: squared distance under the chi-squared quantile
/// threshold. the retained distance is the squared distance itself.
pub fn mahalanobis_pairs(
    pairs: Vec<TripPair>,
    inverse_covariance: &[[f64; 4]; 4],
    threshold: f64,
) -> Vec<TripPair> {
    pairs
        .into_iter()
        .filter_map(|mut pair| {
            let squared = mahalanobis_squared(&pair.deltas, inverse_covariance);
            if squared < threshold {
                pair.distance = squared;
                Some(pair)
            } else {
                None
            }
        })
        .collect()
}

fn mahalanobis_squared(delta: &[f64; 4], inverse: &[[f64; 4]; 4]) -> f64 {
    let mut total = 0.0;
    for (i, row) in inverse.iter().enumerate() {
        for (j, v) in row.iter().enumerate() {
            total += delta[i] * v * delta[j];
        }
    }
    total
}

/// inverts the covariance matrix by gauss-jordan elimination with
/// partial pivoting. a singular or near-singular matrix is a
/// configuration error.
pub fn invert_covariance(matrix: &[[f64; 4]; 4]) -> Result<[[f64; 4]; 4], JointError> {
    let mut a = *matrix;
    let mut inv = [[0.0; 4]; 4];
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }
    for col in 0..4 {
        let pivot_row = (col..4)
            .max_by(|r1, r2| a[*r1][col].abs().total_cmp(&a[*r2][col].abs()))
            .unwrap_or(col);
        let pivot = a[pivot_row][col];
        if pivot.abs() < 1e-12 {
            return Err(JointError::ConfigurationError(String::from(
                "covariance matrix is singular and cannot be inverted",
            )));
        }
        a.swap(col, pivot_row);
        inv.swap(col, pivot_row);
        for j in 0..4 {
            a[col][j] /= pivot;
            inv[col][j] /= pivot;
        }
        for row in 0..4 {
            if row != col {
                let factor = a[row][col];
                for j in 0..4 {
                    a[row][j] -= factor * a[col][j];
                    inv[row][j] -= factor * inv[col][j];
                }
            }
        }
    }
    Ok(inv)
}
