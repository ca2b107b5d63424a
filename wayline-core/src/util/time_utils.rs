use chrono::{DateTime, NaiveDateTime};

/// signed minutes from `a` to `b`.
pub fn minutes_between(a: &NaiveDateTime, b: &NaiveDateTime) -> f64 {
    (*b - *a).num_seconds() as f64 / 60.0
}

/// minutes between optional timestamps; None when either is missing.
pub fn try_minutes_between(a: &Option<NaiveDateTime>, b: &Option<NaiveDateTime>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(minutes_between(a, b)),
        _ => None,
    }
}

/// mean of known timestamps via epoch seconds, None if none are known.
pub fn mean_datetime(times: &[Option<NaiveDateTime>]) -> Option<NaiveDateTime> {
    let known: Vec<i64> = times
        .iter()
        .flatten()
        .map(|t| t.and_utc().timestamp())
        .collect();
    if known.is_empty() {
        return None;
    }
    let mean = known.iter().sum::<i64>() / known.len() as i64;
    DateTime::from_timestamp(mean, 0).map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 5, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_minutes_between() {
        assert_eq!(minutes_between(&at(8, 0), &at(8, 40)), 40.0);
        assert_eq!(minutes_between(&at(8, 40), &at(8, 0)), -40.0);
    }

    #[test]
    fn test_mean_datetime() {
        let mean = mean_datetime(&[Some(at(8, 0)), Some(at(8, 30)), None]).unwrap();
        assert_eq!(mean, at(8, 15));
    }
}
