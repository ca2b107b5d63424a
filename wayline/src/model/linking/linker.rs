use super::{LinkConfig, LinkingError};
use wayline_core::model::codebook::{DriverStatus, ModeType};
use wayline_core::model::record::{LinkedTrip, LinkedTripId, PersonDay, UnlinkedTrip};
use wayline_core::util::geo_utils::try_haversine_meters;
use wayline_core::util::time_utils::try_minutes_between;

/// outcome of comparing one segment against its successor.
enum LinkDecision {
    Continue,
    Break { review: bool },
}

/// merges a person-day's diary segments into journeys.
///
/// segments are scanned in temporal order. a segment whose destination
/// purpose marks a mode change is joined with its successor when the
/// transfer wait and transfer distance fall within the configured limits.
/// journeys are closed greedily, so re-linking the output is a no-op.
///
/// # Arguments
///
/// * `person_day` - one person's segments for one travel day, sorted
/// * `config` - linking thresholds and codebook values
///
/// # Returns
///
/// the person-day's journeys in temporal order, or an error
pub fn link_person_day(
    person_day: &PersonDay,
    config: &LinkConfig,
) -> Result<Vec<LinkedTrip>, LinkingError> {
    if person_day.trips.is_empty() {
        return Ok(vec![]);
    }
    let day_id = person_day.day_id;
    if person_day.trips.iter().any(|t| t.day_id != day_id) {
        return Err(LinkingError::MixedPersonDay(person_day.person_id));
    }
    // journey ids pack (person, day, seq) arithmetically; a date-coded
    // day id would spill into the person component and collide
    if day_id > LinkedTripId::MAX_DAY_ID {
        return Err(LinkingError::IdRangeError(format!(
            "day id {} for person {} exceeds {}; renumber travel days within the survey period",
            day_id,
            person_day.person_id,
            LinkedTripId::MAX_DAY_ID
        )));
    }
    if person_day.trips.len() as u64 > LinkedTripId::MAX_SEQUENCE {
        return Err(LinkingError::IdRangeError(format!(
            "person {} day {} reports {} segments, more than the {} journeys a day can hold",
            person_day.person_id,
            day_id,
            person_day.trips.len(),
            LinkedTripId::MAX_SEQUENCE
        )));
    }

    let mut journeys: Vec<LinkedTrip> = vec![];
    let mut current: Vec<&UnlinkedTrip> = vec![];
    let mut review = false;

    for segment in person_day.trips.iter() {
        if let Some(prev) = current.last() {
            match decide(prev, segment, config) {
                LinkDecision::Continue => {}
                LinkDecision::Break { review: r } => {
                    let seq = journeys.len() as u64 + 1;
                    journeys.push(aggregate(day_id, seq, &current, review || r, config));
                    current.clear();
                    review = r;
                }
            }
        }
        current.push(segment);
    }
    let seq = journeys.len() as u64 + 1;
    journeys.push(aggregate(day_id, seq, &current, review, config));

    Ok(journeys)
}

/// a segment links to its successor when it ended in a mode change, the
/// transfer wait is within the dwell limit, and the successor departs
/// within the buffer distance. segments with missing coordinates or
/// timestamps cannot be checked and force a break; if a link was
/// expected, the break is flagged for review.
fn decide(prev: &UnlinkedTrip, next: &UnlinkedTrip, config: &LinkConfig) -> LinkDecision {
    if prev.d_purpose != config.change_mode_purpose {
        return LinkDecision::Break { review: false };
    }
    if !prev.is_checkable() || !next.is_checkable() {
        return LinkDecision::Break { review: true };
    }
    let dwell = match try_minutes_between(&prev.arrive_time, &next.depart_time) {
        Some(minutes) => minutes,
        None => return LinkDecision::Break { review: true },
    };
    if dwell > config.max_dwell_minutes {
        return LinkDecision::Break { review: false };
    }
    let gap_meters = match try_haversine_meters(&prev.destination, &next.origin) {
        Some(meters) => meters,
        None => return LinkDecision::Break { review: true },
    };
    if gap_meters > config.buffer_distance_meters {
        return LinkDecision::Break { review: false };
    }
    LinkDecision::Continue
}

/// collapses a run of segments into one journey record.
fn aggregate(
    day_id: u64,
    seq: u64,
    segments: &[&UnlinkedTrip],
    needs_review: bool,
    config: &LinkConfig,
) -> LinkedTrip {
    let first = segments[0];
    let last = segments[segments.len() - 1];

    let mode_type = journey_mode(segments, config);
    let (access_mode, egress_mode) = access_egress(segments, config);
    let driver = journey_driver(segments);
    let num_travelers = segments.iter().map(|s| s.num_travelers).max().unwrap_or(1);
    let distance_meters: f64 = segments.iter().filter_map(|s| s.distance_meters).sum();
    let travel_duration_minutes: f64 = segments
        .iter()
        .map(|s| {
            s.duration_minutes
                .or_else(|| try_minutes_between(&s.depart_time, &s.arrive_time))
                .unwrap_or(0.0)
        })
        .sum();
    let total_duration_minutes = try_minutes_between(&first.depart_time, &last.arrive_time)
        .unwrap_or(travel_duration_minutes);
    let dwell_duration_minutes = total_duration_minutes - travel_duration_minutes;

    LinkedTrip {
        linked_trip_id: LinkedTripId::new(first.person_id, day_id, seq),
        person_id: first.person_id,
        hh_id: first.hh_id,
        day_id,
        segment_trip_ids: segments.iter().map(|s| s.trip_id).collect(),
        origin: first.origin,
        destination: last.destination,
        o_purpose: first.o_purpose,
        d_purpose: last.d_purpose,
        depart_time: first.depart_time,
        arrive_time: last.arrive_time,
        mode_type,
        access_mode,
        egress_mode,
        driver,
        num_travelers,
        distance_meters,
        travel_duration_minutes,
        total_duration_minutes,
        dwell_duration_minutes,
        needs_review,
        tour_id: None,
        subtour_id: None,
        half_tour: None,
        joint_trip_id: None,
    }
}

/// the journey mode is the first transit segment's mode when any segment
/// is transit, otherwise the mode of the segment covering the greatest
/// distance (earliest segment on ties).
fn journey_mode(segments: &[&UnlinkedTrip], config: &LinkConfig) -> ModeType {
    if let Some(transit) = segments.iter().find(|s| config.is_transit(&s.mode_type)) {
        return transit.mode_type;
    }
    let mut best = segments[0];
    let mut best_distance = best.distance_meters.unwrap_or(0.0);
    for segment in segments.iter().skip(1) {
        let distance = segment.distance_meters.unwrap_or(0.0);
        if distance > best_distance {
            best = segment;
            best_distance = distance;
        }
    }
    best.mode_type
}

/// access and egress modes are only meaningful for transit journeys: the
/// first and last non-transit segment modes, when present.
fn access_egress(
    segments: &[&UnlinkedTrip],
    config: &LinkConfig,
) -> (Option<ModeType>, Option<ModeType>) {
    if !segments.iter().any(|s| config.is_transit(&s.mode_type)) {
        return (None, None);
    }
    let access = segments
        .iter()
        .find(|s| !config.is_transit(&s.mode_type))
        .map(|s| s.mode_type);
    let egress = segments
        .iter()
        .rev()
        .find(|s| !config.is_transit(&s.mode_type))
        .map(|s| s.mode_type);
    (access, egress)
}

fn journey_driver(segments: &[&UnlinkedTrip]) -> DriverStatus {
    let any_driver = segments.iter().any(|s| {
        matches!(s.driver, DriverStatus::Driver) || matches!(s.driver, DriverStatus::Both)
    });
    let any_passenger = segments.iter().any(|s| {
        matches!(s.driver, DriverStatus::Passenger) || matches!(s.driver, DriverStatus::Both)
    });
    match (any_driver, any_passenger) {
        (true, true) => DriverStatus::Both,
        (true, false) => DriverStatus::Driver,
        (false, true) => DriverStatus::Passenger,
        (false, false) => DriverStatus::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use geo::Point;
    use wayline_core::model::codebook::PurposeCategory;

    fn dt(s: &str) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
    }

    fn segment(
        trip_id: u64,
        depart: &str,
        arrive: &str,
        d_purpose: PurposeCategory,
        mode_type: ModeType,
        destination: (f64, f64),
        next_origin: (f64, f64),
    ) -> UnlinkedTrip {
        UnlinkedTrip {
            trip_id,
            person_id: 1,
            hh_id: 1,
            day_id: 11,
            origin: Some(Point::new(next_origin.0, next_origin.1)),
            destination: Some(Point::new(destination.0, destination.1)),
            o_purpose: PurposeCategory::Home,
            d_purpose,
            depart_time: dt(depart),
            arrive_time: dt(arrive),
            mode_type,
            driver: DriverStatus::Missing,
            num_travelers: 1,
            distance_meters: Some(1000.0),
            duration_minutes: None,
        }
    }

    fn person_day(trips: Vec<UnlinkedTrip>) -> PersonDay {
        PersonDay {
            person_id: 1,
            day_id: 11,
            trips,
        }
    }

    #[test]
    fn test_links_across_mode_change() {
        // walk leg ends at a transfer point; bus leg boards 50m away
        // two minutes later. one journey spanning both should result.
        let a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:10",
            PurposeCategory::ChangeMode,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        let mut b = segment(
            102,
            "2023-05-01 08:12",
            "2023-05-01 08:40",
            PurposeCategory::Work,
            ModeType::Transit,
            (-104.95, 39.76),
            (-104.98, 39.75),
        );
        // ~50m north of the walk leg's destination
        b.origin = Some(Point::new(-104.98, 39.75045));

        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![a, b]), &config).unwrap();

        assert_eq!(result.len(), 1);
        let journey = &result[0];
        assert_eq!(journey.segment_trip_ids, vec![101, 102]);
        assert_eq!(journey.depart_time, dt("2023-05-01 08:00"));
        assert_eq!(journey.arrive_time, dt("2023-05-01 08:40"));
        assert_eq!(journey.total_duration_minutes, 40.0);
        assert_eq!(journey.d_purpose, PurposeCategory::Work);
        assert_eq!(journey.mode_type, ModeType::Transit);
        assert_eq!(journey.access_mode, Some(ModeType::Walk));
        assert!(!journey.needs_review);
    }

    #[test]
    fn test_break_on_activity_purpose() {
        let a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:10",
            PurposeCategory::Shop,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        let b = segment(
            102,
            "2023-05-01 08:12",
            "2023-05-01 08:40",
            PurposeCategory::Home,
            ModeType::Walk,
            (-104.99, 39.74),
            (-104.98, 39.75),
        );
        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![a, b]), &config).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].linked_trip_id, LinkedTripId::new(1, 11, 1));
        assert_eq!(result[1].linked_trip_id, LinkedTripId::new(1, 11, 2));
    }

    #[test]
    fn test_break_on_excessive_dwell() {
        let a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:10",
            PurposeCategory::ChangeMode,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        let mut b = segment(
            102,
            "2023-05-01 10:15",
            "2023-05-01 10:40",
            PurposeCategory::Work,
            ModeType::Transit,
            (-104.95, 39.76),
            (-104.98, 39.75),
        );
        b.origin = Some(Point::new(-104.98, 39.75));
        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![a, b]), &config).unwrap();
        // 125 minute wait exceeds the 120 minute default
        assert_eq!(result.len(), 2);
        assert!(!result[0].needs_review);
    }

    #[test]
    fn test_break_on_distance() {
        let a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:10",
            PurposeCategory::ChangeMode,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        let mut b = segment(
            102,
            "2023-05-01 08:12",
            "2023-05-01 08:40",
            PurposeCategory::Work,
            ModeType::Transit,
            (-104.95, 39.76),
            (-104.98, 39.75),
        );
        // ~550m away, well past the 100m buffer
        b.origin = Some(Point::new(-104.98, 39.755));
        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![a, b]), &config).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_missing_coordinates_force_break_with_review() {
        let a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:10",
            PurposeCategory::ChangeMode,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        let mut b = segment(
            102,
            "2023-05-01 08:12",
            "2023-05-01 08:40",
            PurposeCategory::Work,
            ModeType::Transit,
            (-104.95, 39.76),
            (-104.98, 39.75),
        );
        b.origin = None;
        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![a, b]), &config).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result[0].needs_review);
        assert!(result[1].needs_review);
    }

    #[test]
    fn test_mode_from_longest_distance_segment() {
        let mut a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:05",
            PurposeCategory::ChangeMode,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        a.distance_meters = Some(400.0);
        let mut b = segment(
            102,
            "2023-05-01 08:06",
            "2023-05-01 08:30",
            PurposeCategory::Work,
            ModeType::Car,
            (-104.90, 39.76),
            (-104.98, 39.75),
        );
        b.distance_meters = Some(8000.0);
        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![a, b]), &config).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].mode_type, ModeType::Car);
        assert_eq!(result[0].access_mode, None);
        assert_eq!(result[0].distance_meters, 8400.0);
    }

    #[test]
    fn test_linking_is_idempotent_shape() {
        // closing journeys greedily means a journey never ends on a
        // linkable boundary, so a second pass could not merge further.
        let a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:10",
            PurposeCategory::ChangeMode,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        let mut b = segment(
            102,
            "2023-05-01 08:12",
            "2023-05-01 08:40",
            PurposeCategory::ChangeMode,
            ModeType::Transit,
            (-104.95, 39.76),
            (-104.98, 39.75),
        );
        b.origin = Some(Point::new(-104.98, 39.75));
        let mut c = segment(
            103,
            "2023-05-01 08:43",
            "2023-05-01 08:55",
            PurposeCategory::Work,
            ModeType::Walk,
            (-104.94, 39.76),
            (-104.95, 39.76),
        );
        c.origin = Some(Point::new(-104.95, 39.76));
        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![a, b, c]), &config).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].num_segments(), 3);
        for journey in result.iter() {
            assert_ne!(journey.d_purpose, config.change_mode_purpose);
        }
    }

    #[test]
    fn test_date_coded_day_id_rejected() {
        // a date-coded day number would spill past the id packing's
        // day stride and collide across persons
        let mut a = segment(
            101,
            "2023-05-01 08:00",
            "2023-05-01 08:10",
            PurposeCategory::Shop,
            ModeType::Walk,
            (-104.98, 39.75),
            (-104.99, 39.74),
        );
        a.day_id = 20230501;
        let day = PersonDay {
            person_id: 1,
            day_id: 20230501,
            trips: vec![a],
        };
        let result = link_person_day(&day, &LinkConfig::default());
        assert!(matches!(result, Err(LinkingError::IdRangeError(_))));
    }

    #[test]
    fn test_empty_person_day() {
        let config = LinkConfig::default();
        let result = link_person_day(&person_day(vec![]), &config).unwrap();
        assert!(result.is_empty());
    }
}
