use super::{PipelineConfig, PipelineError};
use crate::model::joint::detect_household_day;
use crate::model::linking::link_person_day;
use crate::model::tours::{build_person_day_tours, ScoreTable};
use kdam::{Bar, BarExt};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wayline_core::model::record::{
    HouseholdDay, JointTrip, LinkedTrip, PersonAnchors, Tour, UnlinkedTrip,
};

/// the concatenated outputs of a reconstruction run.
pub struct BatchOutput {
    pub linked_trips: Vec<LinkedTrip>,
    pub tours: Vec<Tour>,
    pub joint_trips: Vec<JointTrip>,
    /// household-days dropped after a processing failure
    pub failed_units: usize,
}

struct UnitOutput {
    linked_trips: Vec<LinkedTrip>,
    tours: Vec<Tour>,
    joint_trips: Vec<JointTrip>,
}

/// runs the full reconstruction over a batch of diary segments.
///
/// segments are partitioned into household-days, each processed in
/// isolation: linking per person-day, then tour construction per
/// person-day, then joint trip detection across the household. a
/// failure in one household-day is logged and excluded without
/// aborting the batch.
pub fn run_batch(
    trips: Vec<UnlinkedTrip>,
    anchors: &HashMap<u64, PersonAnchors>,
    config: &PipelineConfig,
) -> Result<BatchOutput, PipelineError> {
    config.validate()?;
    let score_table = config.tours.score_table()?;

    let units = HouseholdDay::partition(trips);
    log::info!("processing {} household-days", units.len());

    let bar = Arc::new(Mutex::new(
        Bar::builder()
            .total(units.len())
            .desc("household-days")
            .build()
            .map_err(PipelineError::InternalError)?,
    ));

    let process = |unit: HouseholdDay| -> (u64, u64, Result<UnitOutput, PipelineError>) {
        let (hh_id, day_id) = (unit.hh_id, unit.day_id);
        let result = process_unit(unit, anchors, &score_table, config);
        if let Ok(mut b) = bar.clone().lock() {
            let _ = b.update(1);
        }
        (hh_id, day_id, result)
    };

    let results: Vec<(u64, u64, Result<UnitOutput, PipelineError>)> = if config.parallelize {
        units.into_par_iter().map(process).collect()
    } else {
        units.into_iter().map(process).collect()
    };

    let mut output = BatchOutput {
        linked_trips: vec![],
        tours: vec![],
        joint_trips: vec![],
        failed_units: 0,
    };
    for (hh_id, day_id, result) in results {
        match result {
            Ok(unit) => {
                output.linked_trips.extend(unit.linked_trips);
                output.tours.extend(unit.tours);
                output.joint_trips.extend(unit.joint_trips);
            }
            Err(e) => {
                log::warn!("household {} day {} failed and was excluded: {}", hh_id, day_id, e);
                output.failed_units += 1;
            }
        }
    }
    if output.failed_units > 0 {
        log::warn!(
            "{} household-days excluded due to processing failures",
            output.failed_units
        );
    }
    Ok(output)
}

fn process_unit(
    unit: HouseholdDay,
    anchors: &HashMap<u64, PersonAnchors>,
    score_table: &ScoreTable,
    config: &PipelineConfig,
) -> Result<UnitOutput, PipelineError> {
    let default_anchors = PersonAnchors::default();
    let mut linked_trips: Vec<LinkedTrip> = vec![];
    let mut tours: Vec<Tour> = vec![];

    for person_day in unit.person_days.iter() {
        let start = linked_trips.len();
        linked_trips.extend(link_person_day(person_day, &config.linking)?);
        let person_anchors = anchors
            .get(&person_day.person_id)
            .unwrap_or(&default_anchors);
        tours.extend(build_person_day_tours(
            &mut linked_trips[start..],
            person_anchors,
            score_table,
            &config.tours,
        )?);
    }

    if config.tours.drop_invalid_tours {
        let before = tours.len();
        tours.retain(|t| t.valid);
        if tours.len() < before {
            log::debug!(
                "household {} day {} dropped {} invalid tours",
                unit.hh_id,
                unit.day_id,
                before - tours.len()
            );
        }
    }

    let joint_trips = detect_household_day(&mut linked_trips, &config.joint)?;

    Ok(UnitOutput {
        linked_trips,
        tours,
        joint_trips,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use geo::Point;
    use wayline_core::model::codebook::{DriverStatus, ModeType, PurposeCategory};

    const HOME: (f64, f64) = (-104.99, 39.70);
    const SHOP: (f64, f64) = (-104.97, 39.72);

    fn dt(s: &str) -> Option<NaiveDateTime> {
        Some(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
    }

    fn segment(
        trip_id: u64,
        person_id: u64,
        hh_id: u64,
        day_id: u64,
        depart: &str,
        arrive: &str,
        origin: (f64, f64),
        destination: (f64, f64),
        d_purpose: PurposeCategory,
    ) -> UnlinkedTrip {
        UnlinkedTrip {
            trip_id,
            person_id,
            hh_id,
            day_id,
            origin: Some(Point::new(origin.0, origin.1)),
            destination: Some(Point::new(destination.0, destination.1)),
            o_purpose: PurposeCategory::Home,
            d_purpose,
            depart_time: dt(depart),
            arrive_time: dt(arrive),
            mode_type: ModeType::Car,
            driver: DriverStatus::Driver,
            num_travelers: 2,
            distance_meters: Some(3000.0),
            duration_minutes: None,
        }
    }

    fn anchors_for(person_ids: &[u64]) -> HashMap<u64, PersonAnchors> {
        person_ids
            .iter()
            .map(|id| {
                (
                    *id,
                    PersonAnchors {
                        home: Some(Point::new(HOME.0, HOME.1)),
                        work: None,
                        school: None,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_household_shopping_trip_end_to_end() {
        // two members drive to the shop and back together
        let mut trips: Vec<UnlinkedTrip> = vec![];
        for (person_id, base) in [(1u64, 0u64), (2u64, 10u64)] {
            trips.push(segment(
                base + 1, person_id, 7, 11,
                "2023-05-01 10:00", "2023-05-01 10:20",
                HOME, SHOP, PurposeCategory::Shop,
            ));
            trips.push(segment(
                base + 2, person_id, 7, 11,
                "2023-05-01 11:00", "2023-05-01 11:20",
                SHOP, HOME, PurposeCategory::Home,
            ));
        }
        let config = PipelineConfig {
            parallelize: false,
            ..Default::default()
        };
        let output = run_batch(trips, &anchors_for(&[1, 2]), &config).unwrap();

        assert_eq!(output.failed_units, 0);
        assert_eq!(output.linked_trips.len(), 4);
        assert_eq!(output.tours.len(), 2);
        assert_eq!(output.joint_trips.len(), 2);
        assert!(output
            .tours
            .iter()
            .all(|t| t.tour_purpose == Some(PurposeCategory::Shop)));
        // both the outbound and return trips are shared by both members
        for joint in output.joint_trips.iter() {
            assert_eq!(joint.person_ids, vec![1, 2]);
        }
        assert!(output
            .linked_trips
            .iter()
            .all(|t| t.joint_trip_id.is_some()));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let mut trips: Vec<UnlinkedTrip> = vec![];
        for hh in 1..=4u64 {
            for person in 0..2u64 {
                let person_id = hh * 10 + person;
                let day_id = hh * 100;
                trips.push(segment(
                    person_id * 1000 + 1, person_id, hh, day_id,
                    "2023-05-01 09:00", "2023-05-01 09:25",
                    HOME, SHOP, PurposeCategory::Shop,
                ));
                trips.push(segment(
                    person_id * 1000 + 2, person_id, hh, day_id,
                    "2023-05-01 10:15", "2023-05-01 10:40",
                    SHOP, HOME, PurposeCategory::Home,
                ));
            }
        }
        let person_ids: Vec<u64> = (1..=4u64)
            .flat_map(|hh| [hh * 10, hh * 10 + 1])
            .collect();
        let anchors = anchors_for(&person_ids);

        let sequential = run_batch(
            trips.clone(),
            &anchors,
            &PipelineConfig {
                parallelize: false,
                ..Default::default()
            },
        )
        .unwrap();
        let parallel = run_batch(trips, &anchors, &PipelineConfig::default()).unwrap();

        let ids = |output: &BatchOutput| -> Vec<u64> {
            let mut ids: Vec<u64> = output
                .linked_trips
                .iter()
                .map(|t| t.linked_trip_id.0)
                .collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(&sequential), ids(&parallel));
        assert_eq!(sequential.tours.len(), parallel.tours.len());
        assert_eq!(sequential.joint_trips.len(), parallel.joint_trips.len());
    }

    #[test]
    fn test_date_coded_day_id_excludes_unit_only() {
        // one household carries a date-coded day id; it is flagged and
        // excluded while the well-formed household still processes
        let trips = vec![
            segment(
                1, 1, 7, 20230501,
                "2023-05-01 10:00", "2023-05-01 10:20",
                HOME, SHOP, PurposeCategory::Shop,
            ),
            segment(
                2, 2, 8, 11,
                "2023-05-01 10:00", "2023-05-01 10:20",
                HOME, SHOP, PurposeCategory::Shop,
            ),
        ];
        let config = PipelineConfig {
            parallelize: false,
            ..Default::default()
        };
        let output = run_batch(trips, &anchors_for(&[1, 2]), &config).unwrap();
        assert_eq!(output.failed_units, 1);
        assert_eq!(output.linked_trips.len(), 1);
        assert_eq!(output.linked_trips[0].person_id, 2);
    }

    #[test]
    fn test_empty_batch() {
        let config = PipelineConfig::default();
        let output = run_batch(vec![], &HashMap::new(), &config).unwrap();
        assert!(output.linked_trips.is_empty());
        assert!(output.tours.is_empty());
        assert!(output.joint_trips.is_empty());
    }
}
