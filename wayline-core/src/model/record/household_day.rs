use super::UnlinkedTrip;
use itertools::Itertools;
use std::collections::BTreeMap;

/// all of one person's diary segments for one travel day, ordered by
/// departure time with deterministic tie-breaking. the unit of work for
/// the trip linker and tour builder.
#[derive(Clone, Debug)]
pub struct PersonDay {
    pub person_id: u64,
    pub day_id: u64,
    pub trips: Vec<UnlinkedTrip>,
}

/// all person-days of one household for one travel day. the unit of work
/// for the batch driver: household-days are independent and carry no
/// shared mutable state, so they can be processed in parallel.
#[derive(Clone, Debug)]
pub struct HouseholdDay {
    pub hh_id: u64,
    pub day_id: u64,
    pub person_days: Vec<PersonDay>,
}

impl HouseholdDay {
    /// partition a flat batch of segments into household-day units with
    /// person-days nested inside, each sorted by (depart, arrive, trip id).
    /// ordering is stable: exact timestamp collisions fall back to the
    /// reported trip id.
    pub fn partition(trips: Vec<UnlinkedTrip>) -> Vec<HouseholdDay> {
        let mut by_household: BTreeMap<(u64, u64), BTreeMap<u64, Vec<UnlinkedTrip>>> =
            BTreeMap::new();
        for trip in trips {
            by_household
                .entry((trip.hh_id, trip.day_id))
                .or_default()
                .entry(trip.person_id)
                .or_default()
                .push(trip);
        }

        by_household
            .into_iter()
            .map(|((hh_id, day_id), persons)| {
                let person_days = persons
                    .into_iter()
                    .map(|(person_id, mut trips)| {
                        trips.sort_by(|a, b| {
                            a.depart_time
                                .cmp(&b.depart_time)
                                .then(a.arrive_time.cmp(&b.arrive_time))
                                .then(a.trip_id.cmp(&b.trip_id))
                        });
                        PersonDay {
                            person_id,
                            day_id,
                            trips,
                        }
                    })
                    .collect_vec();
                HouseholdDay {
                    hh_id,
                    day_id,
                    person_days,
                }
            })
            .collect_vec()
    }

    pub fn num_trips(&self) -> usize {
        self.person_days.iter().map(|pd| pd.trips.len()).sum()
    }
}
