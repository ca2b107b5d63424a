use crate::model::codebook::{DriverStatus, ModeType, PurposeCategory};
use chrono::NaiveDateTime;
use geo::Point;
use serde::{Deserialize, Serialize};

/// one reported trip segment from the travel diary, as delivered by the
/// upstream loading and cleaning stages. read-only input to the trip
/// linker; never mutated by the pipeline.
///
/// coordinates and timestamps are optional because geocoding and time
/// imputation upstream can fail for individual rows. a segment missing
/// either cannot be distance- or dwell-checked and forces a journey break.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnlinkedTrip {
    pub trip_id: u64,
    pub person_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    pub origin: Option<Point<f64>>,
    pub destination: Option<Point<f64>>,
    pub o_purpose: PurposeCategory,
    pub d_purpose: PurposeCategory,
    pub depart_time: Option<NaiveDateTime>,
    pub arrive_time: Option<NaiveDateTime>,
    pub mode_type: ModeType,
    pub driver: DriverStatus,
    pub num_travelers: u32,
    /// great-circle or network distance in meters, when reported
    pub distance_meters: Option<f64>,
    /// in-motion travel time in minutes, when reported
    pub duration_minutes: Option<f64>,
}

impl UnlinkedTrip {
    /// a segment is checkable when both endpoints and both timestamps are
    /// present. unlinkable segments become single-segment journeys flagged
    /// for review.
    pub fn is_checkable(&self) -> bool {
        self.origin.is_some()
            && self.destination.is_some()
            && self.depart_time.is_some()
            && self.arrive_time.is_some()
    }
}
