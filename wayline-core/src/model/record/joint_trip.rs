use super::{JointTripId, LinkedTripId};
use chrono::NaiveDateTime;
use geo::Point;
use serde::{Deserialize, Serialize};

/// a shared household journey: linked trips from two or more household
/// members judged to be the same physical trip. terminal output of the
/// joint trip detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JointTrip {
    pub joint_trip_id: JointTripId,
    pub hh_id: u64,
    pub day_id: u64,
    /// one person per participating household member
    pub person_ids: Vec<u64>,
    /// one linked trip per participant
    pub linked_trip_ids: Vec<LinkedTripId>,
    pub num_travelers: usize,
    pub origin_mean: Option<Point<f64>>,
    pub destination_mean: Option<Point<f64>>,
    pub depart_time_mean: Option<NaiveDateTime>,
    pub arrive_time_mean: Option<NaiveDateTime>,
}
