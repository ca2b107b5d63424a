use super::{JointTripId, LinkedTripId, TourId};
use crate::model::codebook::{DriverStatus, HalfTour, ModeType, PurposeCategory};
use chrono::NaiveDateTime;
use geo::Point;
use serde::{Deserialize, Serialize};

/// a journey: one or more diary segments merged across mode changes.
/// created once by the trip linker. the tour builder and joint trip
/// detector only fill in the annotation fields; the component list and
/// endpoint aggregates are never revised downstream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinkedTrip {
    pub linked_trip_id: LinkedTripId,
    pub person_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    /// component segment ids in departure order
    pub segment_trip_ids: Vec<u64>,
    /// first segment's origin
    pub origin: Option<Point<f64>>,
    /// last segment's destination
    pub destination: Option<Point<f64>>,
    pub o_purpose: PurposeCategory,
    pub d_purpose: PurposeCategory,
    pub depart_time: Option<NaiveDateTime>,
    pub arrive_time: Option<NaiveDateTime>,
    pub mode_type: ModeType,
    /// first non-transit segment mode, for journeys containing transit
    pub access_mode: Option<ModeType>,
    /// last non-transit segment mode, for journeys containing transit
    pub egress_mode: Option<ModeType>,
    pub driver: DriverStatus,
    pub num_travelers: u32,
    pub distance_meters: f64,
    /// sum of in-motion segment durations
    pub travel_duration_minutes: f64,
    /// door-to-door: last arrival minus first departure
    pub total_duration_minutes: f64,
    /// time spent waiting at mode-change locations
    pub dwell_duration_minutes: f64,
    /// set when the journey was closed by a data-quality break rather
    /// than a reported activity
    pub needs_review: bool,

    // annotations filled by downstream stages
    pub tour_id: Option<TourId>,
    pub subtour_id: Option<TourId>,
    pub half_tour: Option<HalfTour>,
    pub joint_trip_id: Option<JointTripId>,
}

impl LinkedTrip {
    pub fn num_segments(&self) -> usize {
        self.segment_trip_ids.len()
    }
}
