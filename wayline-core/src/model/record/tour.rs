use super::{LinkedTripId, TourId};
use crate::model::codebook::{LocationType, ModeType, PurposeCategory, TourCategory};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// one tour or sub-tour: a maximal run of a person's linked trips between
/// successive visits to an anchor location. terminal output of the tour
/// builder, one record per tour and per sub-tour.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tour {
    pub tour_id: TourId,
    pub person_id: u64,
    pub hh_id: u64,
    pub day_id: u64,
    /// sequence within the person-day (1-based)
    pub tour_seq: u64,
    /// parent tour for sub-tours, otherwise None
    pub parent_tour_id: Option<TourId>,
    /// anchor bounding this tour: home, or work/school for sub-tours
    pub anchor: LocationType,
    /// linked trip whose destination was selected as the primary activity
    pub primary_dest_trip_id: Option<LinkedTripId>,
    pub tour_purpose: Option<PurposeCategory>,
    pub tour_mode: Option<ModeType>,
    pub outbound_mode: Option<ModeType>,
    pub inbound_mode: Option<ModeType>,
    pub depart_time: Option<NaiveDateTime>,
    pub arrive_time: Option<NaiveDateTime>,
    /// first arrival at the primary destination
    pub dest_arrive_time: Option<NaiveDateTime>,
    /// final departure from the primary destination
    pub dest_depart_time: Option<NaiveDateTime>,
    pub trip_count: usize,
    /// distinct intermediate stops before the primary destination
    pub outbound_stops: usize,
    /// distinct intermediate stops after the primary destination
    pub inbound_stops: usize,
    pub category: TourCategory,
    /// false when the tour's structure could not be resolved (for example
    /// a single-trip tour with no candidate destination)
    pub valid: bool,
}

impl Tour {
    pub fn is_subtour(&self) -> bool {
        self.parent_tour_id.is_some()
    }
}
