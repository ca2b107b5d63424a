use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// identifier for a linked trip (journey). constructed from the person,
/// their travel day number, and the journey's sequence within that day,
/// so ids are globally unique without any shared counter across parallel
/// workers. packing is lossy past the strides: callers must reject day
/// numbers above [`LinkedTripId::MAX_DAY_ID`] and sequences above
/// [`LinkedTripId::MAX_SEQUENCE`] or ids collide across persons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkedTripId(pub u64);

impl LinkedTripId {
    const PERSON_STRIDE: u64 = 1_000_000;
    const DAY_STRIDE: u64 = 1000;
    /// largest day number the packing can carry without spilling into
    /// the person component
    pub const MAX_DAY_ID: u64 = Self::PERSON_STRIDE / Self::DAY_STRIDE - 1;
    /// largest per-day journey sequence the packing can carry
    pub const MAX_SEQUENCE: u64 = Self::DAY_STRIDE - 1;

    pub fn new(person_id: u64, day_id: u64, sequence: u64) -> LinkedTripId {
        LinkedTripId(person_id * Self::PERSON_STRIDE + day_id * Self::DAY_STRIDE + sequence)
    }
}

impl Display for LinkedTripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// identifier for a tour or sub-tour. home-based tours use
/// `(person_id * 1000 + day_id) * 1000 + seq * 10`; a sub-tour appends
/// its child sequence in the final digit so parent ids are recoverable
/// by truncation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TourId(pub u64);

impl TourId {
    const PERSON_STRIDE: u64 = 1_000_000;
    const DAY_STRIDE: u64 = 1000;
    const SUBTOUR_STRIDE: u64 = 10;
    /// largest day number the packing can carry without spilling into
    /// the person component
    pub const MAX_DAY_ID: u64 = Self::PERSON_STRIDE / Self::DAY_STRIDE - 1;
    /// largest per-day tour sequence the packing can carry
    pub const MAX_TOUR_SEQ: u64 = Self::DAY_STRIDE / Self::SUBTOUR_STRIDE - 1;
    /// largest child sequence within a parent tour
    pub const MAX_SUBTOUR_SEQ: u64 = Self::SUBTOUR_STRIDE - 1;

    pub fn home_based(person_id: u64, day_id: u64, tour_seq: u64) -> TourId {
        TourId(
            person_id * Self::PERSON_STRIDE
                + day_id * Self::DAY_STRIDE
                + tour_seq * Self::SUBTOUR_STRIDE,
        )
    }

    pub fn subtour(parent: TourId, subtour_seq: u64) -> TourId {
        TourId(parent.0 + subtour_seq)
    }

    pub fn parent(&self) -> TourId {
        TourId(self.0 - self.0 % Self::SUBTOUR_STRIDE)
    }

    pub fn is_subtour(&self) -> bool {
        self.0 % Self::SUBTOUR_STRIDE != 0
    }
}

impl Display for TourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// identifier for a joint trip. set to the smallest component linked trip
/// id, which is unique because joint trips are disjoint over linked trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointTripId(pub u64);

impl Display for JointTripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
