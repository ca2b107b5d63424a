use serde::{Deserialize, Serialize};

/// tour boundary completeness relative to the tour's anchor location.
/// only [`TourCategory::Complete`] tours both depart from and return to
/// the anchor; the partial categories flag which boundary is missing so
/// downstream consumers can apply their own drop policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourCategory {
    /// starts at anchor, ends at anchor
    Complete,
    /// starts at anchor, does not return
    PartialEnd,
    /// does not start at anchor, ends at anchor
    PartialStart,
    /// neither boundary at anchor
    PartialBoth,
}

impl TourCategory {
    pub fn is_complete(&self) -> bool {
        matches!(self, TourCategory::Complete)
    }

    pub fn from_boundaries(starts_at_anchor: bool, ends_at_anchor: bool) -> TourCategory {
        match (starts_at_anchor, ends_at_anchor) {
            (true, true) => TourCategory::Complete,
            (true, false) => TourCategory::PartialEnd,
            (false, true) => TourCategory::PartialStart,
            (false, false) => TourCategory::PartialBoth,
        }
    }
}
