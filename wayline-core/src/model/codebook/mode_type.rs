use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// survey travel mode categories. variants follow the harmonized
/// mode_type codebook used by the upstream diary cleaning stages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeType {
    Walk,
    Bike,
    Bikeshare,
    Scootershare,
    Taxi,
    Tnc,
    Car,
    Carshare,
    SchoolBus,
    Shuttle,
    Ferry,
    Transit,
    LongDistance,
    Other,
    Missing,
}

impl ModeType {
    /// modes which are scheduled transit services. journeys containing any
    /// of these are reported with the transit segment's mode.
    pub fn is_transit_default(&self) -> bool {
        matches!(
            self,
            ModeType::Transit | ModeType::Ferry | ModeType::LongDistance
        )
    }
}

impl Display for ModeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", s.trim_matches('"'))
    }
}
