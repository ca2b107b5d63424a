use serde::{Deserialize, Serialize};

/// whether the respondent drove during a trip segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Driver,
    Passenger,
    /// switched between driving and riding across the segments of a journey
    Both,
    Missing,
}
