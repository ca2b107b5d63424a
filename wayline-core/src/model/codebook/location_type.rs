use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// classification of a trip endpoint against a person's known anchor
/// locations. ordering reflects classification priority when a point is
/// within range of more than one anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Home,
    Work,
    School,
    Other,
}

impl Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationType::Home => write!(f, "home"),
            LocationType::Work => write!(f, "work"),
            LocationType::School => write!(f, "school"),
            LocationType::Other => write!(f, "other"),
        }
    }
}
