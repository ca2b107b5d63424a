use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// harmonized activity purpose categories for trip origins and destinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurposeCategory {
    Home,
    Work,
    WorkRelated,
    School,
    SchoolRelated,
    Escort,
    Shop,
    Meal,
    SocialRec,
    Errand,
    ChangeMode,
    Overnight,
    Other,
    Missing,
}

impl PurposeCategory {
    /// purposes that indicate a work activity for primary destination
    /// override logic.
    pub fn is_work(&self) -> bool {
        matches!(self, PurposeCategory::Work | PurposeCategory::WorkRelated)
    }
}

impl Display for PurposeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        write!(f, "{}", s.trim_matches('"'))
    }
}
