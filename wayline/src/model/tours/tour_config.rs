use super::{ScoreTable, TourError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use wayline_core::model::codebook::{ModeType, PurposeCategory};

/// parameters controlling anchor classification, primary destination
/// scoring, and tour mode selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// match radius around the reported home location
    pub home_buffer_meters: f64,
    /// match radius around the reported workplace
    pub work_buffer_meters: f64,
    /// match radius around the reported school
    pub school_buffer_meters: f64,
    /// modes in ascending priority; the journey with the
    /// highest-priority mode sets the tour mode
    pub mode_hierarchy: Vec<ModeType>,
    /// activity duration assigned when the following departure is
    /// unknown, such as the last journey of a day
    pub default_activity_minutes: f64,
    /// per-purpose overrides of the impedance score curves
    pub score_rows: HashMap<PurposeCategory, Vec<f64>>,
    /// override of the curve applied to purposes without a row
    pub default_score_row: Vec<f64>,
    /// drop tours marked invalid from the output instead of flagging
    pub drop_invalid_tours: bool,
}

impl Default for TourConfig {
    fn default() -> Self {
        TourConfig {
            home_buffer_meters: 100.0,
            work_buffer_meters: 200.0,
            school_buffer_meters: 200.0,
            mode_hierarchy: vec![
                ModeType::Walk,
                ModeType::Bike,
                ModeType::Bikeshare,
                ModeType::Scootershare,
                ModeType::SchoolBus,
                ModeType::Shuttle,
                ModeType::Taxi,
                ModeType::Tnc,
                ModeType::Carshare,
                ModeType::Car,
                ModeType::Ferry,
                ModeType::Transit,
                ModeType::LongDistance,
            ],
            default_activity_minutes: 240.0,
            score_rows: HashMap::new(),
            default_score_row: vec![],
            drop_invalid_tours: false,
        }
    }
}

impl TourConfig {
    pub fn validate(&self) -> Result<(), TourError> {
        for (name, value) in [
            ("home_buffer_meters", self.home_buffer_meters),
            ("work_buffer_meters", self.work_buffer_meters),
            ("school_buffer_meters", self.school_buffer_meters),
        ] {
            if value <= 0.0 {
                return Err(TourError::ConfigurationError(format!(
                    "{} must be positive, found {}",
                    name, value
                )));
            }
        }
        if self.mode_hierarchy.is_empty() {
            return Err(TourError::ConfigurationError(String::from(
                "mode_hierarchy must name at least one mode",
            )));
        }
        let seen: std::collections::HashSet<&ModeType> = self.mode_hierarchy.iter().collect();
        if seen.len() != self.mode_hierarchy.len() {
            return Err(TourError::ConfigurationError(String::from(
                "mode_hierarchy contains duplicate modes",
            )));
        }
        if self.default_activity_minutes < 0.0 {
            return Err(TourError::ConfigurationError(format!(
                "default_activity_minutes must be non-negative, found {}",
                self.default_activity_minutes
            )));
        }
        self.score_table().map(|_| ())
    }

    /// builds the impedance table, applying any configured overrides.
    pub fn score_table(&self) -> Result<ScoreTable, TourError> {
        ScoreTable::try_from_rows(&self.score_rows, &self.default_score_row)
    }

    /// position of a mode in the hierarchy; unlisted modes lose to any
    /// listed mode.
    pub fn mode_priority(&self, mode: &ModeType) -> Option<usize> {
        self.mode_hierarchy.iter().position(|m| m == mode)
    }
}
