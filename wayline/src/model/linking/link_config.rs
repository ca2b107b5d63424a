use super::LinkingError;
use serde::{Deserialize, Serialize};
use wayline_core::model::codebook::{ModeType, PurposeCategory};

/// parameters controlling when consecutive diary segments are merged into
/// one journey.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// destination purpose marking a transfer rather than an activity
    pub change_mode_purpose: PurposeCategory,
    /// modes treated as scheduled transit for journey mode selection
    pub transit_modes: Vec<ModeType>,
    /// maximum transfer wait between arrival and the next departure
    pub max_dwell_minutes: f64,
    /// maximum distance between a segment's destination and the next
    /// segment's origin, absorbing GPS and geocoding noise
    pub buffer_distance_meters: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            change_mode_purpose: PurposeCategory::ChangeMode,
            transit_modes: vec![ModeType::Transit, ModeType::Ferry, ModeType::LongDistance],
            max_dwell_minutes: 120.0,
            buffer_distance_meters: 100.0,
        }
    }
}

impl LinkConfig {
    /// configuration errors are fatal at pipeline start, never mid-batch.
    pub fn validate(&self) -> Result<(), LinkingError> {
        if self.max_dwell_minutes < 0.0 {
            return Err(LinkingError::ConfigurationError(format!(
                "max_dwell_minutes must be non-negative, found {}",
                self.max_dwell_minutes
            )));
        }
        if self.buffer_distance_meters < 0.0 {
            return Err(LinkingError::ConfigurationError(format!(
                "buffer_distance_meters must be non-negative, found {}",
                self.buffer_distance_meters
            )));
        }
        if self.transit_modes.is_empty() {
            return Err(LinkingError::ConfigurationError(String::from(
                "transit_modes must name at least one mode",
            )));
        }
        Ok(())
    }

    pub fn is_transit(&self, mode: &ModeType) -> bool {
        self.transit_modes.contains(mode)
    }
}
