use super::PipelineError;
use crate::model::joint::JointConfig;
use crate::model::linking::LinkConfig;
use crate::model::tours::TourConfig;
use serde::{Deserialize, Serialize};

/// top-level configuration for a reconstruction run, combining the
/// three component configurations.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub linking: LinkConfig,
    pub tours: TourConfig,
    pub joint: JointConfig,
    pub parallelize: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            linking: LinkConfig::default(),
            tours: TourConfig::default(),
            joint: JointConfig::default(),
            parallelize: true,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.linking.validate()?;
        self.tours.validate()?;
        self.joint.validate()?;
        Ok(())
    }
}

impl TryFrom<&String> for PipelineConfig {
    type Error = PipelineError;

    fn try_from(f: &String) -> Result<Self, Self::Error> {
        if f.ends_with(".toml") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            toml::from_str(&s).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else if f.ends_with(".json") {
            let s = std::fs::read_to_string(f).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure reading {f}: {e}"))
            })?;
            serde_json::from_str(&s).map_err(|e| {
                PipelineError::ConfigurationError(format!("failure decoding {f}: {e}"))
            })
        } else {
            Err(PipelineError::ConfigurationError(format!(
                "unsupported file type: {f}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::joint::SimilarityMethod;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let toml_str = r#"
            parallelize = false

            [linking]
            max_dwell_minutes = 180.0

            [joint]
            method = "buffer"
        "#;
        let config: PipelineConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.parallelize);
        assert_eq!(config.linking.max_dwell_minutes, 180.0);
        assert_eq!(config.linking.buffer_distance_meters, 100.0);
        assert_eq!(config.joint.method, SimilarityMethod::Buffer);
        assert_eq!(config.tours.default_activity_minutes, 240.0);
        assert!(config.validate().is_ok());
    }
}
