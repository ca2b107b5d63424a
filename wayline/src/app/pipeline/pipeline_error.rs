use crate::model::joint::JointError;
use crate::model::linking::LinkingError;
use crate::model::tours::TourError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid pipeline configuration: {0}")]
    ConfigurationError(String),
    #[error("failure reading {0}: {1}")]
    FileReadError(String, String),
    #[error("failure writing {0}: {1}")]
    FileWriteError(String, String),
    #[error(transparent)]
    LinkingError(#[from] LinkingError),
    #[error(transparent)]
    TourError(#[from] TourError),
    #[error(transparent)]
    JointError(#[from] JointError),
    #[error("{0}")]
    InternalError(String),
}
