use thiserror::Error;

#[derive(Error, Debug)]
pub enum JointError {
    #[error("invalid joint trip detector configuration: {0}")]
    ConfigurationError(String),
    #[error("{0}")]
    InternalError(String),
}
