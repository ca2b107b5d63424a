use thiserror::Error;

#[derive(Error, Debug)]
pub enum TourError {
    #[error("invalid tour builder configuration: {0}")]
    ConfigurationError(String),
    #[error("tour id overflow: {0}")]
    IdRangeError(String),
    #[error("{0}")]
    InternalError(String),
}
