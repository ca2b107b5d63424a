use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkingError {
    #[error("invalid trip linker configuration: {0}")]
    ConfigurationError(String),
    #[error("segments for person {0} belong to more than one person-day")]
    MixedPersonDay(u64),
    #[error("journey id overflow: {0}")]
    IdRangeError(String),
    #[error("{0}")]
    InternalError(String),
}
