mod link_config;
mod linker;
mod linking_error;

pub use link_config::LinkConfig;
pub use linker::link_person_day;
pub use linking_error::LinkingError;
