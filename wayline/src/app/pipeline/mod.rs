mod io;
mod pipeline_config;
mod pipeline_error;
mod runner;

pub use io::{
    read_person_anchors, read_trips, write_joint_trips, write_linked_trips, write_tours,
};
pub use pipeline_config::PipelineConfig;
pub use pipeline_error::PipelineError;
pub use runner::{run_batch, BatchOutput};
