use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use wayline::app::pipeline::{
    read_person_anchors, read_trips, run_batch, write_joint_trips, write_linked_trips,
    write_tours, PipelineConfig, PipelineError,
};

#[derive(Parser)]
#[command(
    name = "wayline",
    about = "reconstructs linked trips, tours, and joint trips from travel diary segments"
)]
struct CliArgs {
    /// csv file of unlinked trip segments
    #[arg(long)]
    trips: String,
    /// csv file of person anchor locations (home, work, school)
    #[arg(long)]
    persons: Option<String>,
    /// pipeline configuration file (.toml or .json); defaults apply
    /// when omitted
    #[arg(long)]
    config: Option<String>,
    /// directory for output files, created if absent
    #[arg(long, default_value = "output")]
    output_directory: String,
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();
    match run(args) {
        Ok(_) => {}
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

fn run(args: CliArgs) -> Result<(), PipelineError> {
    log::info!("starting app at {}", chrono::Local::now().to_rfc3339());

    let config = match &args.config {
        Some(f) => PipelineConfig::try_from(f)?,
        None => PipelineConfig::default(),
    };
    config.validate()?;

    let trips = read_trips(&args.trips)?;
    log::info!("read {} trip segments from {}", trips.len(), args.trips);

    let anchors = match &args.persons {
        Some(f) => {
            let anchors = read_person_anchors(f)?;
            log::info!("read anchors for {} persons from {}", anchors.len(), f);
            anchors
        }
        None => {
            log::warn!("no person file supplied; all trip endpoints will classify as unanchored");
            HashMap::new()
        }
    };

    let output = run_batch(trips, &anchors, &config)?;

    let out_dir = PathBuf::from(&args.output_directory);
    std::fs::create_dir_all(&out_dir).map_err(|e| {
        PipelineError::FileWriteError(args.output_directory.clone(), e.to_string())
    })?;
    write_linked_trips(out_dir.join("linked_trips.csv"), &output.linked_trips)?;
    write_tours(out_dir.join("tours.csv"), &output.tours)?;
    write_joint_trips(out_dir.join("joint_trips.csv"), &output.joint_trips)?;

    log::info!(
        "wrote {} linked trips, {} tours, {} joint trips to {}",
        output.linked_trips.len(),
        output.tours.len(),
        output.joint_trips.len(),
        out_dir.to_string_lossy()
    );
    Ok(())
}
