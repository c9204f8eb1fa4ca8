use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use log::{error, info};

use larvatrack::{Driver, LarvaTrackError, PipelineConfig};

/// Clean, simplify and index FIMTrack larva trajectories.
#[derive(Parser, Debug)]
#[command(name = "larvatrack", version, about)]
struct Args {
    /// Data root holding one directory per arena
    #[arg(short, long, default_value = "Data")]
    data: Utf8PathBuf,

    /// Output file (JSON)
    #[arg(short, long, default_value = "data_all_rdp.json")]
    output: Utf8PathBuf,

    /// Pixels per millimeter
    #[arg(long, default_value_t = larvatrack::constants::PIXELS_PER_MM)]
    scale: f64,

    /// Sampling interval in seconds
    #[arg(long, default_value_t = larvatrack::constants::SAMPLING_INTERVAL)]
    dt: f64,
}

fn run(args: &Args) -> Result<(), LarvaTrackError> {
    let config = PipelineConfig::builder()
        .scale(args.scale)
        .dt(args.dt)
        .build()?;
    info!("{config}");

    let driver = Driver::new(args.data.clone(), config)?;
    info!("Starting to read and preprocess all data from {}", driver.root());
    driver.run_and_persist(&args.output)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
