//! # larvatrack
//!
//! Preprocessing of FIMTrack larva recordings: session tables are cleaned and stitched,
//! tracks are rebuilt in millimeters and seconds, simplified with Ramer–Douglas–Peucker to
//! expose their turning points, and collected into one [`Dataset`] keyed by
//! `(arena, substrate, larva type, experiment, larva)`.
//!
//! ```rust,no_run
//! use larvatrack::{Driver, PipelineConfig};
//!
//! # fn run() -> Result<(), larvatrack::LarvaTrackError> {
//! let driver = Driver::new("Data", PipelineConfig::default())?;
//! let dataset = driver.run_and_persist(camino::Utf8Path::new("data_all_rdp.json"))?;
//! for substrate in dataset.substrates("Two") {
//!     println!("{substrate}: {:?}", dataset.larva_types("Two", substrate));
//! }
//! # Ok(()) }
//! ```
pub mod config;
pub mod constants;
pub mod dataset;
pub mod driver;
pub mod larvatrack_errors;
pub mod patches;
pub mod tables;
pub mod trajectories;


pub use config::PipelineConfig;
pub use dataset::{Dataset, ExperimentLabel, LarvaLabel, TrajectoryKey};
pub use driver::Driver;
pub use larvatrack_errors::LarvaTrackError;
pub use trajectories::Trajectory;
