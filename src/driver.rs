//! # Driver: run the pipeline over a data tree
//!
//! The data root holds one directory per arena, one per substrate inside it, and one per
//! larva type inside that:
//!
//! ```text
//! root/
//! ├── Homogeneous/Agar/Rover/{table1,table2,table3}.csv
//! ├── Two_patches/Yeast/Sitter/{table1,table2}.csv + {ROI_coord1,ROI_coord2}.csv
//! └── ...
//! ```
//!
//! [`Driver`] enumerates arenas × substrates × larva types from its [`PipelineConfig`],
//! keeps the combinations whose directory exists, processes them one after the other and
//! merges the per-directory datasets. Every arena directory must exist: a missing one stops
//! the run before any processing.
//!
//! ### Progress UI (feature: `progress`)
//! With the `progress` feature, [`Driver::run`] renders an `indicatif` bar with elapsed time and
//! rate; its message names the directory in progress.
use camino::{Utf8Path, Utf8PathBuf};
use itertools::iproduct;
use log::info;

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

use crate::{
    config::PipelineConfig,
    dataset::{
        assembler::{process_directory, Condition},
        Dataset,
    },
    LarvaTrackError,
};

/// Runs the preprocessing over every condition directory of a data root.
#[derive(Debug, Clone)]
pub struct Driver {
    root: Utf8PathBuf,
    config: PipelineConfig,
}

impl Driver {
    /// Create a driver after checking the data tree.
    ///
    /// Return
    /// ----------
    /// * [`LarvaTrackError::MissingDirectory`] if `root` or any configured arena directory
    ///   is absent.
    pub fn new(root: impl Into<Utf8PathBuf>, config: PipelineConfig) -> Result<Self, LarvaTrackError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(LarvaTrackError::MissingDirectory(root.to_string()));
        }
        for arena in &config.arenas {
            let path = root.join(arena);
            if !path.is_dir() {
                return Err(LarvaTrackError::MissingDirectory(path.to_string()));
            }
        }
        Ok(Driver { root, config })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Condition directories present on disk, in arena → substrate → larva type order.
    pub fn discover(&self) -> Vec<(Condition, Utf8PathBuf)> {
        let c = &self.config;
        iproduct!(&c.arenas, &c.substrates, &c.larva_types)
            .map(|(arena, substrate, larva)| {
                let path = self.root.join(arena).join(substrate).join(larva);
                (Condition::new(arena, substrate, larva), path)
            })
            .filter(|(_, path)| path.is_dir())
            .collect()
    }

    /// Process every condition directory and merge the results.
    #[cfg(feature = "progress")]
    pub fn run(&self) -> Result<Dataset, LarvaTrackError> {
        let directories = self.discover();
        info!("Found {} condition directories", directories.len());

        let pb = ProgressBar::new((directories.len() as u64).max(1));
        pb.set_style(
            ProgressStyle::with_template(
                "{bar:40.cyan/blue} {pos}/{len} ({percent:>3}%) | {elapsed_precise} elapsed, ETA {eta_precise} | {per_sec} | {msg}",
            )
            .expect("indicatif template"),
        );
        pb.enable_steady_tick(Duration::from_millis(200));

        let mut dataset = Dataset::new();

        for (condition, path) in &directories {
            pb.set_message(format!("{condition} | {} trajectories", dataset.len()));

            let result = process_directory(&self.config, condition, path)
                .and_then(|part| dataset.merge(part));
            if let Err(err) = result {
                pb.abandon();
                return Err(err);
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        info!("Reading done: {} trajectories", dataset.len());
        Ok(dataset)
    }

    /// Process every condition directory and merge the results.
    #[cfg(not(feature = "progress"))]
    pub fn run(&self) -> Result<Dataset, LarvaTrackError> {
        let directories = self.discover();
        info!("Found {} condition directories", directories.len());

        let mut dataset = Dataset::new();
        for (condition, path) in &directories {
            dataset.merge(process_directory(&self.config, condition, path)?)?;
        }

        info!("Reading done: {} trajectories", dataset.len());
        Ok(dataset)
    }

    /// [`Driver::run`], then write the dataset to `output`.
    pub fn run_and_persist(&self, output: &Utf8Path) -> Result<Dataset, LarvaTrackError> {
        let dataset = self.run()?;
        info!("Saving as {output}");
        dataset.save(output)?;
        Ok(dataset)
    }
}
