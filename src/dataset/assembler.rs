//! # Per-directory dataset assembly
//!
//! A condition directory `root/<arena>/<substrate>/<larva>` holds the session tables
//! (`table1.csv`, `table2.csv`, optional `table3.csv`) and, for patch arenas, one ROI table per
//! session. [`process_directory`] runs the whole chain for one directory:
//!
//! ```text
//! table{n}.csv ── RawSessionTable ── clean_session_table ──┐
//!                                                          ├─ stitch_sessions ── StitchedTable
//! ROI_coord{n}.csv ── load_patch_geometry ── PatchSet ──┐  │
//!                                                       └──┴─ assemble_directory ── Dataset
//! ```
use std::fmt;

use camino::Utf8Path;
use log::info;

use crate::{
    config::PipelineConfig,
    constants::{session_table_name, MAX_SESSIONS},
    dataset::{
        key::{arena_category, TrajectoryKey},
        Dataset,
    },
    patches::{load_patch_geometry, PatchSet},
    tables::{clean_session_table, stitch_sessions, RawSessionTable, StitchedTable},
    trajectories::Trajectory,
    LarvaTrackError,
};

/// Experimental condition of a directory, with the arena name as found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub arena: String,
    pub substrate: String,
    pub larva_type: String,
}

impl Condition {
    pub fn new(
        arena: impl Into<String>,
        substrate: impl Into<String>,
        larva_type: impl Into<String>,
    ) -> Self {
        Condition {
            arena: arena.into(),
            substrate: substrate.into(),
            larva_type: larva_type.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.arena, self.substrate, self.larva_type)
    }
}

/// Build the trajectories of one directory from its stitched table and patches.
///
/// Arguments
/// -----------------
/// * `table` – Stitched session columns.
/// * `patches` – Patches per session; must cover every experiment of `table` when the arena
///   has patches, ignored otherwise.
/// * `condition` – Arena (raw directory name), substrate and larva type.
/// * `config` – Calibration, tolerances and patch layouts.
///
/// Return
/// ----------
/// * One [`Trajectory`] per column, keyed under the normalized arena category.
/// * [`LarvaTrackError::InvalidExperimentLabel`] when a column's experiment has no patch table,
///   [`LarvaTrackError::AllNaNTrajectory`] for an empty track.
pub fn assemble_directory(
    table: &StitchedTable,
    patches: &PatchSet,
    condition: &Condition,
    config: &PipelineConfig,
) -> Result<Dataset, LarvaTrackError> {
    let layout = config.patch_layout(&condition.arena);
    let tolerance = config.tolerance_for(&condition.substrate);
    let arena = arena_category(&condition.arena);

    let mut dataset = Dataset::new();
    for column in &table.columns {
        let label = format!("{condition}/{}/{}", column.experiment, column.larva);

        let patch_geometry = if layout.has_patches() {
            Some(patches.for_experiment(column.experiment)?.to_vec())
        } else {
            None
        };

        let trajectory = Trajectory::from_stacked_column(
            &column.values,
            column.frames,
            tolerance,
            patch_geometry,
            config,
            &label,
        )?;

        let key = TrajectoryKey::new(
            arena.as_str(),
            condition.substrate.as_str(),
            condition.larva_type.as_str(),
            column.experiment,
            column.larva,
        );
        dataset.insert(key, trajectory)?;
    }
    Ok(dataset)
}

/// Read, clean and stitch the session tables of a directory.
///
/// `table1.csv` and `table2.csv` are required; `table3.csv` is read when present.
pub fn read_sessions(
    dir: &Utf8Path,
    condition: &Condition,
    config: &PipelineConfig,
) -> Result<StitchedTable, LarvaTrackError> {
    let mut sessions = Vec::with_capacity(MAX_SESSIONS);
    for session in 1..=MAX_SESSIONS as u8 {
        let path = dir.join(session_table_name(session));
        if session == MAX_SESSIONS as u8 && !path.is_file() {
            break;
        }
        let raw = RawSessionTable::from_csv(&path)?;
        sessions.push(clean_session_table(&raw, session, config)?);
    }
    stitch_sessions(sessions, &condition.to_string())
}

/// Run the whole pipeline for one condition directory.
///
/// Arguments
/// -----------------
/// * `config` – Run configuration.
/// * `condition` – Arena, substrate and larva type of the directory.
/// * `dir` – The directory itself.
///
/// Return
/// ----------
/// * The dataset of the directory, or the first error met
///   ([`LarvaTrackError::MissingDirectory`] if `dir` does not exist).
pub fn process_directory(
    config: &PipelineConfig,
    condition: &Condition,
    dir: &Utf8Path,
) -> Result<Dataset, LarvaTrackError> {
    info!(
        "Reading and processing data from: arena = {}, substrate = {}, larva type = {}",
        condition.arena, condition.substrate, condition.larva_type
    );
    if !dir.is_dir() {
        return Err(LarvaTrackError::MissingDirectory(dir.to_string()));
    }

    let table = read_sessions(dir, condition, config)?;
    let patches = load_patch_geometry(
        dir,
        config.patch_layout(&condition.arena),
        table.n_sessions,
        config.scale,
    )?;
    assemble_directory(&table, &patches, condition, config)
}
