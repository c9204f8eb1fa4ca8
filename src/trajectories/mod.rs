//! # Trajectories: reconstruction and simplification
//!
//! The central type is [`Trajectory`]: the full track of one larva in one recording session,
//! in millimeters and seconds, together with its RDP simplification and, for patch arenas,
//! the geometry of the food patches.
//!
//! Modules
//! -----------------
//! * [`coordinates`](crate::trajectories::coordinates) – stacked column → x, y, time (NaN samples removed).
//! * [`simplify`](crate::trajectories::simplify) – iterative Ramer–Douglas–Peucker with retention mask.
//!
//! Data Model
//! -----------------
//! * `x`, `y`, `time`, `retention_mask` are aligned: one entry per tracked sample.
//! * `turn_point_indices` holds the **original** frame index of each retained sample, so
//!   `turn_point_indices[k] as f64 * dt` is the time of the k-th simplified point.
//! * `patch_geometry` is `Some` with 2 or 8 entries for patch arenas, `None` otherwise.
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{
    config::PipelineConfig,
    constants::{Millimeter, Second},
    patches::Patch,
    LarvaTrackError,
};

pub mod coordinates;
mod serde_nan;
pub mod simplify;

use coordinates::reconstruct_coordinates;
use simplify::simplify;

/// One larva track of one recording session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    #[serde(with = "serde_nan::float_seq")]
    pub x: Vec<Millimeter>,
    /// May hold NaN where the tracker lost y but not x.
    #[serde(with = "serde_nan::float_seq")]
    pub y: Vec<Millimeter>,
    #[serde(with = "serde_nan::float_seq")]
    pub time: Vec<Second>,
    /// Samples per axis in the recording, tracked or not.
    pub n_frames: usize,
    /// Retained samples, first and last included.
    #[serde(with = "serde_nan::point_seq")]
    pub simplified_trajectory: Vec<Point2<f64>>,
    /// Original frame index of every retained sample, strictly increasing.
    ///
    /// These index the recording, not `x`/`y`: the time of entry `k` is
    /// `turn_point_indices[k] as f64 * dt`. Use [`Trajectory::retained_positions`]
    /// to index the tracked arrays.
    pub turn_point_indices: Vec<usize>,
    /// Aligned with `x`/`y`/`time`.
    pub retention_mask: Vec<bool>,
    /// RDP tolerance used (millimeters).
    pub tolerance: Millimeter,
    pub patch_geometry: Option<Vec<Patch>>,
}

impl Trajectory {
    /// Reconstruct and simplify the track stored in one stacked tracker column.
    ///
    /// Arguments
    /// -----------------
    /// * `values` – Stacked pixel coordinates (x block then y block).
    /// * `frames` – Rows of the coordinate block.
    /// * `tolerance` – RDP tolerance in millimeters.
    /// * `patch_geometry` – Patches of the session, when the arena has any.
    /// * `config` – Calibration (`scale`, `dt`).
    /// * `label` – Identifies the track in errors.
    ///
    /// Return
    /// ----------
    /// * The trajectory, or [`LarvaTrackError::AllNaNTrajectory`].
    pub fn from_stacked_column(
        values: &[f64],
        frames: usize,
        tolerance: Millimeter,
        patch_geometry: Option<Vec<Patch>>,
        config: &PipelineConfig,
        label: &str,
    ) -> Result<Self, LarvaTrackError> {
        let coords = reconstruct_coordinates(values, frames, config, label)?;
        let simple = simplify(&coords.points(), tolerance);

        let turn_point_indices = coords
            .sample_indices
            .iter()
            .zip(&simple.mask)
            .filter_map(|(&idx, &keep)| keep.then_some(idx))
            .collect();

        Ok(Trajectory {
            x: coords.x,
            y: coords.y,
            time: coords.time,
            n_frames: coords.n_frames,
            simplified_trajectory: simple.points,
            turn_point_indices,
            retention_mask: simple.mask,
            tolerance,
            patch_geometry,
        })
    }

    /// Number of tracked samples.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Positions in `x`/`y`/`time` of the retained samples.
    pub fn retained_positions(&self) -> Vec<usize> {
        self.retention_mask
            .iter()
            .enumerate()
            .filter_map(|(pos, &keep)| keep.then_some(pos))
            .collect()
    }

    /// Retained samples that are not endpoints.
    pub fn turning_points(&self) -> &[Point2<f64>] {
        let n = self.simplified_trajectory.len();
        if n <= 2 {
            &[]
        } else {
            &self.simplified_trajectory[1..n - 1]
        }
    }

    /// Time elapsed between the first and last tracked samples.
    pub fn duration(&self) -> Second {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Length of the tracked path (millimeters), summed over consecutive samples.
    pub fn path_length(&self) -> Millimeter {
        self.x
            .windows(2)
            .zip(self.y.windows(2))
            .map(|(x, y)| (x[1] - x[0]).hypot(y[1] - y[0]))
            .sum()
    }
}
