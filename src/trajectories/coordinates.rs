//! # Coordinate reconstruction
//!
//! Turns one stacked tracker column into a physical-unit track.
//!
//! ## Layout of a stacked column
//! -----------------
//! The first `frames` rows hold the coordinate block: `frames / 2` x values followed by
//! `frames / 2` y values, in pixels. Frames where the larva was not tracked are NaN.
//!
//! ## Steps
//! -----------------
//! 1. Split the block into x and y halves.
//! 2. Mask the NaN samples of **x** and drop the same positions from y.
//! 3. Keep the original sample index of each surviving sample; time is `index * dt`.
//! 4. Divide x and y by the scale (pixels per millimeter).
//!
//! The mask is driven by x alone. A NaN in y at a position where x is finite is kept and
//! reported with a warning.
use log::warn;
use nalgebra::Point2;

use crate::{
    config::PipelineConfig,
    constants::{Millimeter, Pixel, Second},
    LarvaTrackError,
};

/// Pixels → millimeters.
#[inline]
pub fn pixels_to_mm(value: Pixel, scale: f64) -> Millimeter {
    value / scale
}

/// A reconstructed track, NaN samples removed.
///
/// Invariants
/// -----------------
/// * `x.len() == y.len() == time.len() == sample_indices.len()`.
/// * `sample_indices` is strictly increasing and every entry is `< n_frames`.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub x: Vec<Millimeter>,
    pub y: Vec<Millimeter>,
    pub time: Vec<Second>,
    /// Original (pre-mask) position of every surviving sample.
    pub sample_indices: Vec<usize>,
    /// Samples per axis before masking.
    pub n_frames: usize,
}

impl Coordinates {
    pub fn points(&self) -> Vec<Point2<f64>> {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| Point2::new(x, y))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Rebuild the physical-unit track of one stacked column.
///
/// Arguments
/// -----------------
/// * `values` – The stacked column; entries past `frames` are ignored, missing entries are NaN.
/// * `frames` – Rows of the coordinate block (even).
/// * `config` – Supplies `scale` and `dt`.
/// * `label` – Identifies the track in errors and warnings.
///
/// Return
/// ----------
/// * The reconstructed [`Coordinates`], or [`LarvaTrackError::AllNaNTrajectory`] when no
///   x sample is finite.
pub fn reconstruct_coordinates(
    values: &[Pixel],
    frames: usize,
    config: &PipelineConfig,
    label: &str,
) -> Result<Coordinates, LarvaTrackError> {
    let n_frames = frames / 2;
    let at = |i: usize| values.get(i).copied().unwrap_or(f64::NAN);

    let kept: Vec<usize> = (0..n_frames).filter(|&i| !at(i).is_nan()).collect();
    if kept.is_empty() {
        return Err(LarvaTrackError::AllNaNTrajectory(label.to_string()));
    }

    let x: Vec<Millimeter> = kept
        .iter()
        .map(|&i| pixels_to_mm(at(i), config.scale))
        .collect();
    let y: Vec<Millimeter> = kept
        .iter()
        .map(|&i| pixels_to_mm(at(n_frames + i), config.scale))
        .collect();

    let misaligned = y.iter().filter(|v| v.is_nan()).count();
    if misaligned > 0 {
        warn!("{label}: {misaligned} y samples are NaN where x is valid");
    }

    let time = kept.iter().map(|&i| i as f64 * config.dt).collect();

    Ok(Coordinates {
        x,
        y,
        time,
        sample_indices: kept,
        n_frames,
    })
}
