//! # Pipeline configuration
//!
//! This module defines [`PipelineConfig`], the **immutable configuration value** threaded
//! through the whole preprocessing pipeline, and its validating [`PipelineConfigBuilder`].
//!
//! ## Overview
//! -----------------
//! The configuration groups:
//!
//! - **Calibration**: `scale` (pixels per millimeter) and `dt` (sampling interval, seconds).
//! - **Frame-count inference**: primary/fallback row divisors and the plausibility floor
//!   used by [`infer_frame_count`](crate::tables::session_table::infer_frame_count).
//! - **Simplification**: tolerance numerators for yeast and non-yeast substrates.
//! - **Conditions**: arena, substrate and larva type names enumerated by the
//!   [`Driver`](crate::driver::Driver), plus the arenas that carry two or eight patches.
//!
//! Defaults come from [`crate::constants`].
//!
//! ## Example
//! -----------------
//! ```rust,no_run
//! use larvatrack::config::PipelineConfig;
//!
//! let config = PipelineConfig::builder()
//!     .scale(8.0)
//!     .dt(0.5)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.tolerance_for("Yeast"), 1.25);
//! ```
use std::fmt;

use crate::{
    constants::{
        Millimeter, Second, ARENAS, DEFAULT_TOLERANCE, EIGHT_PATCH_ARENAS,
        FALLBACK_FRAME_DIVISOR, LARVA_TYPES, MIN_PLAUSIBLE_FRAMES, PIXELS_PER_MM,
        PRIMARY_FRAME_DIVISOR, SAMPLING_INTERVAL, SUBSTRATES, TWO_PATCH_ARENAS, YEAST_TOLERANCE,
    },
    patches::PatchLayout,
    LarvaTrackError,
};

/// Configuration of a preprocessing run.
///
/// Built once (usually through [`PipelineConfig::builder`]) and only read afterwards.
///
/// Invariants
/// -----------------
/// * `scale > 0`, `dt > 0`.
/// * `primary_frame_divisor ≥ 1`, `fallback_frame_divisor ≥ 1`.
/// * `yeast_tolerance ≥ 0`, `default_tolerance ≥ 0`.
/// * `arenas`, `substrates`, `larva_types` are non-empty.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    // --- Calibration ---
    /// Pixels per millimeter.
    pub scale: f64,
    /// Sampling interval (seconds).
    pub dt: Second,

    // --- Frame-count inference ---
    pub primary_frame_divisor: usize,
    pub fallback_frame_divisor: usize,
    pub min_plausible_frames: usize,

    // --- Simplification ---
    /// Tolerance numerator used when the substrate is a yeast stimulus.
    pub yeast_tolerance: f64,
    /// Tolerance numerator used for every other substrate.
    pub default_tolerance: f64,

    // --- Conditions ---
    pub arenas: Vec<String>,
    pub substrates: Vec<String>,
    pub larva_types: Vec<String>,
    pub two_patch_arenas: Vec<String>,
    pub eight_patch_arenas: Vec<String>,
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// RDP tolerance (millimeters) for a substrate.
    ///
    /// Yeast tracks are richer in direction changes, so they get the narrower tolerance.
    pub fn tolerance_for(&self, substrate: &str) -> Millimeter {
        if substrate.contains("Yeast") {
            self.yeast_tolerance / self.scale
        } else {
            self.default_tolerance / self.scale
        }
    }

    /// Patch layout of an arena directory.
    pub fn patch_layout(&self, arena: &str) -> PatchLayout {
        if self.two_patch_arenas.iter().any(|a| a == arena) {
            PatchLayout::Two
        } else if self.eight_patch_arenas.iter().any(|a| a == arena) {
            PatchLayout::Eight
        } else {
            PatchLayout::None
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let owned =
            |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        PipelineConfig {
            scale: PIXELS_PER_MM,
            dt: SAMPLING_INTERVAL,

            primary_frame_divisor: PRIMARY_FRAME_DIVISOR,
            fallback_frame_divisor: FALLBACK_FRAME_DIVISOR,
            min_plausible_frames: MIN_PLAUSIBLE_FRAMES,

            yeast_tolerance: YEAST_TOLERANCE,
            default_tolerance: DEFAULT_TOLERANCE,

            arenas: owned(&ARENAS),
            substrates: owned(&SUBSTRATES),
            larva_types: owned(&LARVA_TYPES),
            two_patch_arenas: owned(&TWO_PATCH_ARENAS),
            eight_patch_arenas: owned(&EIGHT_PATCH_ARENAS),
        }
    }
}

/// Builder for [`PipelineConfig`], with validation.
#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    // --- Calibration ---
    pub fn scale(mut self, v: f64) -> Self {
        self.config.scale = v;
        self
    }
    pub fn dt(mut self, v: Second) -> Self {
        self.config.dt = v;
        self
    }

    // --- Frame-count inference ---
    pub fn primary_frame_divisor(mut self, v: usize) -> Self {
        self.config.primary_frame_divisor = v;
        self
    }
    pub fn fallback_frame_divisor(mut self, v: usize) -> Self {
        self.config.fallback_frame_divisor = v;
        self
    }
    pub fn min_plausible_frames(mut self, v: usize) -> Self {
        self.config.min_plausible_frames = v;
        self
    }

    // --- Simplification ---
    pub fn yeast_tolerance(mut self, v: f64) -> Self {
        self.config.yeast_tolerance = v;
        self
    }
    pub fn default_tolerance(mut self, v: f64) -> Self {
        self.config.default_tolerance = v;
        self
    }

    // --- Conditions ---
    pub fn arenas<S: Into<String>>(mut self, v: impl IntoIterator<Item = S>) -> Self {
        self.config.arenas = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn substrates<S: Into<String>>(mut self, v: impl IntoIterator<Item = S>) -> Self {
        self.config.substrates = v.into_iter().map(Into::into).collect();
        self
    }
    pub fn larva_types<S: Into<String>>(mut self, v: impl IntoIterator<Item = S>) -> Self {
        self.config.larva_types = v.into_iter().map(Into::into).collect();
        self
    }

    /// Finalize the builder and produce a [`PipelineConfig`].
    ///
    /// Return
    /// ----------
    /// * `Ok(PipelineConfig)` when every invariant holds.
    /// * `Err(LarvaTrackError::InvalidConfig)` naming the first violated invariant.
    pub fn build(self) -> Result<PipelineConfig, LarvaTrackError> {
        let c = &self.config;

        if !(c.scale.is_finite() && c.scale > 0.0) {
            return Err(LarvaTrackError::InvalidConfig("scale must be > 0".into()));
        }
        if !(c.dt.is_finite() && c.dt > 0.0) {
            return Err(LarvaTrackError::InvalidConfig("dt must be > 0".into()));
        }
        if c.primary_frame_divisor == 0 || c.fallback_frame_divisor == 0 {
            return Err(LarvaTrackError::InvalidConfig(
                "frame divisors must be >= 1".into(),
            ));
        }
        if !(c.yeast_tolerance >= 0.0 && c.default_tolerance >= 0.0) {
            return Err(LarvaTrackError::InvalidConfig(
                "tolerances must be >= 0".into(),
            ));
        }
        if c.arenas.is_empty() || c.substrates.is_empty() || c.larva_types.is_empty() {
            return Err(LarvaTrackError::InvalidConfig(
                "arena, substrate and larva type lists must not be empty".into(),
            ));
        }

        Ok(self.config)
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PipelineConfig(scale={:.2}px/mm, dt={:.2}s, divisors={}/{}, min_frames={}, tol={:.2}/{:.2}, {} arenas × {} substrates × {} larva types)",
            self.scale,
            self.dt,
            self.primary_frame_divisor,
            self.fallback_frame_divisor,
            self.min_plausible_frames,
            self.tolerance_for("Yeast"),
            self.tolerance_for(""),
            self.arenas.len(),
            self.substrates.len(),
            self.larva_types.len(),
        )
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_default_tolerances() {
        let config = PipelineConfig::default();
        assert_eq!(config.tolerance_for("Yeast"), 1.25);
        assert_eq!(config.tolerance_for("Agar"), 2.5);
        assert_eq!(config.tolerance_for("Apple_juice"), 2.5);
    }

    #[test]
    fn test_patch_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.patch_layout("Two_patches"), PatchLayout::Two);
        assert_eq!(config.patch_layout("Nonnutrient_patches"), PatchLayout::Two);
        assert_eq!(config.patch_layout("Eight_patches"), PatchLayout::Eight);
        assert_eq!(config.patch_layout("Homogeneous"), PatchLayout::None);
    }

    #[test]
    fn test_builder_validation() {
        assert!(PipelineConfig::builder().scale(4.0).build().is_ok());
        assert_eq!(
            PipelineConfig::builder().scale(0.0).build().unwrap_err(),
            LarvaTrackError::InvalidConfig("scale must be > 0".into())
        );
        assert_eq!(
            PipelineConfig::builder().dt(-1.0).build().unwrap_err(),
            LarvaTrackError::InvalidConfig("dt must be > 0".into())
        );
        assert!(PipelineConfig::builder()
            .primary_frame_divisor(0)
            .build()
            .is_err());
        assert!(PipelineConfig::builder()
            .substrates(Vec::<String>::new())
            .build()
            .is_err());
    }
}
