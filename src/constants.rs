//! # Constants and type definitions for larvatrack
//!
//! This module centralizes the **calibration constants**, the **table-repair constants**, the
//! **known experimental conditions**, and the **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Tracking calibration (pixels per millimeter, sampling interval)
//! - Frame-count inference constants for FIMTrack exports
//! - Simplification tolerances (before scaling)
//! - Arena, substrate and larva type names as they appear on disk
//! - File naming conventions of a condition directory
//!
//! Every value here is a *default*: the pipeline reads them through
//! [`PipelineConfig`](crate::config::PipelineConfig), which can override them.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, used for circumference → radius conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Camera resolution of the tracking rig, in pixels per millimeter
pub const PIXELS_PER_MM: f64 = 8.0;

/// Sampling interval of the recordings, in seconds (frame rate = 2 Hz)
pub const SAMPLING_INTERVAL: f64 = 0.5;

// -------------------------------------------------------------------------------------------------
// Frame-count inference
// -------------------------------------------------------------------------------------------------

/// Row divisor for full exports, where the coordinate block is followed by other features
pub const PRIMARY_FRAME_DIVISOR: usize = 15;

/// Row divisor for minimal exports, which contain only the coordinate block
pub const FALLBACK_FRAME_DIVISOR: usize = 1;

/// No recording has fewer rows than this in its coordinate block
pub const MIN_PLAUSIBLE_FRAMES: usize = 4000;

// -------------------------------------------------------------------------------------------------
// Simplification tolerances
// -------------------------------------------------------------------------------------------------

/// RDP tolerance numerator for yeast substrates (divided by the scale)
pub const YEAST_TOLERANCE: f64 = 10.0;

/// RDP tolerance numerator for every other substrate (divided by the scale)
pub const DEFAULT_TOLERANCE: f64 = 20.0;

// -------------------------------------------------------------------------------------------------
// Experimental conditions
// -------------------------------------------------------------------------------------------------

/// Arena directories, in processing order
pub const ARENAS: [&str; 4] = [
    "Homogeneous",
    "Two_patches",
    "Nonnutrient_patches",
    "Eight_patches",
];

/// Substrate directories, in processing order
pub const SUBSTRATES: [&str; 5] = ["Sucrose", "Yeast", "Agar", "Gel", "Apple_juice"];

/// Larva type directories, in processing order
pub const LARVA_TYPES: [&str; 3] = ["Rover", "Sitter", "Anosmic"];

/// Arenas with two circular food patches
pub const TWO_PATCH_ARENAS: [&str; 2] = ["Two_patches", "Nonnutrient_patches"];

/// Arenas with eight circular food patches
pub const EIGHT_PATCH_ARENAS: [&str; 1] = ["Eight_patches"];

/// Largest number of recording sessions per condition directory
pub const MAX_SESSIONS: usize = 3;

// -------------------------------------------------------------------------------------------------
// File naming
// -------------------------------------------------------------------------------------------------

/// Session table file name for a 1-based session index
pub fn session_table_name(session: u8) -> String {
    format!("table{session}.csv")
}

/// ROI (patch) table file name for a 1-based session index
pub fn roi_table_name(session: u8) -> String {
    format!("ROI_coord{session}.csv")
}

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Distance in pixels, as exported by the tracker
pub type Pixel = f64;
/// Distance in millimeters
pub type Millimeter = f64;
/// Duration in seconds
pub type Second = f64;
