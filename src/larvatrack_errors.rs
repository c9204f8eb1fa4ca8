use thiserror::Error;

/// Errors raised by the trajectory preprocessing pipeline.
///
/// Variants are grouped the way the pipeline treats them:
///
/// * **Structural** – a required directory or file is absent, or cannot be read.
/// * **Format** – the exported tables do not have the expected shape or naming.
/// * **Data integrity** – a reconstructed track carries no usable sample.
/// * **Configuration / persistence** – invalid parameters, serialization failures.
///
/// None of them is recovered locally: every error aborts the run.
#[derive(Error, Debug)]
pub enum LarvaTrackError {
    // --- Structural ---
    #[error("Directory `{0}` does not exist")]
    MissingDirectory(String),

    #[error("Required file `{0}` does not exist")]
    MissingFile(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV reading error: {0}")]
    CsvError(#[from] csv::Error),

    // --- Format ---
    #[error("Odd number of frames ({frames}) on table {table}")]
    OddFrameCount { table: u8, frames: usize },

    #[error("Wrong column key, cannot parse: {0}")]
    InvalidColumnKey(String),

    #[error("Wrong experiment label: {0}")]
    InvalidExperimentLabel(String),

    #[error("Invalid number of sessions: {0} (expected 1 to 3)")]
    InvalidSessionCount(usize),

    #[error("Invalid patch table `{path}`: {reason}")]
    InvalidPatchTable { path: String, reason: String },

    #[error("Duplicate column key in stitched table: {0}")]
    DuplicateColumnKey(String),

    #[error("Duplicate trajectory key in dataset: {0}")]
    DuplicateTrajectoryKey(String),

    // --- Data integrity ---
    #[error("All x values are NaN for trajectory {0}")]
    AllNaNTrajectory(String),

    // --- Configuration / persistence ---
    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PartialEq for LarvaTrackError {
    fn eq(&self, other: &Self) -> bool {
        use LarvaTrackError::*;
        match (self, other) {
            (MissingDirectory(a), MissingDirectory(b)) => a == b,
            (MissingFile(a), MissingFile(b)) => a == b,

            // Wrapped errors are not comparable: same variant means equal
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,

            (
                OddFrameCount {
                    table: ta,
                    frames: fa,
                },
                OddFrameCount {
                    table: tb,
                    frames: fb,
                },
            ) => ta == tb && fa == fb,
            (InvalidColumnKey(a), InvalidColumnKey(b)) => a == b,
            (InvalidExperimentLabel(a), InvalidExperimentLabel(b)) => a == b,
            (InvalidSessionCount(a), InvalidSessionCount(b)) => a == b,
            (
                InvalidPatchTable {
                    path: pa,
                    reason: ra,
                },
                InvalidPatchTable {
                    path: pb,
                    reason: rb,
                },
            ) => pa == pb && ra == rb,
            (DuplicateColumnKey(a), DuplicateColumnKey(b)) => a == b,
            (DuplicateTrajectoryKey(a), DuplicateTrajectoryKey(b)) => a == b,
            (AllNaNTrajectory(a), AllNaNTrajectory(b)) => a == b,
            (InvalidConfig(a), InvalidConfig(b)) => a == b,

            _ => false,
        }
    }
}
