//! # Session stitching
//!
//! Concatenates the cleaned tables of the 1–3 sessions of a condition directory into one
//! [`StitchedTable`], keyed by `(ExperimentLabel, LarvaLabel)`, with an aligned frame-count row.
//!
//! Three sessions is the nominal layout; two sessions happens in the published data and is
//! accepted with a warning.
use std::{collections::HashSet, sync::LazyLock};

use log::warn;
use regex::Regex;

use crate::{
    constants::MAX_SESSIONS,
    dataset::key::{ExperimentLabel, LarvaLabel},
    tables::session_table::CleanedSessionTable,
    LarvaTrackError,
};

static COLUMN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^exp([0-9]*)_larva_([0-9]*)$").expect("column key regex is valid")
});

/// Parse a canonical column name `exp{session}_larva_{index}`.
///
/// Return
/// ----------
/// * `(ExperimentLabel, LarvaLabel)`.
/// * [`LarvaTrackError::InvalidColumnKey`] when the name does not match the pattern.
/// * [`LarvaTrackError::InvalidExperimentLabel`] when the session is outside `1..=3`.
pub fn parse_column_key(name: &str) -> Result<(ExperimentLabel, LarvaLabel), LarvaTrackError> {
    let invalid = || LarvaTrackError::InvalidColumnKey(name.to_string());

    let caps = COLUMN_KEY.captures(name).ok_or_else(invalid)?;
    let session = caps[1].parse::<u32>().map_err(|_| invalid())?;
    let larva = caps[2].parse::<u32>().map_err(|_| invalid())?;

    Ok((ExperimentLabel::new(session)?, LarvaLabel::new(larva)))
}

/// One stacked coordinate column of a stitched table.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedColumn {
    pub experiment: ExperimentLabel,
    pub larva: LarvaLabel,
    /// Rows of the coordinate block (x block then y block).
    pub frames: usize,
    pub values: Vec<f64>,
}

/// All columns of a condition directory, session after session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StitchedTable {
    pub columns: Vec<StitchedColumn>,
    /// Number of sessions that were stitched.
    pub n_sessions: usize,
}

impl StitchedTable {
    /// Frame-count row aligned with [`StitchedTable::columns`].
    pub fn frame_row(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.frames).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Warning logged when a directory holds fewer than [`MAX_SESSIONS`] sessions.
fn short_session_warning(label: &str, n_sessions: usize) -> Option<String> {
    (n_sessions < MAX_SESSIONS).then(|| {
        format!("{label}: this experiment only has {n_sessions} sessions instead of {MAX_SESSIONS}")
    })
}

/// Concatenate cleaned session tables column-wise.
///
/// Arguments
/// -----------------
/// * `sessions` – One cleaned table per session, in session order.
/// * `label` – Names the condition directory in log messages.
///
/// Return
/// ----------
/// * The stitched table, or
///   [`LarvaTrackError::InvalidSessionCount`] (not 1–3 sessions),
///   [`LarvaTrackError::InvalidColumnKey`] / [`LarvaTrackError::InvalidExperimentLabel`]
///   (unparsable name), [`LarvaTrackError::DuplicateColumnKey`] (two columns with one key).
pub fn stitch_sessions(
    sessions: Vec<CleanedSessionTable>,
    label: &str,
) -> Result<StitchedTable, LarvaTrackError> {
    let n_sessions = sessions.len();
    if n_sessions == 0 || n_sessions > MAX_SESSIONS {
        return Err(LarvaTrackError::InvalidSessionCount(n_sessions));
    }
    if let Some(message) = short_session_warning(label, n_sessions) {
        warn!("{message}");
    }

    let mut seen = HashSet::new();
    let mut columns = Vec::new();

    for session in sessions {
        let frames = session.frames;
        for (name, values) in session.columns {
            let (experiment, larva) = parse_column_key(&name)?;
            if !seen.insert((experiment, larva)) {
                return Err(LarvaTrackError::DuplicateColumnKey(name));
            }
            columns.push(StitchedColumn {
                experiment,
                larva,
                frames,
                values,
            });
        }
    }

    Ok(StitchedTable {
        columns,
        n_sessions,
    })
}

#[cfg(test)]
mod stitcher_test {
    use super::*;

    fn cleaned(session: u8, frames: usize, n_larvae: usize) -> CleanedSessionTable {
        CleanedSessionTable {
            session,
            frames,
            columns: (0..n_larvae)
                .map(|i| (format!("exp{session}_larva_{i}"), vec![0.0; frames]))
                .collect(),
        }
    }

    #[test]
    fn test_parse_column_key() {
        let (exp, larva) = parse_column_key("exp2_larva_13").unwrap();
        assert_eq!(exp.to_string(), "exp2");
        assert_eq!(larva.to_string(), "L13");

        assert_eq!(
            parse_column_key("larva_13").unwrap_err(),
            LarvaTrackError::InvalidColumnKey("larva_13".into())
        );
        assert_eq!(
            parse_column_key("exp_larva_1").unwrap_err(),
            LarvaTrackError::InvalidColumnKey("exp_larva_1".into())
        );
        assert_eq!(
            parse_column_key("exp7_larva_1").unwrap_err(),
            LarvaTrackError::InvalidExperimentLabel("exp7".into())
        );
    }

    #[test]
    fn test_stitch_three_sessions() {
        let table =
            stitch_sessions(vec![cleaned(1, 8, 2), cleaned(2, 10, 3), cleaned(3, 8, 1)], "dir")
                .unwrap();
        assert_eq!(table.n_sessions, 3);
        assert_eq!(table.len(), 6);
        assert_eq!(table.frame_row(), vec![8, 8, 10, 10, 10, 8]);
        assert_eq!(table.columns[2].experiment.to_string(), "exp2");
        assert_eq!(table.columns[2].larva.to_string(), "L0");
    }

    #[test]
    fn test_stitch_session_count() {
        assert_eq!(
            stitch_sessions(vec![], "dir").unwrap_err(),
            LarvaTrackError::InvalidSessionCount(0)
        );
        let four = (1..=4).map(|s| cleaned(s.min(3), 4, 1)).collect();
        assert_eq!(
            stitch_sessions(four, "dir").unwrap_err(),
            LarvaTrackError::InvalidSessionCount(4)
        );
        assert_eq!(
            stitch_sessions(vec![cleaned(1, 4, 2), cleaned(2, 4, 2)], "dir")
                .unwrap()
                .n_sessions,
            2
        );
    }

    #[test]
    fn test_short_session_warning() {
        assert_eq!(
            short_session_warning("Homogeneous/Agar/Rover", 2).as_deref(),
            Some("Homogeneous/Agar/Rover: this experiment only has 2 sessions instead of 3")
        );
        assert_eq!(short_session_warning("Homogeneous/Agar/Rover", 3), None);

        let sessions = vec![cleaned(1, 4, 3), cleaned(2, 6, 1)];
        let table = stitch_sessions(sessions, "Two_patches/Yeast/Sitter").unwrap();
        assert_eq!(table.n_sessions, 2);
        assert_eq!(table.frame_row(), vec![4, 4, 4, 6]);
    }

    #[test]
    fn test_stitch_duplicate_key() {
        assert_eq!(
            stitch_sessions(vec![cleaned(1, 4, 2), cleaned(1, 4, 1)], "dir").unwrap_err(),
            LarvaTrackError::DuplicateColumnKey("exp1_larva_0".into())
        );
    }
}
