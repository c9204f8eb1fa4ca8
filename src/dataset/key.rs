//! Hierarchical keys of the dataset.
//!
//! A trajectory is identified by five levels, outermost first:
//! arena category, substrate, larva type, experiment (session) label, larva label.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{constants::MAX_SESSIONS, LarvaTrackError};

/// Recording session of a condition directory, displayed `exp1`, `exp2` or `exp3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExperimentLabel(u8);

impl ExperimentLabel {
    /// Label of a 1-based session index.
    ///
    /// Return
    /// ----------
    /// * [`LarvaTrackError::InvalidExperimentLabel`] when `session` is outside `1..=3`.
    pub fn new(session: u32) -> Result<Self, LarvaTrackError> {
        if (1..=MAX_SESSIONS as u32).contains(&session) {
            Ok(ExperimentLabel(session as u8))
        } else {
            Err(LarvaTrackError::InvalidExperimentLabel(format!(
                "exp{session}"
            )))
        }
    }

    /// 1-based session index.
    pub fn session(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for ExperimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exp{}", self.0)
    }
}

impl FromStr for ExperimentLabel {
    type Err = LarvaTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("exp")
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or_else(|| LarvaTrackError::InvalidExperimentLabel(s.to_string()))
            .and_then(ExperimentLabel::new)
    }
}

impl TryFrom<String> for ExperimentLabel {
    type Error = LarvaTrackError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ExperimentLabel> for String {
    fn from(label: ExperimentLabel) -> Self {
        label.to_string()
    }
}

/// Larva index within a session, displayed `L{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LarvaLabel(u32);

impl LarvaLabel {
    pub fn new(index: u32) -> Self {
        LarvaLabel(index)
    }

    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for LarvaLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl FromStr for LarvaLabel {
    type Err = LarvaTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('L')
            .and_then(|n| n.parse::<u32>().ok())
            .map(LarvaLabel)
            .ok_or_else(|| LarvaTrackError::InvalidColumnKey(s.to_string()))
    }
}

impl TryFrom<String> for LarvaLabel {
    type Error = LarvaTrackError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<LarvaLabel> for String {
    fn from(label: LarvaLabel) -> Self {
        label.to_string()
    }
}

/// Normalize an arena directory name into its dataset category.
///
/// `…Nonnutrient…` → `Nonnutrient`, `…Two…` → `Two`, `…Eight…` → `Eight`, anything else
/// is kept as is. The checks run in that order, so `Nonnutrient_patches` is not `Two`.
pub fn arena_category(arena: &str) -> String {
    if arena.contains("Nonnutrient") {
        "Nonnutrient".to_string()
    } else if arena.contains("Two") {
        "Two".to_string()
    } else if arena.contains("Eight") {
        "Eight".to_string()
    } else {
        arena.to_string()
    }
}

/// Full key of one trajectory in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrajectoryKey {
    /// Normalized arena category (see [`arena_category`]).
    pub arena: String,
    pub substrate: String,
    pub larva_type: String,
    pub experiment: ExperimentLabel,
    pub larva: LarvaLabel,
}

impl TrajectoryKey {
    pub fn new(
        arena: impl Into<String>,
        substrate: impl Into<String>,
        larva_type: impl Into<String>,
        experiment: ExperimentLabel,
        larva: LarvaLabel,
    ) -> Self {
        TrajectoryKey {
            arena: arena.into(),
            substrate: substrate.into(),
            larva_type: larva_type.into(),
            experiment,
            larva,
        }
    }
}

impl fmt::Display for TrajectoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.arena, self.substrate, self.larva_type, self.experiment, self.larva
        )
    }
}

#[cfg(test)]
mod key_test {
    use super::*;

    #[test]
    fn test_experiment_label() {
        assert_eq!(ExperimentLabel::new(2).unwrap().to_string(), "exp2");
        assert_eq!(
            "exp3".parse::<ExperimentLabel>().unwrap(),
            ExperimentLabel::new(3).unwrap()
        );
        assert_eq!(
            ExperimentLabel::new(4).unwrap_err(),
            LarvaTrackError::InvalidExperimentLabel("exp4".into())
        );
        assert_eq!(
            "exp0".parse::<ExperimentLabel>().unwrap_err(),
            LarvaTrackError::InvalidExperimentLabel("exp0".into())
        );
        assert!("session1".parse::<ExperimentLabel>().is_err());
    }

    #[test]
    fn test_larva_label_order_is_numeric() {
        let mut labels: Vec<LarvaLabel> = ["L10", "L2", "L0"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        labels.sort();
        let shown: Vec<String> = labels.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["L0", "L2", "L10"]);
    }

    #[test]
    fn test_arena_category() {
        assert_eq!(arena_category("Nonnutrient_patches"), "Nonnutrient");
        assert_eq!(arena_category("Two_patches"), "Two");
        assert_eq!(arena_category("Eight_patches"), "Eight");
        assert_eq!(arena_category("Homogeneous"), "Homogeneous");
    }
}
