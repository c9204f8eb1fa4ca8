//! # Dataset: keyed storage of all trajectories
//!
//! [`Dataset`] maps a [`TrajectoryKey`] (arena, substrate, larva type, experiment, larva)
//! to exactly one [`Trajectory`]. Next to the map it maintains an explicit **prefix index**,
//! updated on every insertion, so that downstream consumers can enumerate the hierarchy
//! level by level without scanning the keys.
//!
//! Modules
//! -----------------
//! * [`key`](crate::dataset::key) – labels, arena normalization, [`TrajectoryKey`].
//! * [`assembler`](crate::dataset::assembler) – builds the dataset of one condition directory.
//!
//! Read interface
//! -----------------
//! * [`Dataset::lookup`] / [`Dataset::get`] – exact-key access.
//! * [`Dataset::substrates`], [`Dataset::larva_types`], [`Dataset::experiments`],
//!   [`Dataset::larvae`] – sorted distinct values under a key prefix.
//!
//! Persistence
//! -----------------
//! The dataset serializes as a JSON list of `[key, trajectory]` records
//! ([`Dataset::save`]); [`Dataset::load`] rebuilds the map and the prefix index.
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter};

use ahash::RandomState;
use camino::Utf8Path;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{trajectories::Trajectory, LarvaTrackError};

pub mod assembler;
pub mod key;

pub use key::{arena_category, ExperimentLabel, LarvaLabel, TrajectoryKey};

type Prefix1 = String;
type Prefix2 = (String, String);
type Prefix3 = (String, String, String);
type Prefix4 = (String, String, String, ExperimentLabel);

/// Distinct child values under every key prefix.
#[derive(Debug, Clone, Default, PartialEq)]
struct PrefixIndex {
    substrates: HashMap<Prefix1, BTreeSet<String>, RandomState>,
    larva_types: HashMap<Prefix2, BTreeSet<String>, RandomState>,
    experiments: HashMap<Prefix3, BTreeSet<ExperimentLabel>, RandomState>,
    larvae: HashMap<Prefix4, BTreeSet<LarvaLabel>, RandomState>,
}

impl PrefixIndex {
    fn insert(&mut self, key: &TrajectoryKey) {
        let arena = key.arena.clone();
        let substrate = key.substrate.clone();
        let larva_type = key.larva_type.clone();

        self.substrates
            .entry(arena.clone())
            .or_default()
            .insert(substrate.clone());
        self.larva_types
            .entry((arena.clone(), substrate.clone()))
            .or_default()
            .insert(larva_type.clone());
        self.experiments
            .entry((arena.clone(), substrate.clone(), larva_type.clone()))
            .or_default()
            .insert(key.experiment);
        self.larvae
            .entry((arena, substrate, larva_type, key.experiment))
            .or_default()
            .insert(key.larva);
    }
}

/// All trajectories of a run, keyed by condition and individual.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: HashMap<TrajectoryKey, Trajectory, RandomState>,
    index: PrefixIndex,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one trajectory.
    ///
    /// Return
    /// ----------
    /// * [`LarvaTrackError::DuplicateTrajectoryKey`] if the key is already present; the
    ///   dataset is left unchanged.
    pub fn insert(
        &mut self,
        key: TrajectoryKey,
        trajectory: Trajectory,
    ) -> Result<(), LarvaTrackError> {
        if self.records.contains_key(&key) {
            return Err(LarvaTrackError::DuplicateTrajectoryKey(key.to_string()));
        }
        self.index.insert(&key);
        self.records.insert(key, trajectory);
        Ok(())
    }

    /// Move every record of `other` into `self`.
    ///
    /// Return
    /// ----------
    /// * [`LarvaTrackError::DuplicateTrajectoryKey`] on the first colliding key.
    pub fn merge(&mut self, other: Dataset) -> Result<(), LarvaTrackError> {
        self.records.reserve(other.records.len());
        for (key, trajectory) in other.records {
            self.insert(key, trajectory)?;
        }
        Ok(())
    }

    pub fn get(&self, key: &TrajectoryKey) -> Option<&Trajectory> {
        self.records.get(key)
    }

    /// Exact lookup by the five key levels.
    pub fn lookup(
        &self,
        arena: &str,
        substrate: &str,
        larva_type: &str,
        experiment: ExperimentLabel,
        larva: LarvaLabel,
    ) -> Option<&Trajectory> {
        self.get(&TrajectoryKey::new(
            arena, substrate, larva_type, experiment, larva,
        ))
    }

    /// Substrates recorded under an arena category.
    pub fn substrates(&self, arena: &str) -> Vec<&str> {
        self.index
            .substrates
            .get(arena)
            .map(|s| s.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Larva types recorded under `(arena, substrate)`.
    pub fn larva_types(&self, arena: &str, substrate: &str) -> Vec<&str> {
        self.index
            .larva_types
            .get(&(arena.to_string(), substrate.to_string()))
            .map(|s| s.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Experiments recorded under `(arena, substrate, larva_type)`.
    pub fn experiments(
        &self,
        arena: &str,
        substrate: &str,
        larva_type: &str,
    ) -> Vec<ExperimentLabel> {
        self.index
            .experiments
            .get(&(
                arena.to_string(),
                substrate.to_string(),
                larva_type.to_string(),
            ))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Larvae recorded under `(arena, substrate, larva_type, experiment)`.
    pub fn larvae(
        &self,
        arena: &str,
        substrate: &str,
        larva_type: &str,
        experiment: ExperimentLabel,
    ) -> Vec<LarvaLabel> {
        self.index
            .larvae
            .get(&(
                arena.to_string(),
                substrate.to_string(),
                larva_type.to_string(),
                experiment,
            ))
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Arena categories present, sorted.
    pub fn arenas(&self) -> Vec<&str> {
        let mut arenas: Vec<&str> = self.index.substrates.keys().map(String::as_str).collect();
        arenas.sort_unstable();
        arenas
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&TrajectoryKey, &Trajectory)> {
        self.records.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TrajectoryKey> {
        self.records.keys()
    }

    /// Write the dataset as JSON.
    pub fn save(&self, path: &Utf8Path) -> Result<(), LarvaTrackError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Read a dataset written by [`Dataset::save`].
    pub fn load(path: &Utf8Path) -> Result<Self, LarvaTrackError> {
        if !path.is_file() {
            return Err(LarvaTrackError::MissingFile(path.to_string()));
        }
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // sorted, so that two runs over the same data write the same file
        let mut records: Vec<_> = self.records.iter().collect();
        records.sort_unstable_by(|a, b| a.0.cmp(b.0));
        serializer.collect_seq(records)
    }
}

impl<'de> Deserialize<'de> for Dataset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<(TrajectoryKey, Trajectory)>::deserialize(deserializer)?;
        let mut dataset = Dataset::new();
        for (key, trajectory) in records {
            dataset
                .insert(key, trajectory)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(dataset)
    }
}
