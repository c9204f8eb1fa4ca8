//! # Food patch geometry (regions of interest)
//!
//! Patch arenas come with one ROI table per session, `ROI_coord{n}.csv`. Each data row
//! describes one circular patch: `id, x-center, y-center, circumference`, in pixels.
//! Eight-patch tables start with a header row that is skipped.
//!
//! [`load_patch_geometry`] reads the tables of a directory and converts them to millimeters;
//! [`PatchSet::for_experiment`] returns the patches of one session.
use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{roi_table_name, Millimeter, Pixel, DPI},
    dataset::key::ExperimentLabel,
    trajectories::coordinates::pixels_to_mm,
    LarvaTrackError,
};

/// Patch layout of an arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchLayout {
    /// No patches (homogeneous arenas).
    None,
    /// Two patches per session.
    Two,
    /// Eight patches per session; ROI tables carry a header row.
    Eight,
}

impl PatchLayout {
    /// Number of patches per session.
    pub fn n_patches(&self) -> usize {
        match self {
            PatchLayout::None => 0,
            PatchLayout::Two => 2,
            PatchLayout::Eight => 8,
        }
    }

    pub fn has_patches(&self) -> bool {
        !matches!(self, PatchLayout::None)
    }

    fn skipped_rows(&self) -> usize {
        match self {
            PatchLayout::Eight => 1,
            _ => 0,
        }
    }
}

/// A circular patch, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub center_x: Millimeter,
    pub center_y: Millimeter,
    pub radius: Millimeter,
}

impl Patch {
    /// Convert a pixel-space ROI row (center and circumference) to millimeters.
    pub fn from_pixels(center_x: Pixel, center_y: Pixel, circumference: Pixel, scale: f64) -> Self {
        Patch {
            center_x: pixels_to_mm(center_x, scale),
            center_y: pixels_to_mm(center_y, scale),
            radius: circumference / (DPI * scale),
        }
    }
}

/// Patches of every session of a condition directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSet {
    by_experiment: BTreeMap<ExperimentLabel, Vec<Patch>>,
}

impl PatchSet {
    /// Patches of one session.
    ///
    /// Return
    /// ----------
    /// * [`LarvaTrackError::InvalidExperimentLabel`] when no table was loaded for `experiment`.
    pub fn for_experiment(&self, experiment: ExperimentLabel) -> Result<&[Patch], LarvaTrackError> {
        self.by_experiment
            .get(&experiment)
            .map(Vec::as_slice)
            .ok_or_else(|| LarvaTrackError::InvalidExperimentLabel(experiment.to_string()))
    }

    pub fn insert(&mut self, experiment: ExperimentLabel, patches: Vec<Patch>) {
        self.by_experiment.insert(experiment, patches);
    }

    /// Number of sessions with patches.
    pub fn len(&self) -> usize {
        self.by_experiment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_experiment.is_empty()
    }
}

fn invalid_table(path: &Utf8Path, reason: impl Into<String>) -> LarvaTrackError {
    LarvaTrackError::InvalidPatchTable {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Read one ROI table.
///
/// Arguments
/// -----------------
/// * `path` – The `ROI_coord{n}.csv` file.
/// * `layout` – Gives the number of patches and whether a header row must be skipped.
/// * `scale` – Pixels per millimeter.
///
/// Return
/// ----------
/// * Exactly `layout.n_patches()` patches, taken from the first data rows.
/// * [`LarvaTrackError::MissingFile`], [`LarvaTrackError::CsvError`], or
///   [`LarvaTrackError::InvalidPatchTable`] (too few rows, too few columns, non-numeric cell).
pub fn read_patch_table(
    path: &Utf8Path,
    layout: PatchLayout,
    scale: f64,
) -> Result<Vec<Patch>, LarvaTrackError> {
    if !path.is_file() {
        return Err(LarvaTrackError::MissingFile(path.to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let n_patches = layout.n_patches();
    let mut patches = Vec::with_capacity(n_patches);

    for (row, record) in reader
        .records()
        .skip(layout.skipped_rows())
        .take(n_patches)
        .enumerate()
    {
        let record = record?;
        let field = |col: usize| -> Result<f64, LarvaTrackError> {
            let cell = record
                .get(col)
                .ok_or_else(|| invalid_table(path, format!("row {row} has no column {col}")))?;
            cell.trim().parse::<f64>().map_err(|_| {
                invalid_table(path, format!("row {row}, column {col}: `{cell}` is not a number"))
            })
        };
        patches.push(Patch::from_pixels(field(1)?, field(2)?, field(3)?, scale));
    }

    if patches.len() != n_patches {
        return Err(invalid_table(
            path,
            format!("expected {n_patches} patches, found {}", patches.len()),
        ));
    }
    Ok(patches)
}

/// Load the ROI tables of a condition directory.
///
/// Arguments
/// -----------------
/// * `dir` – The condition directory.
/// * `layout` – Patch layout of its arena; [`PatchLayout::None`] yields an empty set.
/// * `n_sessions` – Sessions present (one ROI table per session).
/// * `scale` – Pixels per millimeter.
pub fn load_patch_geometry(
    dir: &Utf8Path,
    layout: PatchLayout,
    n_sessions: usize,
    scale: f64,
) -> Result<PatchSet, LarvaTrackError> {
    let mut set = PatchSet::default();
    if !layout.has_patches() {
        return Ok(set);
    }

    for session in 1..=n_sessions as u32 {
        let experiment = ExperimentLabel::new(session)?;
        let path = dir.join(roi_table_name(experiment.session()));
        set.insert(experiment, read_patch_table(&path, layout, scale)?);
    }
    Ok(set)
}

#[cfg(test)]
mod patches_test {
    use super::*;
    use approx::assert_relative_eq;
    use camino::Utf8PathBuf;
    use std::fs;

    fn write(dir: &Utf8Path, name: &str, content: &str) -> Utf8PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_patch_from_pixels() {
        let patch = Patch::from_pixels(800.0, 400.0, 2.0 * std::f64::consts::PI * 80.0, 8.0);
        assert_relative_eq!(patch.center_x, 100.0);
        assert_relative_eq!(patch.center_y, 50.0);
        assert_relative_eq!(patch.radius, 10.0);
    }

    #[test]
    fn test_read_two_patch_table() {
        let (_tmp, dir) = temp_dir();
        let path = write(&dir, "ROI_coord1.csv", "0,800,400,502.6548\n1,1600,400,251.3274\n");
        let patches = read_patch_table(&path, PatchLayout::Two, 8.0).unwrap();
        assert_eq!(patches.len(), 2);
        assert_relative_eq!(patches[1].center_x, 200.0);
        assert_relative_eq!(patches[0].radius, 502.6548 / (DPI * 8.0));
    }

    #[test]
    fn test_read_eight_patch_table_skips_header() {
        let (_tmp, dir) = temp_dir();
        let mut content = String::from("id,x,y,circumference\n");
        for k in 0..8 {
            content.push_str(&format!("{k},{},{},100\n", 80 * (k + 1), 40 * (k + 1)));
        }
        let path = write(&dir, "ROI_coord1.csv", &content);
        let patches = read_patch_table(&path, PatchLayout::Eight, 8.0).unwrap();
        assert_eq!(patches.len(), 8);
        assert_relative_eq!(patches[0].center_x, 10.0);
        assert_relative_eq!(patches[7].center_y, 40.0);
    }

    #[test]
    fn test_read_patch_table_errors() {
        let (_tmp, dir) = temp_dir();
        let path = write(&dir, "short.csv", "0,800,400,100\n");
        assert_eq!(
            read_patch_table(&path, PatchLayout::Two, 8.0).unwrap_err(),
            LarvaTrackError::InvalidPatchTable {
                path: path.to_string(),
                reason: "expected 2 patches, found 1".into()
            }
        );

        let path = write(&dir, "text.csv", "0,800,abc,100\n1,1,1,1\n");
        assert!(matches!(
            read_patch_table(&path, PatchLayout::Two, 8.0),
            Err(LarvaTrackError::InvalidPatchTable { .. })
        ));

        let missing = dir.join("ROI_coord9.csv");
        assert_eq!(
            read_patch_table(&missing, PatchLayout::Two, 8.0).unwrap_err(),
            LarvaTrackError::MissingFile(missing.to_string())
        );
    }

    #[test]
    fn test_load_patch_geometry() {
        let (_tmp, dir) = temp_dir();
        write(&dir, "ROI_coord1.csv", "0,8,8,100\n1,16,16,100\n");
        write(&dir, "ROI_coord2.csv", "0,24,24,100\n1,32,32,100\n");

        let set = load_patch_geometry(&dir, PatchLayout::Two, 2, 8.0).unwrap();
        assert_eq!(set.len(), 2);
        let exp2 = ExperimentLabel::new(2).unwrap();
        assert_relative_eq!(set.for_experiment(exp2).unwrap()[0].center_x, 3.0);
        let exp3 = ExperimentLabel::new(3).unwrap();
        assert_eq!(
            set.for_experiment(exp3).unwrap_err(),
            LarvaTrackError::InvalidExperimentLabel("exp3".into())
        );

        assert!(load_patch_geometry(&dir, PatchLayout::None, 2, 8.0)
            .unwrap()
            .is_empty());
        assert!(matches!(
            load_patch_geometry(&dir, PatchLayout::Two, 3, 8.0),
            Err(LarvaTrackError::MissingFile(_))
        ));
    }
}
