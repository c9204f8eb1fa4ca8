//! # Session table reading and cleaning
//!
//! A FIMTrack export holds one column per tracked larva. Each column stacks the x coordinates
//! of every frame, then the y coordinates, and (for full exports) a long tail of other
//! per-frame features. Minimal exports hold only the coordinate block.
//!
//! ## Overview
//! -----------------
//! * [`RawSessionTable`] – header-less CSV read into columns; non-numeric columns are flagged.
//! * [`infer_frame_count`] – recovers the length of the coordinate block from the row count.
//! * [`clean_session_table`] – keeps numeric columns, truncates to the coordinate block,
//!   drops all-missing columns and renames the survivors `exp{session}_larva_{i}`.
//!
//! ## Missing values
//! -----------------
//! Empty cells and the tokens `NaN`, `nan`, `NA`, `N/A`, `null` read as `f64::NAN`.
//! Any other cell that does not parse as a float makes its whole column non-numeric.
use camino::Utf8Path;

use crate::{config::PipelineConfig, LarvaTrackError};

const MISSING_TOKENS: [&str; 6] = ["", "NaN", "nan", "NA", "N/A", "null"];

#[derive(Debug, Clone, PartialEq)]
enum RawColumn {
    Numeric(Vec<f64>),
    Text,
}

/// One recording session as exported by the tracker, before any cleaning.
///
/// Rows shorter than the widest row are padded with missing values, so every
/// numeric column has exactly [`RawSessionTable::n_rows`] entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSessionTable {
    columns: Vec<RawColumn>,
    n_rows: usize,
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if MISSING_TOKENS.contains(&cell) {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

impl RawSessionTable {
    /// Read a header-less CSV session table.
    ///
    /// Arguments
    /// -----------------
    /// * `path` – Path of the `table{n}.csv` file.
    ///
    /// Return
    /// ----------
    /// * The raw table, or [`LarvaTrackError::MissingFile`] / [`LarvaTrackError::CsvError`].
    pub fn from_csv(path: &Utf8Path) -> Result<Self, LarvaTrackError> {
        if !path.is_file() {
            return Err(LarvaTrackError::MissingFile(path.to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }
        Ok(Self::from_rows(rows))
    }

    /// Build a table from row-major string cells.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rows: Vec<Vec<S>> = rows.into_iter().map(|r| r.into_iter().collect()).collect();
        let n_rows = rows.len();
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);

        let columns = (0..n_cols)
            .map(|j| {
                let mut values = Vec::with_capacity(n_rows);
                for row in &rows {
                    let cell: &str = row.get(j).map(|c| c.as_ref()).unwrap_or("");
                    match parse_cell(cell) {
                        Some(v) => values.push(v),
                        None => return RawColumn::Text,
                    }
                }
                RawColumn::Numeric(values)
            })
            .collect();

        RawSessionTable { columns, n_rows }
    }

    /// Build a table from numeric columns; shorter columns are padded with NaN.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Self {
        let n_rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        let columns = columns
            .into_iter()
            .map(|mut c| {
                c.resize(n_rows, f64::NAN);
                RawColumn::Numeric(c)
            })
            .collect();
        RawSessionTable { columns, n_rows }
    }

    /// Total number of rows, trailing padding included.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns, numeric or not.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    fn numeric_columns(&self) -> impl Iterator<Item = &Vec<f64>> {
        self.columns.iter().filter_map(|c| match c {
            RawColumn::Numeric(v) => Some(v),
            RawColumn::Text => None,
        })
    }
}

/// Infer the length of the stacked x/y coordinate block from a table's row count.
///
/// Full exports carry the coordinate block followed by other per-frame features, roughly
/// `primary_frame_divisor` times as many rows as the coordinate block. Minimal exports hold
/// the coordinate block only. Since no recording is shorter than `min_plausible_frames`,
/// a primary result below that floor means the table was already minimal.
///
/// Arguments
/// -----------------
/// * `n_rows` – Row count of the table (numeric columns only, padding included).
/// * `config` – Supplies `primary_frame_divisor`, `fallback_frame_divisor`, `min_plausible_frames`.
///
/// Return
/// ----------
/// * The inferred number of rows of the coordinate block (x then y, so normally even).
pub fn infer_frame_count(n_rows: usize, config: &PipelineConfig) -> usize {
    let frames = n_rows / config.primary_frame_divisor;
    if frames < config.min_plausible_frames {
        n_rows / config.fallback_frame_divisor
    } else {
        frames
    }
}

/// Session table restricted to the coordinate block, with canonical column names.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSessionTable {
    /// 1-based session index.
    pub session: u8,
    /// Rows kept per column (x block then y block).
    pub frames: usize,
    /// `(canonical name, stacked coordinates)` in column order.
    pub columns: Vec<(String, Vec<f64>)>,
}

impl CleanedSessionTable {
    /// Frame count of every column, in column order.
    pub fn frame_record(&self) -> Vec<usize> {
        vec![self.frames; self.columns.len()]
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Canonical name of the `index`-th surviving column of a session.
pub fn canonical_column_name(session: u8, index: usize) -> String {
    format!("exp{session}_larva_{index}")
}

/// Clean one raw session table.
///
/// Steps: keep numeric columns, truncate to [`infer_frame_count`] rows, drop the columns that
/// are entirely missing, rename the survivors with [`canonical_column_name`].
///
/// Arguments
/// -----------------
/// * `raw` – The table as read from disk.
/// * `session` – 1-based session index (`1`, `2` or `3`).
/// * `config` – Frame-count inference parameters.
///
/// Return
/// ----------
/// * The cleaned table, or [`LarvaTrackError::OddFrameCount`] when the inferred block
///   cannot be split into equal x and y halves.
pub fn clean_session_table(
    raw: &RawSessionTable,
    session: u8,
    config: &PipelineConfig,
) -> Result<CleanedSessionTable, LarvaTrackError> {
    let frames = infer_frame_count(raw.n_rows(), config);
    if frames % 2 != 0 {
        return Err(LarvaTrackError::OddFrameCount {
            table: session,
            frames,
        });
    }

    let columns = raw
        .numeric_columns()
        .map(|c| &c[..frames.min(c.len())])
        .filter(|c| c.iter().any(|v| !v.is_nan()))
        .enumerate()
        .map(|(i, c)| (canonical_column_name(session, i), c.to_vec()))
        .collect();

    Ok(CleanedSessionTable {
        session,
        frames,
        columns,
    })
}

#[cfg(test)]
mod session_table_test {
    use super::*;

    fn column(len: usize, value: f64) -> Vec<f64> {
        vec![value; len]
    }

    #[test]
    fn test_infer_frame_count_primary_path() {
        let config = PipelineConfig::default();
        assert_eq!(infer_frame_count(60_000, &config), 4000);
        assert_eq!(infer_frame_count(60_014, &config), 4000);
        assert_eq!(infer_frame_count(150_000, &config), 10_000);
    }

    #[test]
    fn test_infer_frame_count_fallback_path() {
        let config = PipelineConfig::default();
        assert_eq!(infer_frame_count(120, &config), 120);
        assert_eq!(infer_frame_count(4000, &config), 4000);
        assert_eq!(infer_frame_count(59_999, &config), 59_999);
    }

    #[test]
    fn test_parse_cells() {
        let raw = RawSessionTable::from_rows(vec![
            vec!["1.5", "a", ""],
            vec!["2", "b", "NaN"],
            vec!["3", "c"],
        ]);
        assert_eq!(raw.n_rows(), 3);
        assert_eq!(raw.n_columns(), 3);
        let numeric: Vec<_> = raw.numeric_columns().collect();
        assert_eq!(numeric.len(), 2);
        assert_eq!(numeric[0], &vec![1.5, 2.0, 3.0]);
        assert!(numeric[1].iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_clean_drops_text_and_empty_columns() {
        let config = PipelineConfig::default();
        let mut rows = Vec::new();
        for i in 0..120 {
            let v = i.to_string();
            rows.push(vec![v.clone(), "label".to_string(), String::new(), v]);
        }
        let raw = RawSessionTable::from_rows(rows);
        let cleaned = clean_session_table(&raw, 2, &config).unwrap();

        assert_eq!(cleaned.frames, 120);
        assert_eq!(cleaned.n_columns(), 2);
        assert_eq!(cleaned.columns[0].0, "exp2_larva_0");
        assert_eq!(cleaned.columns[1].0, "exp2_larva_1");
        assert_eq!(cleaned.frame_record(), vec![120, 120]);
    }

    #[test]
    fn test_clean_truncates_to_coordinate_block() {
        let config = PipelineConfig::default();
        let raw = RawSessionTable::from_columns(vec![column(60_000, 1.0), column(60_000, 2.0)]);
        let cleaned = clean_session_table(&raw, 1, &config).unwrap();
        assert_eq!(cleaned.frames, 4000);
        assert!(cleaned.columns.iter().all(|(_, c)| c.len() == 4000));
    }

    #[test]
    fn test_clean_drops_column_missing_in_block_only() {
        // NaN over the whole coordinate block but values in the feature tail
        let config = PipelineConfig::default();
        let mut tail_only = vec![f64::NAN; 60_000];
        tail_only[5000] = 3.0;
        let raw = RawSessionTable::from_columns(vec![column(60_000, 1.0), tail_only]);
        let cleaned = clean_session_table(&raw, 1, &config).unwrap();
        assert_eq!(cleaned.n_columns(), 1);
    }

    #[test]
    fn test_clean_odd_frame_count() {
        let config = PipelineConfig::default();
        let raw = RawSessionTable::from_columns(vec![column(121, 1.0)]);
        assert_eq!(
            clean_session_table(&raw, 3, &config).unwrap_err(),
            LarvaTrackError::OddFrameCount {
                table: 3,
                frames: 121
            }
        );
    }

    #[test]
    fn test_missing_file() {
        let err = RawSessionTable::from_csv(Utf8Path::new("does/not/exist/table1.csv"))
            .unwrap_err();
        assert_eq!(
            err,
            LarvaTrackError::MissingFile("does/not/exist/table1.csv".into())
        );
    }
}
