#![allow(dead_code)]

use std::fmt::Write as _;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Temporary data root, removed on drop.
pub struct DataRoot {
    _tmp: TempDir,
    pub path: Utf8PathBuf,
}

impl DataRoot {
    /// Empty root with the given arena directories.
    pub fn with_arenas(arenas: &[&str]) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
        for arena in arenas {
            fs::create_dir_all(path.join(arena)).unwrap();
        }
        DataRoot { _tmp: tmp, path }
    }

    /// Create (and return) `root/arena/substrate/larva`.
    pub fn condition_dir(&self, arena: &str, substrate: &str, larva: &str) -> Utf8PathBuf {
        let dir = self.path.join(arena).join(substrate).join(larva);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}

/// Pixel position of `larva` at `sample`: a slow wandering path, distinct per larva.
pub fn larva_position(larva: usize, sample: usize) -> (f64, f64) {
    let t = sample as f64;
    let k = (larva + 1) as f64;
    (
        400.0 + 150.0 * (t * 0.004 * k).sin() + 2.0 * t.sqrt(),
        300.0 + 120.0 * (t * 0.003 * k).cos(),
    )
}

/// Stacked column (x block then y block) of `n_samples` samples; the first
/// `untracked` samples are empty cells.
pub fn stacked_column(larva: usize, n_samples: usize, untracked: usize) -> Vec<String> {
    let positions: Vec<(f64, f64)> = (0..n_samples).map(|s| larva_position(larva, s)).collect();
    let cell = |s: usize, v: f64| if s < untracked { String::new() } else { format!("{v:.3}") };

    let mut column: Vec<String> = positions
        .iter()
        .enumerate()
        .map(|(s, p)| cell(s, p.0))
        .collect();
    column.extend(positions.iter().enumerate().map(|(s, p)| cell(s, p.1)));
    column
}

/// Write `table{session}.csv` with `n_larvae` minimal-export columns of `frames` rows.
///
/// When `with_label_column` is set, a leading non-numeric column is written.
pub fn write_session_table(
    dir: &Utf8Path,
    session: u8,
    n_larvae: usize,
    frames: usize,
    with_label_column: bool,
) {
    write_table(dir, session, n_larvae, frames, frames, with_label_column);
}

/// Write a full export: the coordinate block followed by feature rows, `total_rows` in all.
pub fn write_table(
    dir: &Utf8Path,
    session: u8,
    n_larvae: usize,
    frames: usize,
    total_rows: usize,
    with_label_column: bool,
) {
    let columns: Vec<Vec<String>> = (0..n_larvae)
        .map(|larva| stacked_column(larva, frames / 2, larva % 3))
        .collect();

    let mut content = String::new();
    for row in 0..total_rows {
        let mut cells: Vec<String> = Vec::with_capacity(n_larvae + 1);
        if with_label_column {
            cells.push(format!("row{row}"));
        }
        for column in &columns {
            let cell = match column.get(row) {
                Some(c) => c.clone(),
                None => format!("{}", (row % 97) as f64 * 0.5),
            };
            cells.push(cell);
        }
        writeln!(content, "{}", cells.join(",")).unwrap();
    }
    fs::write(dir.join(format!("table{session}.csv")), content).unwrap();
}

/// Write `ROI_coord{session}.csv` with `n_patches` rows `id,x,y,circumference`.
pub fn write_roi_table(dir: &Utf8Path, session: u8, n_patches: usize, with_header: bool) {
    let mut content = String::new();
    if with_header {
        content.push_str("id,x,y,circumference\n");
    }
    for k in 0..n_patches {
        let x = 160.0 * (k + 1) as f64;
        let y = 80.0 * session as f64;
        let circumference = 2.0 * std::f64::consts::PI * 8.0 * (10.0 + k as f64);
        writeln!(content, "{k},{x},{y},{circumference}").unwrap();
    }
    fs::write(dir.join(format!("ROI_coord{session}.csv")), content).unwrap();
}
