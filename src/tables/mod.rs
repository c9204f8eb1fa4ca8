//! # Tracker tables: reading, cleaning and stitching
//!
//! * [`session_table`](crate::tables::session_table) – read one `table{n}.csv`, infer its frame
//!   count and reduce it to the canonical coordinate block.
//! * [`stitcher`](crate::tables::stitcher) – concatenate the cleaned sessions of a condition
//!   directory into one table keyed by `(ExperimentLabel, LarvaLabel)`.
pub mod session_table;
pub mod stitcher;

pub use session_table::{
    clean_session_table, infer_frame_count, CleanedSessionTable, RawSessionTable,
};
pub use stitcher::{stitch_sessions, StitchedColumn, StitchedTable};
