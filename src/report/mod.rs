//! Report generation module - rendering and export of ranking tables.
//!
//! This module handles:
//! - CSV export of sorted tables, with timestamped filenames
//! - Console rendering of sorted tables with sort arrows
//! - Indicator summaries (console text and JSON)
//!
//! Low-level box drawing lives in the console_format module.
//!
//! # Module Organization
//!
//! - `export` - Delimited-text serialisation, filenames and the file-save boundary
//! - `table` - Console table output for sorted rows
//! - `summary` - Ranking, distribution and statistics output

mod export;
mod summary;
mod table;

// Re-export export functions
pub use export::{DiskSaver, ExportOutcome, build_export_filename, export_table, export_timestamp};

// Re-export table functions
pub use table::print_sorted_table;

// Re-export summary functions
pub use summary::{export_indicator_json, format_indicator_summary, indicator_json};
