//! Table export to delimited text (CSV).
//!
//! This module handles:
//! - Serialising rows + column descriptors to CSV text
//! - Building timestamped export filenames
//! - Handing the text to a `FileSaver` and reporting the outcome without panicking

use crate::report::summary::format_value;
use crate::types::{ColumnDescriptor, Row, raw_text_of};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Extension of exported files
pub const EXPORT_EXTENSION: &str = "csv";

/// Content type handed to the file saver
pub const CSV_CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// How many numbered variants of a filename `DiskSaver` tries before giving up
const MAX_NAME_ATTEMPTS: usize = 100;

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn format_cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) if n.is_f64() => n.as_f64().map(format_value).unwrap_or_else(|| n.to_string()),
        Some(Value::Number(n)) => n.to_string(),
        other => quote(&raw_text_of(other)),
    }
}

/// Serialise rows to CSV text.
///
/// The header quotes every label (falling back to the key). Data cells are read
/// from `row[column.key]`: numbers are written bare (whole floats without `.0`),
/// everything else is quoted verbatim with embedded quotes doubled. Returns an empty string when there are no rows.
pub fn to_delimited_text<R: Row>(rows: &[R], columns: &[ColumnDescriptor]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(columns.iter().map(|c| quote(c.display_label())).collect::<Vec<_>>().join(","));

    for row in rows {
        let cells: Vec<String> = columns.iter().map(|c| format_cell(row.field(&c.key))).collect();
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

/// Compact sortable timestamp, e.g. `20240917-081502`
pub fn export_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d-%H%M%S").to_string()
}

/// Base filename for a category export, e.g. `"IKG (Indeks)"` -> `data_ikgindeks`
pub fn build_export_filename(category: &str) -> String {
    let token: String = category.to_lowercase().chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    format!("data_{}", token)
}

/// Host facility that stores generated text under a filename
pub trait FileSaver {
    /// Save `content`, returning where it ended up
    fn save(&self, content: &str, filename: &str, content_type: &str) -> io::Result<PathBuf>;
}

/// Saves exports into a directory on disk.
///
/// Content is written to a temporary file in the target directory first and
/// then moved into place. The temporary file is removed if anything fails.
/// An existing file is never overwritten: `name-2.csv`, `name-3.csv`, ... are
/// tried instead.
#[derive(Debug, Clone)]
pub struct DiskSaver {
    dir: PathBuf,
}

impl DiskSaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn numbered_name(filename: &str, attempt: usize) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    match path.extension() {
        Some(ext) => format!("{}-{}.{}", stem, attempt + 1, ext.to_string_lossy()),
        None => format!("{}-{}", stem, attempt + 1),
    }
}

impl FileSaver for DiskSaver {
    fn save(&self, content: &str, filename: &str, content_type: &str) -> io::Result<PathBuf> {
        debug!("Saving {} bytes of {} as {} in {}", content.len(), content_type, filename, self.dir.display());
        fs::create_dir_all(&self.dir)?;

        let mut file = tempfile::Builder::new().prefix(".ranktable-").suffix(".part").tempfile_in(&self.dir)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let target = self.dir.join(numbered_name(filename, attempt));
            match file.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => file = e.file,
                Err(e) => return Err(e.error),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} and {} numbered variants already exist", filename, MAX_NAME_ATTEMPTS - 1),
        ))
    }
}

/// Why an export did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoRows,
    NoColumns,
    EmptyText,
}

impl SkipReason {
    pub fn message(&self) -> &'static str {
        match self {
            SkipReason::NoRows => "no rows to export",
            SkipReason::NoColumns => "no columns to export",
            SkipReason::EmptyText => "export produced no content",
        }
    }
}

/// Result of `export_table`. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Skipped(SkipReason),
    Failed(String),
}

/// Export rows as a timestamped CSV file through `saver`
pub fn export_table<R: Row>(
    rows: &[R],
    columns: &[ColumnDescriptor],
    base_filename: &str,
    saver: &dyn FileSaver,
) -> ExportOutcome {
    export_table_at(rows, columns, base_filename, saver, Local::now())
}

/// `export_table` with an explicit clock
pub fn export_table_at<R: Row>(
    rows: &[R],
    columns: &[ColumnDescriptor],
    base_filename: &str,
    saver: &dyn FileSaver,
    now: DateTime<Local>,
) -> ExportOutcome {
    let skip = if rows.is_empty() {
        Some(SkipReason::NoRows)
    } else if columns.is_empty() {
        Some(SkipReason::NoColumns)
    } else {
        None
    };
    if let Some(reason) = skip {
        warn!("Export skipped: {}", reason.message());
        return ExportOutcome::Skipped(reason);
    }

    let text = to_delimited_text(rows, columns);
    if text.is_empty() {
        warn!("Export skipped: {}", SkipReason::EmptyText.message());
        return ExportOutcome::Skipped(SkipReason::EmptyText);
    }

    let filename = format!("{}_{}.{}", base_filename, export_timestamp(now), EXPORT_EXTENSION);

    match saver.save(&text, &filename, CSV_CONTENT_TYPE) {
        Ok(path) => {
            info!("Exported {} rows to {}", rows.len(), path.display());
            ExportOutcome::Saved(path)
        }
        Err(e) => {
            warn!("Failed to save export {}: {}", filename, e);
            ExportOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;
