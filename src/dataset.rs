/// Dataset loading
///
/// Rows come from a JSON document that is either a top-level array of objects
/// or an object with a `data` array. Entries that are not objects are skipped.
use crate::types::Record;
use log::{debug, warn};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Parse rows from JSON text
pub fn parse_rows(text: &str) -> Result<Vec<Record>, String> {
    let document: Value = serde_json::from_str(text).map_err(|e| format!("Invalid JSON dataset: {}", e))?;

    let entries = match document {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(entries)) => entries,
            _ => return Err("Dataset object has no `data` array".to_string()),
        },
        _ => return Err("Dataset must be a JSON array or an object with a `data` array".to_string()),
    };

    let total = entries.len();
    let rows: Vec<Record> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match entry {
            Value::Object(map) => Some(map),
            other => {
                warn!("Skipping dataset entry {}: expected an object, found {}", idx, other);
                None
            }
        })
        .collect();

    debug!("Parsed {} of {} dataset entries", rows.len(), total);
    Ok(rows)
}

/// Load rows from a JSON file
pub fn load_rows(path: &Path) -> Result<Vec<Record>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_rows(&text).map_err(|e| format!("{}: {}", path.display(), e))
}
