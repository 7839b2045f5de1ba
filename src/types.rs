/// Core data structures for ranking tables
///
/// This module defines the shapes shared by the sort engine, the sort-state
/// machine, the indicator aggregator and the exporter:
/// - `Row`: keyed access to one record, whatever map type backs it
/// - `ColumnDescriptor`: how to read, label and compare one field
/// - `SortItem` / `SortState`: the ordered (column, direction) list
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

/// The concrete row type produced by the dataset loader
pub type Record = serde_json::Map<String, Value>;

/// Read-only keyed access to a single record.
///
/// Rows are property bags: column sets vary per dataset category, so the engine
/// only ever asks for a field by name and never assumes a fixed shape.
pub trait Row {
    fn field(&self, name: &str) -> Option<&Value>;
}

impl Row for serde_json::Map<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl<S: BuildHasher> Row for HashMap<String, Value, S> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Row for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl Row for Value {
    fn field(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(name))
    }
}

impl<R: Row + ?Sized> Row for &R {
    fn field(&self, name: &str) -> Option<&Value> {
        (**self).field(name)
    }
}

/// Coerce a field to trimmed text. Absent and null become the empty string.
pub fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Coerce a field to text as stored, without trimming. Absent and null become the empty string.
pub fn raw_text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Coerce a field to a number.
///
/// Numeric strings are parsed after trimming; anything that cannot be read as a
/// finite-or-infinite number (absent, null, garbage text, NaN) collapses to 0.
pub fn number_of(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() { 0.0 } else { s.parse::<f64>().unwrap_or(0.0) }
        }
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    };
    if n.is_nan() { 0.0 } else { n }
}

/// How a column's values compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[default]
    Text,
    Number,
}

/// Metadata describing how to read and label one field of a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, rename = "dataKey", alias = "data_key", skip_serializing_if = "Option::is_none")]
    pub data_key: Option<String>,
}

impl ColumnDescriptor {
    /// A column whose label is its key, typed from a sample value
    pub fn inferred(key: &str, sample: &Value) -> Self {
        if matches!(sample, Value::Number(_)) { Self::number(key, key) } else { Self::text(key, key) }
    }

    pub fn text(key: &str, label: &str) -> Self {
        Self { key: key.to_string(), label: label.to_string(), column_type: ColumnType::Text, data_key: None }
    }

    pub fn number(key: &str, label: &str) -> Self {
        Self { key: key.to_string(), label: label.to_string(), column_type: ColumnType::Number, data_key: None }
    }

    /// Read the value from a different row field than `key`
    #[cfg(test)]
    pub fn with_data_key(mut self, data_key: &str) -> Self {
        self.data_key = Some(data_key.to_string());
        self
    }

    /// The row field this column reads (defaults to `key`)
    pub fn data_key(&self) -> &str {
        self.data_key.as_deref().unwrap_or(&self.key)
    }

    /// Display label, falling back to the key when none was configured
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() { &self.key } else { &self.label }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("Unknown sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

/// One (column, direction) pair in a sort sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortItem {
    pub key: String,
    pub direction: SortDirection,
}

impl SortItem {
    pub fn new(key: &str, direction: SortDirection) -> Self {
        Self { key: key.to_string(), direction }
    }

    pub fn asc(key: &str) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: &str) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

/// Parses `key`, `key:asc` or `key:desc`
impl FromStr for SortItem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s.rsplit_once(':') {
            Some((key, dir)) => (key.trim(), dir.parse::<SortDirection>()?),
            None => (s.trim(), SortDirection::Asc),
        };
        if key.is_empty() {
            return Err(format!("Sort item '{}' has an empty column key", s));
        }
        Ok(SortItem::new(key, direction))
    }
}

impl fmt::Display for SortItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction)
    }
}

/// Ordered sort items, evaluated left to right as primary, secondary, ... keys.
///
/// A key appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortState(Vec<SortItem>);

impl SortState {
    /// Build a state, keeping only the first occurrence of each key
    pub fn new(items: Vec<SortItem>) -> Self {
        let mut kept: Vec<SortItem> = Vec::with_capacity(items.len());
        for item in items {
            if kept.iter().any(|k| k.key == item.key) {
                log::warn!("Ignoring duplicate sort key '{}' ({})", item.key, item.direction);
                continue;
            }
            kept.push(item);
        }
        SortState(kept)
    }

    pub fn empty() -> Self {
        SortState(Vec::new())
    }

    /// A state holding exactly one item
    pub fn single(item: SortItem) -> Self {
        SortState(vec![item])
    }

    pub fn items(&self) -> &[SortItem] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortItem> {
        self.0.iter()
    }

    /// Current direction of `key`, if it is part of this state
    pub fn direction_of(&self, key: &str) -> Option<SortDirection> {
        self.0.iter().find(|item| item.key == key).map(|item| item.direction)
    }
}

impl From<Vec<SortItem>> for SortState {
    fn from(items: Vec<SortItem>) -> Self {
        SortState::new(items)
    }
}

impl<'a> IntoIterator for &'a SortState {
    type Item = &'a SortItem;
    type IntoIter = std::slice::Iter<'a, SortItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(original order)");
        }
        let parts: Vec<String> = self.0.iter().map(|item| item.to_string()).collect();
        f.write_str(&parts.join(", "))
    }
}
