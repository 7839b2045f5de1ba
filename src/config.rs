/// Configuration resolution module
///
/// This module handles:
/// - Loading the column registry (per-category column descriptors) from TOML
/// - Normalising category names for lookup
/// - Building an immutable TablePlan from CLI arguments
use crate::cli::CliArgs;
use crate::compare::CompareOptions;
use crate::types::{ColumnDescriptor, Record, SortItem, SortState};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Lower-case, trim, and turn whitespace runs into `_`: `"Sarana Ibadah"` -> `sarana_ibadah`
pub fn normalize_category(name: &str) -> String {
    name.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("_")
}

/// One category's columns and default ordering, as written in the registry file
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub default_sort: Vec<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    compare: Option<CompareOptions>,
    #[serde(default, rename = "category")]
    categories: Vec<CategoryConfig>,
}

/// Column descriptors per dataset category
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    compare: Option<CompareOptions>,
    categories: Vec<CategoryConfig>,
}

impl ColumnRegistry {
    /// Parse a registry from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        let file: RegistryFile = toml::from_str(text).map_err(|e| format!("Invalid column registry: {}", e))?;

        for (i, category) in file.categories.iter().enumerate() {
            let normalized = normalize_category(&category.name);
            if file.categories[..i].iter().any(|c| normalize_category(&c.name) == normalized) {
                return Err(format!("Category '{}' is defined more than once", category.name));
            }
            for (j, column) in category.columns.iter().enumerate() {
                if category.columns[..j].iter().any(|c| c.key == column.key) {
                    return Err(format!("Category '{}' repeats column key '{}'", category.name, column.key));
                }
            }
            for item in &category.default_sort {
                item.parse::<SortItem>().map_err(|e| format!("Category '{}': {}", category.name, e))?;
            }
        }

        debug!("Loaded column registry with {} categories", file.categories.len());
        Ok(Self { compare: file.compare, categories: file.categories })
    }

    /// Load a registry from a TOML file
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Compare options from the registry's `[compare]` table, if present
    pub fn compare_options(&self) -> Option<&CompareOptions> {
        self.compare.as_ref()
    }

    fn find(&self, category: &str) -> Option<&CategoryConfig> {
        let wanted = normalize_category(category);
        self.categories.iter().find(|c| normalize_category(&c.name) == wanted)
    }

    /// Columns for `category`. Unknown categories give an empty list and a warning.
    pub fn columns_for(&self, category: &str) -> Vec<ColumnDescriptor> {
        match self.find(category) {
            Some(config) => config.columns.clone(),
            None => {
                warn!(
                    "No column configuration for category '{}' (known: {})",
                    normalize_category(category),
                    self.category_names().join(", ")
                );
                Vec::new()
            }
        }
    }

    /// Default sort state for `category` (empty when unknown or unset)
    pub fn default_sort_for(&self, category: &str) -> SortState {
        let items = self
            .find(category)
            .map(|config| config.default_sort.iter().filter_map(|s| s.parse::<SortItem>().ok()).collect())
            .unwrap_or_default();
        SortState::new(items)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Columns inferred from the first row, in its field order: numbers become number columns
pub fn infer_columns(rows: &[Record]) -> Vec<ColumnDescriptor> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .iter()
        .map(|(key, value)| ColumnDescriptor::inferred(key, value))
        .collect()
}

/// Everything needed to render, rank and export one table
#[derive(Debug, Clone)]
pub struct TablePlan {
    pub category: String,
    pub columns: Vec<ColumnDescriptor>,
    pub sort_state: SortState,
    pub compare: CompareOptions,
    pub indicator: Option<String>,
    pub export_dir: Option<PathBuf>,
    pub export_basename: String,
    pub limit: Option<usize>,
}

/// Build a TablePlan from CLI arguments and the loaded rows.
///
/// Header clicks are replayed here on top of the starting state: the explicit
/// `--sort` state when given, otherwise the category default. A click that
/// cycles back to rest always lands on the category default.
pub fn build_table_plan(args: &CliArgs, rows: &[Record]) -> Result<TablePlan, String> {
    let registry = match args.columns {
        Some(ref path) => ColumnRegistry::load(path)?,
        None => ColumnRegistry::default(),
    };

    let category = args.category.clone().unwrap_or_else(|| "data".to_string());

    let columns = if args.columns.is_some() { registry.columns_for(&category) } else { infer_columns(rows) };
    debug!("Category '{}' has {} columns", category, columns.len());

    let default_state = registry.default_sort_for(&category);

    let explicit: Vec<SortItem> = args.sort.iter().map(|s| s.parse::<SortItem>()).collect::<Result<_, _>>()?;
    let mut sort_state = if explicit.is_empty() { default_state.clone() } else { SortState::new(explicit) };

    for key in &args.click {
        sort_state = crate::sort_state::update_sort_state(&sort_state, key, Some(&default_state));
    }

    for item in &sort_state {
        if !columns.iter().any(|c| c.key == item.key) {
            warn!("Sort key '{}' is not a configured column; comparing the raw field as text", item.key);
        }
    }

    let mut compare = registry.compare_options().cloned().unwrap_or_default();
    if let Some(ref locale) = args.locale {
        compare.locale = locale.clone();
    }
    if let Some(ref sensitivity) = args.sensitivity {
        compare.sensitivity = sensitivity.parse()?;
    }

    let export_dir = if args.export { Some(args.get_output_dir()) } else { None };

    Ok(TablePlan {
        export_basename: crate::report::build_export_filename(&category),
        category,
        columns,
        sort_state,
        compare,
        indicator: args.indicator.clone(),
        export_dir,
        limit: args.limit,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
