use crate::compare::Sensitivity;
use clap::Parser;
use std::path::PathBuf;

/// Get the default export directory
/// Uses the platform download directory:
/// - Linux: ~/Downloads (XDG_DOWNLOAD_DIR)
/// - macOS: ~/Downloads
/// - Windows: {FOLDERID_Downloads}
/// Falls back to the current directory when there is none.
pub fn default_output_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Parser, Debug, Clone)]
#[command(name = "ranktable")]
#[command(about = "Sort, rank and export tabular indicator datasets")]
#[command(version)]
pub struct CliArgs {
    /// JSON dataset: an array of objects, or an object with a `data` array
    #[arg(long, short = 'd', value_name = "PATH")]
    pub data: PathBuf,

    /// Column registry (TOML) describing the columns of each category
    /// Without it, columns are inferred from the first row
    #[arg(long, value_name = "PATH")]
    pub columns: Option<PathBuf>,

    /// Dataset category to look up in the column registry (e.g. "Pendidikan")
    #[arg(long, short = 'c', value_name = "NAME")]
    pub category: Option<String>,

    /// Sort keys in priority order, as KEY or KEY:asc / KEY:desc
    /// Overrides the category's default ordering
    #[arg(long, value_name = "KEY[:DIR]", num_args = 1..)]
    pub sort: Vec<String>,

    /// Replay header clicks on these columns, in order
    /// Each click cycles a column asc -> desc -> default ordering
    #[arg(long, value_name = "KEY", num_args = 1..)]
    pub click: Vec<String>,

    /// Numeric field to rank rows by (prints ranking, distribution and statistics)
    #[arg(long, short = 'i', value_name = "FIELD")]
    pub indicator: Option<String>,

    /// Number of top-ranked rows to list in the indicator summary
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Export the sorted table as CSV
    #[arg(long)]
    pub export: bool,

    /// Directory for exported files (default: the platform download directory)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Collation locale for text columns (default: "id")
    #[arg(long, value_name = "TAG")]
    pub locale: Option<String>,

    /// Collation sensitivity: base, accent, case or variant (default: base)
    #[arg(long, value_name = "LEVEL")]
    pub sensitivity: Option<String>,

    /// Show at most this many rows of the sorted table
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Print the indicator result as JSON instead of the console summary
    #[arg(long)]
    pub json: bool,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // Accept quoted lists like --sort 'kecamatan:asc desa:asc'
        args.sort = args.sort.iter().flat_map(|s| s.split_whitespace().map(|v| v.to_string())).collect();

        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.columns.is_some() && self.category.is_none() {
            return Err("--columns requires --category to pick a column set".to_string());
        }

        if self.json && self.indicator.is_none() {
            return Err("--json prints the indicator result; specify --indicator <FIELD>".to_string());
        }

        if self.output_dir.is_some() && !self.export {
            return Err("--output-dir only applies with --export".to_string());
        }

        if let Some(ref sensitivity) = self.sensitivity {
            sensitivity.parse::<Sensitivity>()?;
        }

        if self.limit == Some(0) {
            return Err("--limit must be at least 1".to_string());
        }

        Ok(())
    }

    /// Get the export directory, using the default download location if not specified
    pub fn get_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(default_output_dir)
    }
}
