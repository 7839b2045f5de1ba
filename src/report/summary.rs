//! Indicator summaries: ranking excerpt, distribution and statistics.
//!
//! Rendered either as console text or as a JSON document for other tools.

use crate::console_format::{Align, TableWriter, display_width, fit_widths};
use crate::indicator::{IndicatorResult, percentage_label};
use serde::Serialize;
use serde_json::json;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Format a value without a trailing `.0` for whole numbers
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 { format!("{}", value as i64) } else { format!("{}", value) }
}

/// Write the summary for `indicator`, listing the `top` highest-ranked rows
pub fn write_indicator_summary<R, W: Write>(
    mut writer: W,
    indicator: &str,
    result: &IndicatorResult<R>,
    top: usize,
    total_width: usize,
) -> io::Result<()> {
    writeln!(writer, "=== Indicator: {} ===", indicator)?;
    if result.is_empty {
        writeln!(writer, "No data.")?;
        return Ok(());
    }

    let stats = &result.stats;
    writeln!(
        writer,
        "Count: {}  Sum: {}  Min: {}  Max: {}  Mean: {:.2}",
        stats.count,
        format_value(stats.sum),
        format_value(stats.min),
        format_value(stats.max),
        stats.mean
    )?;

    let dist = &result.distribution;
    writeln!(
        writer,
        "Ada: {} ({}%)  Tidak Ada: {} ({}%)",
        dist.ada,
        percentage_label(dist.ada, dist.ada_percentage),
        dist.tidak_ada,
        percentage_label(dist.tidak_ada, dist.tidak_ada_percentage)
    )?;

    let shown = top.min(result.ranking.len());
    if shown == 0 {
        return Ok(());
    }
    writeln!(writer)?;
    writeln!(writer, "Top {}:", shown)?;

    let headers = vec!["Rank".to_string(), "Name".to_string(), "Value".to_string()];
    let body: Vec<Vec<String>> = result.ranking[..shown]
        .iter()
        .map(|r| vec![r.rank.to_string(), r.display_name.clone(), format_value(r.value)])
        .collect();
    let natural: Vec<usize> = (0..headers.len())
        .map(|i| body.iter().map(|c| display_width(&c[i])).chain([display_width(&headers[i])]).max().unwrap_or(0))
        .collect();

    let aligns = [Align::Right, Align::Left, Align::Right];
    let mut table = TableWriter::new(&mut writer, false, fit_widths(&natural, total_width));
    table.write_top()?;
    table.write_row(&headers, &aligns, None)?;
    table.write_separator()?;
    for cells in &body {
        table.write_row(cells, &aligns, None)?;
    }
    table.write_bottom()
}

/// Format the summary as a string
pub fn format_indicator_summary<R>(indicator: &str, result: &IndicatorResult<R>, top: usize, total_width: usize) -> String {
    let mut buf = Vec::new();
    let _ = write_indicator_summary(&mut buf, indicator, result, top, total_width);
    String::from_utf8_lossy(&buf).to_string()
}

/// The indicator result as a JSON document
pub fn indicator_json<R: Serialize>(indicator: &str, result: &IndicatorResult<R>) -> serde_json::Value {
    json!({
        "indicator": indicator,
        "generated": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "result": result,
    })
}

/// Export the indicator result as pretty-printed JSON
pub fn export_indicator_json<R: Serialize>(
    indicator: &str,
    result: &IndicatorResult<R>,
    output_path: &Path,
) -> io::Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &indicator_json(indicator, result))?;
    Ok(())
}
