//! Console output of a sorted ranking table.
//!
//! Header cells carry the sort arrows (`▲`/`▼`, with a priority number when
//! more than one key is active); number columns are right aligned.

use crate::console_format::{self, Align, TableWriter, display_width, fit_widths};
use crate::sort_state::header_indicator;
use crate::types::{ColumnDescriptor, ColumnType, Row, SortDirection, SortState, text_of};
use std::io::{self, IsTerminal, Write};

/// Header label with the sort arrow for this column, if it is sorted
pub fn header_label(column: &ColumnDescriptor, state: &SortState) -> String {
    match header_indicator(state, &column.key) {
        Some((direction, priority)) => {
            let arrow = match direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            };
            if state.len() > 1 {
                format!("{} {}{}", column.display_label(), arrow, priority)
            } else {
                format!("{} {}", column.display_label(), arrow)
            }
        }
        None => column.display_label().to_string(),
    }
}

/// Cell text for a column, `-` when the field is missing or blank
pub fn cell_text<R: Row>(row: &R, column: &ColumnDescriptor) -> String {
    let text = text_of(row.field(column.data_key()));
    if text.is_empty() { "-".to_string() } else { text }
}

/// Write the table, showing at most `limit` rows
pub fn write_sorted_table<R: Row, W: Write>(
    writer: W,
    rows: &[R],
    columns: &[ColumnDescriptor],
    state: &SortState,
    limit: Option<usize>,
    total_width: usize,
    use_colors: bool,
) -> io::Result<()> {
    let shown = limit.map(|n| n.min(rows.len())).unwrap_or(rows.len());

    let mut headers = vec!["#".to_string()];
    headers.extend(columns.iter().map(|c| header_label(c, state)));

    let mut aligns = vec![Align::Right];
    aligns.extend(columns.iter().map(|c| match c.column_type {
        ColumnType::Number => Align::Right,
        ColumnType::Text => Align::Left,
    }));

    let body: Vec<Vec<String>> = rows[..shown]
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut cells = vec![(i + 1).to_string()];
            cells.extend(columns.iter().map(|c| cell_text(row, c)));
            cells
        })
        .collect();

    let natural: Vec<usize> = (0..headers.len())
        .map(|i| {
            body.iter().map(|cells| display_width(&cells[i])).chain([display_width(&headers[i])]).max().unwrap_or(0)
        })
        .collect();

    let mut table = TableWriter::new(writer, use_colors, fit_widths(&natural, total_width));
    table.write_top()?;
    table.write_row(&headers, &vec![Align::Left; headers.len()], Some(term::color::BRIGHT_CYAN))?;
    table.write_separator()?;
    for cells in &body {
        table.write_row(cells, &aligns, None)?;
    }
    table.write_bottom()?;

    let sort_note = format!("Sorted by: {}", state);
    if shown < rows.len() {
        table.write_note(&format!("{} of {} rows shown. {}", shown, rows.len(), sort_note))
    } else {
        table.write_note(&format!("{} rows. {}", rows.len(), sort_note))
    }
}

/// Format the table as a string (no colors)
#[cfg(test)]
pub fn format_sorted_table<R: Row>(
    rows: &[R],
    columns: &[ColumnDescriptor],
    state: &SortState,
    limit: Option<usize>,
    total_width: usize,
) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_sorted_table(&mut buf, rows, columns, state, limit, total_width, false);
    String::from_utf8_lossy(&buf).to_string()
}

/// Print the table to stdout at the console width
pub fn print_sorted_table<R: Row>(rows: &[R], columns: &[ColumnDescriptor], state: &SortState, limit: Option<usize>) {
    let stdout = io::stdout();
    let width = console_format::console_width();
    let use_colors = stdout.is_terminal();
    if let Err(e) = write_sorted_table(stdout.lock(), rows, columns, state, limit, width, use_colors) {
        log::warn!("Failed to print table: {}", e);
    }
}
