/// Console formatting module - Pure rendering concerns
///
/// This module handles all console output formatting including:
/// - Box-drawn table borders sized to the content
/// - Color terminal output
/// - Text truncation and padding (Unicode-width aware)
///
/// It accepts already-formatted cell text from the report module and renders it.
/// `TableWriter` writes to any `std::io::Write` destination, so the same code
/// renders to the console or into a `String` buffer for tests.
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest a column is squeezed to when the table is too wide
pub const MIN_COLUMN_WIDTH: usize = 6;

/// Horizontal alignment of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Writer for box-drawn tables - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
    widths: Vec<usize>,
}

impl<W: Write> TableWriter<W> {
    /// Create a table writer with one content width per column
    pub fn new(writer: W, use_colors: bool, widths: Vec<usize>) -> Self {
        Self { writer, use_colors, widths }
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Option<Color>) -> io::Result<()> {
        match color {
            Some(color) if self.use_colors => {
                if let Some(ref mut t) = term::stdout() {
                    let _ = t.fg(color);
                    let _ = t.attr(term::Attr::Bold);
                    let _ = t.write_all(text.as_bytes());
                    let _ = t.reset();
                    Ok(())
                } else {
                    write!(self.writer, "{}", text)
                }
            }
            _ => write!(self.writer, "{}", text),
        }
    }

    fn write_border(&mut self, left: &str, mid: &str, right: &str) -> io::Result<()> {
        let segments: Vec<String> = self.widths.iter().map(|w| "─".repeat(w + 2)).collect();
        writeln!(self.writer, "{}{}{}", left, segments.join(mid), right)
    }

    pub fn write_top(&mut self) -> io::Result<()> {
        self.write_border("┌", "┬", "┐")
    }

    pub fn write_separator(&mut self) -> io::Result<()> {
        self.write_border("├", "┼", "┤")
    }

    pub fn write_bottom(&mut self) -> io::Result<()> {
        self.write_border("└", "┴", "┘")
    }

    /// Write one row; missing trailing cells render blank
    pub fn write_row(&mut self, cells: &[String], aligns: &[Align], color: Option<Color>) -> io::Result<()> {
        let rendered: Vec<String> = self
            .widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                let cell = cells.get(i).map(|s| s.as_str()).unwrap_or("");
                match aligns.get(i).copied().unwrap_or(Align::Left) {
                    Align::Left => truncate_with_padding(cell, *width),
                    Align::Right => truncate_with_left_padding(cell, *width),
                }
            })
            .collect();

        let row = format!("│ {} │", rendered.join(" │ "));
        self.write_colored(&row, color)?;
        writeln!(self.writer)
    }

    /// Write a plain line under the table (row counts, notes)
    pub fn write_note(&mut self, note: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", note)
    }
}

//
// Table Layout and Widths
//

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Override the detected console width (for testing and piped output)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width); // Ignore error if already initialized
}

/// Console width: the override, else the terminal's, else 120
pub fn console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(|| if let Some((Width(w), _)) = terminal_size() { w as usize } else { 120 })
}

/// Shrink natural column widths until the bordered table fits `total_width`.
///
/// The widest column gives up a character at a time, never going below
/// `MIN_COLUMN_WIDTH` (or its natural width, if that is smaller).
pub fn fit_widths(natural: &[usize], total_width: usize) -> Vec<usize> {
    let mut widths = natural.to_vec();
    // "│ " before each column, " " after, and the closing "│"
    let overhead = natural.len() * 3 + 1;
    let budget = total_width.saturating_sub(overhead);

    while widths.iter().sum::<usize>() > budget {
        let Some((idx, widest)) = widths.iter().copied().enumerate().max_by_key(|(_, w)| *w) else {
            break;
        };
        if widest <= MIN_COLUMN_WIDTH {
            break;
        }
        widths[idx] = widest - 1;
    }
    widths
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `width` columns, ending in "..." when something was cut
fn truncate(s: &str, width: usize) -> (String, usize) {
    let display_w = display_width(s);
    if display_w <= width {
        return (s.to_string(), display_w);
    }

    // Reserve space for "..."
    let target_width = if width >= 3 { width - 3 } else { width };
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
        if current_width + c_width > target_width {
            break;
        }
        result.push(c);
        current_width += c_width;
    }
    if width >= 3 {
        result.push_str("...");
        current_width += 3;
    }
    (result, current_width)
}

/// Truncate and pad string to exact width (left aligned)
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let (text, used) = truncate(s, width);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

/// Truncate and pad string to exact width (right aligned)
pub fn truncate_with_left_padding(s: &str, width: usize) -> String {
    let (text, used) = truncate(s, width);
    format!("{}{}", " ".repeat(width.saturating_sub(used)), text)
}
