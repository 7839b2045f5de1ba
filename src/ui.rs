/// User interface and status output utilities
///
/// This module handles:
/// - Serialised console output (notices never interleave)
/// - Colored terminal text
/// - The user-facing notices for export results
use crate::report::ExportOutcome;
use lazy_static::lazy_static;
use std::io::Write;
use std::sync::Mutex;

/// Notice shown when saving an export fails, whatever the cause
pub const EXPORT_FAILED_NOTICE: &str = "Export failed. The file could not be saved; please try again.";

/// Execute a function with exclusive access to console output
fn status_lock<F>(f: F)
where
    F: FnOnce(),
{
    lazy_static! {
        static ref LOCK: Mutex<()> = Mutex::new(());
    }
    let _guard = LOCK.lock();
    f();
}

/// Print colored text to terminal, with fallback to plain text
fn print_color(s: &str, fg: term::color::Color) {
    if !really_print_color(s, fg) {
        print!("{}", s);
    }

    fn really_print_color(s: &str, fg: term::color::Color) -> bool {
        if let Some(ref mut t) = term::stdout() {
            if t.fg(fg).is_err() {
                return false;
            }
            let _ = t.attr(term::Attr::Bold);
            if write!(t, "{}", s).is_err() {
                return false;
            }
            let _ = t.reset();
            return true;
        }

        false
    }
}

/// Print a status message with "ranktable: " prefix
pub fn status(s: &str) {
    status_lock(|| {
        print!("ranktable: ");
        println!("{}", s);
    });
}

/// Print an error message with colored "error" prefix
pub fn print_error(msg: &str) {
    status_lock(|| {
        println!();
        print_color("error", term::color::BRIGHT_RED);
        println!(": {}", msg);
        println!();
    });
}

/// Print a warning message with colored "warning" prefix
pub fn print_warning(msg: &str) {
    status_lock(|| {
        print_color("warning", term::color::BRIGHT_YELLOW);
        println!(": {}", msg);
    });
}

/// Surface an export outcome to the user
pub fn report_export(outcome: &ExportOutcome) {
    match outcome {
        ExportOutcome::Saved(path) => status(&format!("Exported to {}", path.display())),
        ExportOutcome::Skipped(reason) => print_warning(&format!("Nothing exported: {}", reason.message())),
        ExportOutcome::Failed(_) => print_error(EXPORT_FAILED_NOTICE),
    }
}
