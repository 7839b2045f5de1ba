// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod cli;
mod compare;
mod config;
mod console_format;
mod dataset;
mod indicator;
mod report;
mod sort;
mod sort_state;
mod types;
mod ui;

use compare::TextCollator;
use config::TablePlan;
use log::{debug, info};
use report::{DiskSaver, ExportOutcome};
use std::path::Path;
use types::Record;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    let rows = match dataset::load_rows(&args.data) {
        Ok(rows) => rows,
        Err(e) => {
            ui::print_error(&format!("Dataset error: {}", e));
            std::process::exit(1);
        }
    };
    info!("Loaded {} rows from {}", rows.len(), args.data.display());

    let plan = match config::build_table_plan(&args, &rows) {
        Ok(plan) => plan,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };
    debug!("Sort state for '{}': {}", plan.category, plan.sort_state);

    let collator = TextCollator::new(&plan.compare);
    let sorted = sort::sort_rows(&rows, &plan.sort_state, &plan.columns, &collator);

    // JSON mode keeps stdout machine-readable
    if !args.json {
        report::print_sorted_table(&sorted, &plan.columns, &plan.sort_state, plan.limit);
    }

    let indicator_result = plan.indicator.as_deref().map(|field| {
        let accessor = indicator::field_accessor::<Record>(field);
        (field, indicator::compute_indicator(&rows, Some(&accessor)))
    });

    if let Some((field, result)) = &indicator_result {
        if args.json {
            match serde_json::to_string_pretty(&report::indicator_json(field, result)) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    ui::print_error(&format!("Failed to serialise indicator result: {}", e));
                    std::process::exit(1);
                }
            }
        } else {
            println!();
            print!("{}", report::format_indicator_summary(field, result, args.top, console_format::console_width()));
        }
    }

    if let Some(ref dir) = plan.export_dir {
        let outcome = export(&plan, &sorted, dir);
        ui::report_export(&outcome);

        if let (ExportOutcome::Saved(_), Some((field, result))) = (&outcome, &indicator_result) {
            export_indicator(&plan, field, result, dir);
        }

        if matches!(outcome, ExportOutcome::Failed(_)) {
            std::process::exit(2);
        }
    }
}

/// Export the sorted table as CSV into `dir`
fn export(plan: &TablePlan, sorted: &[Record], dir: &Path) -> ExportOutcome {
    let saver = DiskSaver::new(dir);
    report::export_table(sorted, &plan.columns, &plan.export_basename, &saver)
}

/// Save the indicator result as JSON next to the CSV export
fn export_indicator(plan: &TablePlan, field: &str, result: &indicator::IndicatorResult<Record>, dir: &Path) {
    let filename = format!(
        "{}_{}_{}.json",
        plan.export_basename,
        field,
        report::export_timestamp(chrono::Local::now())
    );
    let path = dir.join(filename);
    match report::export_indicator_json(field, result, &path) {
        Ok(_) => ui::status(&format!("Indicator saved to {}", path.display())),
        Err(e) => ui::print_warning(&format!("Failed to save indicator JSON: {}", e)),
    }
}
