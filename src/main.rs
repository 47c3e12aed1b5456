// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod aggregate;
mod classify;
mod cli;
mod config;
mod console_format;
mod diff;
mod drilldown;
mod error;
mod loader;
mod report;
mod session;
mod source;
mod store;
mod types;
mod ui;

#[cfg(test)]
mod test_util;

use config::ViewPlan;
use drilldown::DrillDown;
use loader::{Catalog, LoadOutcome};
use session::Session;
use source::ResultSource;
use std::io::IsTerminal;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    ui::set_colors(!args.no_color);

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    let source = ResultSource::parse(&args.source);
    let catalog = Catalog::fetch(&source);
    if catalog.is_empty() {
        ui::status(&format!("no benchmark files found in {}", source.describe()));
        std::process::exit(0);
    }

    if args.list_dates {
        print_dates(&catalog);
        std::process::exit(0);
    }

    // Resolve the selection
    let plan = match config::build_view_plan(&args, &catalog) {
        Ok(p) => p,
        Err(e) => {
            ui::print_error(&format!("Configuration error: {}", e));
            std::process::exit(1);
        }
    };
    for notice in &plan.notices {
        ui::print_notice(notice);
    }

    let session = load_session(&source, &catalog, &plan);
    let use_colors = plan.use_colors && std::io::stdout().is_terminal();

    let Some(summary) = report::build_summary(&session) else {
        ui::print_error("no date selected");
        std::process::exit(1);
    };
    report::print_summary(&summary, use_colors);

    // Drill-down views
    let view = plan
        .drilldown
        .as_ref()
        .map(|dd| (dd, DrillDown::from_session(&session, &dd.component, dd.type_filter)));
    let drilldown = view.as_ref().map(|(dd, view)| {
        report::build_drilldown(view, dd.dataset.as_deref(), dd.search.as_deref(), dd.file.as_deref())
    });
    if let Some(ref drilldown) = drilldown {
        for notice in &drilldown.notices {
            ui::print_notice(notice);
        }
        report::print_drilldown(drilldown, use_colors);
    }

    export_reports(&plan, &summary, drilldown.as_ref());

    // Determine exit code
    if plan.fail_on_regression && summary.has_regression() {
        ui::status(&format!("regressions in: {}", summary.regressed_components().join(", ")));
        std::process::exit(2);
    }
}

/// Print every available date with its result files, newest first
fn print_dates(catalog: &Catalog) {
    for date in catalog.dates() {
        let files = catalog.files_for(date);
        println!("{} ({} files)", date, files.len());
        for file in files {
            println!("  {}", file);
        }
    }
}

/// Select the plan's dates and load both of them concurrently
fn load_session(source: &ResultSource, catalog: &Catalog, plan: &ViewPlan) -> Session {
    let mut session = Session::new();
    let current_token = session.select_date(&plan.date);
    let compare_token = session.select_compare(plan.compare.as_deref());

    let (current, compare) = rayon::join(
        || loader::load_date(source, catalog, &plan.date),
        || plan.compare.as_deref().map(|date| loader::load_date(source, catalog, date)),
    );

    report_load(&current, catalog);
    session.apply(current_token, current);

    if let (Some(token), Some(outcome)) = (compare_token, compare) {
        report_load(&outcome, catalog);
        session.apply(token, outcome);
    }
    session
}

fn report_load(outcome: &LoadOutcome, catalog: &Catalog) {
    let attempted = catalog.files_for(&outcome.date).len();
    if !outcome.failures.is_empty() {
        ui::status(&format!(
            "loaded {} of {} files for {} ({} skipped)",
            outcome.loaded_files(attempted),
            attempted,
            outcome.date,
            outcome.failures.len()
        ));
    }
}

/// Write the requested Markdown and JSON exports; failures are warnings
fn export_reports(plan: &ViewPlan, summary: &report::Summary, drilldown: Option<&report::DrillDownReport<'_>>) {
    if let Some(ref path) = plan.output_markdown {
        match report::export_markdown_report(summary, drilldown, path) {
            Ok(_) => ui::status(&format!("Markdown report saved to: {}", path.display())),
            Err(e) => eprintln!("Warning: Failed to save markdown report: {}", e),
        }
    }

    if let Some(ref path) = plan.output_json {
        match report::export_json_report(summary, drilldown, path) {
            Ok(_) => ui::status(&format!("JSON report saved to: {}", path.display())),
            Err(e) => eprintln!("Warning: Failed to save JSON report: {}", e),
        }
    }
}
