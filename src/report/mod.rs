//! Report generation module - Data transformations for the views.
//!
//! This module handles:
//! - Building the summary header and per-component count rows
//! - Resolving a drill-down selection into a renderable report
//! - Export to JSON and Markdown formats
//!
//! Console rendering is handled by the console_format module.
//!
//! # Module Organization
//!
//! - `types` - Rendering model (CountCell, SummaryRow, Summary, DrillDownReport)
//! - `stats` - Summary and drill-down construction
//! - `export` - JSON and Markdown export
//! - `table` - Console output of a summary or drill-down

mod export;
mod stats;
mod table;
mod types;

pub use types::{CountCell, DrillDownReport, Summary, SummaryHeader, SummaryRow, trend_color};

#[cfg(test)]
pub use types::CompareHeader;

pub use stats::{build_drilldown, build_summary};

pub use export::{export_json_report, export_markdown_report};

pub use table::{print_drilldown, print_summary};
