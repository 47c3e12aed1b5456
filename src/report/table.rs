//! Console output for the summary and drill-down views.
//!
//! Thin layer over `console_format`: decides which blocks of a report are
//! printed and in which order.

use super::types::{DrillDownReport, Summary};
use crate::console_format;

/// Print the summary header followed by the component table.
pub fn print_summary(summary: &Summary, use_colors: bool) {
    console_format::print_summary_header(&summary.header);
    console_format::print_summary_table(&summary.rows, use_colors);
}

/// Title line of a drill-down, e.g. `"mesh - Timeout Files"`
pub fn drilldown_title(report: &DrillDownReport<'_>) -> String {
    format!("{} - {} Files", report.component, report.type_filter.title())
}

/// Print the dataset list, then either search results or the selected
/// dataset's files, then the detail panel.
pub fn print_drilldown(report: &DrillDownReport<'_>, use_colors: bool) {
    console_format::print_dataset_list(&drilldown_title(report), &report.datasets, report.comparing, use_colors);

    if let Some(term) = &report.search_term {
        console_format::print_search_results(term, &report.search_results, use_colors);
    } else if let (Some(dataset), Some(files)) = (&report.dataset, &report.files) {
        console_format::print_file_listing(dataset, files, report.comparing, use_colors);
    }

    if let Some(detail) = &report.detail {
        console_format::print_file_detail(detail, use_colors);
    }
}
