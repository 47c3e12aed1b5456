//! Report export functions for JSON and Markdown formats.
//!
//! Both exports contain the summary; the drill-down selection is appended
//! when one was requested.

use super::table::drilldown_title;
use super::types::{DrillDownReport, Summary};
use crate::console_format::TableWriter;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn generated_at() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Export the summary (and drill-down) as pretty-printed JSON.
///
/// # Arguments
/// * `summary` - Summary of the current selection
/// * `drilldown` - Drill-down report, if a component was selected
/// * `output_path` - Path to write the JSON file
pub fn export_json_report(
    summary: &Summary,
    drilldown: Option<&DrillDownReport<'_>>,
    output_path: &Path,
) -> std::io::Result<()> {
    use serde_json::json;

    let report = json!({
        "generated": generated_at(),
        "summary": summary,
        "regressed_components": summary.regressed_components(),
        "drilldown": drilldown,
    });

    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &report)?;
    Ok(())
}

/// Export the summary as a Markdown table, with the drill-down views in a
/// code block rendered exactly like the console output (without colors).
///
/// # Arguments
/// * `summary` - Summary of the current selection
/// * `drilldown` - Drill-down report, if a component was selected
/// * `output_path` - Path to write the Markdown file
pub fn export_markdown_report(
    summary: &Summary,
    drilldown: Option<&DrillDownReport<'_>>,
    output_path: &Path,
) -> std::io::Result<()> {
    let mut file = File::create(output_path)?;
    write_markdown_report(&mut file, summary, drilldown)
}

/// Markdown body; split out so it can be written to any destination.
pub fn write_markdown_report<W: Write>(
    out: &mut W,
    summary: &Summary,
    drilldown: Option<&DrillDownReport<'_>>,
) -> std::io::Result<()> {
    let header = &summary.header;

    writeln!(out, "# Benchmark Results Report\n")?;
    writeln!(out, "**Generated**: {}", generated_at())?;
    writeln!(out, "**Current Dataset**: {}", header.date)?;
    if let Some(compare) = &header.compare {
        writeln!(out, "**Comparison Dataset**: {}", compare.date)?;
    }
    writeln!(out)?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- Total Datasets: {}", header.datasets)?;
    writeln!(out, "- Total Files: {}", header.files)?;
    if let Some(compare) = &header.compare {
        writeln!(out, "- Comparison Files: {} (Diff: {})", compare.files, compare.file_diff)?;
    }
    writeln!(out, "- {}\n", header.finished_at_line())?;

    writeln!(out, "| Component | Valid | Error | Timeout |")?;
    writeln!(out, "|-----------|-------|-------|---------|")?;
    for row in &summary.rows {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            row.component,
            row.valid.format(),
            row.error.format(),
            row.timeout.format()
        )?;
    }
    writeln!(out)?;

    let regressed = summary.regressed_components();
    if !regressed.is_empty() {
        writeln!(out, "**Regressed**: {}\n", regressed.join(", "))?;
    }

    if let Some(report) = drilldown {
        writeln!(out, "## {}\n", drilldown_title(report))?;
        for notice in &report.notices {
            writeln!(out, "> {}", notice)?;
        }
        if !report.notices.is_empty() {
            writeln!(out)?;
        }
        writeln!(out, "```")?;
        let mut writer = TableWriter::new(&mut *out, false); // No colors for markdown
        writer.write_dataset_list("Datasets", &report.datasets, report.comparing)?;
        if let Some(term) = &report.search_term {
            writer.write_search_results(term, &report.search_results)?;
        } else if let (Some(dataset), Some(files)) = (&report.dataset, &report.files) {
            writer.write_file_listing(dataset, files, report.comparing)?;
        }
        if let Some(detail) = &report.detail {
            writer.write_file_detail(detail)?;
        }
        writeln!(out, "```\n")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drilldown::DrillDown;
    use crate::report::build_drilldown;
    use crate::report::stats::summary_rows;
    use crate::report::{CompareHeader, SummaryHeader};
    use crate::test_util::*;
    use crate::types::*;

    fn sample_summary(rows: Vec<crate::report::SummaryRow>) -> Summary {
        Summary {
            header: SummaryHeader {
                date: "2024-02-01".into(),
                datasets: 1,
                files: 2,
                finished_at: Some("2024-02-01 06:00".into()),
                compare: Some(CompareHeader { date: "2024-01-01".into(), files: 3, file_diff: 1 }),
            },
            rows,
        }
    }

    #[test]
    fn test_markdown_report_contents() {
        let current = store_of(&[("mesh", "D1", "a.off", &[VALID_SOLID_OUTPUT]), ("mesh", "D1", "b.off", &[TIMEOUT])]);
        let compare = store_of(&[("mesh", "D1", "a.off", &[VALID_SOLID_OUTPUT]), ("mesh", "D1", "b.off", &[VALID_SOLID_OUTPUT])]);
        let summary = sample_summary(summary_rows(&current, Some(&compare)));
        let view = DrillDown::new(&current, Some(&compare), "mesh", TypeFilter::Timeout);
        let drilldown = build_drilldown(&view, None, None, None);

        let mut buf = Vec::new();
        write_markdown_report(&mut buf, &summary, Some(&drilldown)).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("# Benchmark Results Report"));
        assert!(text.contains("**Comparison Dataset**: 2024-01-01"));
        assert!(text.contains("Finished At: 2024-02-01 06:00"));
        assert!(text.contains("| mesh | 1 (-1) | 0 | 1 (+1) |"));
        assert!(text.contains("**Regressed**: mesh"));
        assert!(text.contains("## mesh - Timeout Files"));
        assert!(text.contains("  + b.off"));
        assert!(!text.contains("\x1b["), "markdown must not contain color codes");
    }

    #[test]
    fn test_json_export_round_trips_through_serde() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let current = store_of(&[("mesh", "D1", "a.off", &[VALID_SOLID_OUTPUT])]);
        let summary = sample_summary(summary_rows(&current, None));
        export_json_report(&summary, None, &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["header"]["date"], "2024-02-01");
        assert_eq!(value["summary"]["rows"][0]["component"], "mesh");
        assert_eq!(value["summary"]["rows"][0]["valid"]["count"], 1);
        assert!(value["drilldown"].is_null());
        assert!(value["generated"].is_string());
    }
}
