//! Report type definitions for the rendering model.
//!
//! These types sit between the aggregator and the console/Markdown/JSON
//! renderers: counts and deltas are already resolved into cells with a trend.

use crate::aggregate::AddRemove;
use crate::drilldown::{DatasetEntry, FileDetail, FileListing, FileRow};
use crate::types::{Classification, Trend, TypeFilter};
use serde::Serialize;
use term::color::Color;

/// One count of the summary table, with its optional comparison delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountCell {
    pub count: usize,
    /// Present only when a comparison date is selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<AddRemove>,
    pub trend: Trend,
}

impl CountCell {
    /// `"12 (+3) (-1)"`; zero parts of the delta are omitted.
    pub fn format(&self) -> String {
        let mut out = self.count.to_string();
        if let Some(change) = self.change {
            if change.added > 0 {
                out.push_str(&format!(" (+{})", change.added));
            }
            if change.removed > 0 {
                out.push_str(&format!(" (-{})", change.removed));
            }
        }
        out
    }
}

/// One component row of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub component: String,
    pub valid: CountCell,
    pub error: CountCell,
    pub timeout: CountCell,
    /// Set when a comparison shows any classification moving the wrong way
    pub regressed: bool,
}

impl SummaryRow {
    pub fn cell(&self, class: Classification) -> &CountCell {
        match class {
            Classification::Valid => &self.valid,
            Classification::Error => &self.error,
            Classification::Timeout => &self.timeout,
        }
    }

    pub fn is_regression(&self) -> bool {
        self.regressed
    }
}

/// Comparison part of the summary header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompareHeader {
    pub date: String,
    pub files: usize,
    /// compare - current
    pub file_diff: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryHeader {
    pub date: String,
    pub datasets: usize,
    pub files: usize,
    pub finished_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare: Option<CompareHeader>,
}

impl SummaryHeader {
    pub fn finished_at_line(&self) -> String {
        match &self.finished_at {
            Some(at) => format!("Finished At: {}", at),
            None => "Finished At: (not recorded)".to_string(),
        }
    }
}

/// Header plus one row per component of the current date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub header: SummaryHeader,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn has_regression(&self) -> bool {
        self.rows.iter().any(SummaryRow::is_regression)
    }

    pub fn regressed_components(&self) -> Vec<&str> {
        self.rows.iter().filter(|r| r.is_regression()).map(|r| r.component.as_str()).collect()
    }
}

/// Everything rendered for one drill-down selection.
///
/// Either `files` (the selected dataset) or `search_results` is filled, never
/// both. Problems with the requested dataset or file end up in `notices`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrillDownReport<'a> {
    pub component: &'a str,
    #[serde(rename = "type")]
    pub type_filter: TypeFilter,
    pub comparing: bool,
    pub datasets: Vec<DatasetEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FileListing<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub search_results: Vec<FileRow<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<FileDetail<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

/// Color used for a trend label
pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Better => term::color::BRIGHT_GREEN,
        Trend::Worse => term::color::BRIGHT_RED,
        Trend::Same => term::color::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_cell_format() {
        let plain = CountCell { count: 4, change: None, trend: Trend::Same };
        assert_eq!(plain.format(), "4");

        let both = CountCell { count: 12, change: Some(AddRemove { added: 3, removed: 1 }), trend: Trend::Better };
        assert_eq!(both.format(), "12 (+3) (-1)");

        let unchanged = CountCell { count: 7, change: Some(AddRemove::default()), trend: Trend::Same };
        assert_eq!(unchanged.format(), "7");
    }

    #[test]
    fn test_finished_at_line() {
        let mut header =
            SummaryHeader { date: "2024-01-01".into(), datasets: 1, files: 2, finished_at: None, compare: None };
        assert_eq!(header.finished_at_line(), "Finished At: (not recorded)");
        header.finished_at = Some("2024-01-01 04:00".into());
        assert_eq!(header.finished_at_line(), "Finished At: 2024-01-01 04:00");
    }

    #[test]
    fn test_trend_color() {
        assert_eq!(trend_color(Trend::Better), term::color::BRIGHT_GREEN);
        assert_eq!(trend_color(Trend::Worse), term::color::BRIGHT_RED);
    }
}
