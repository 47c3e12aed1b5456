/// Drill-down views for one (component, type) selection
///
/// This module handles:
/// - The dataset list with per-dataset count differences
/// - The file list of one dataset, tagged with the differ's verdict
/// - Search over every listed file of the component
/// - The file-detail panel with metric comparisons
use crate::aggregate::dataset_counts;
use crate::classify::matches_type;
use crate::diff::{Differences, diff};
use crate::session::Session;
use crate::store::{Dataset, ResultStore};
use crate::types::{MetricValue, Polarity, ResultRecord, Trend, TypeFilter};
use regex::{Captures, RegexBuilder};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Metric labels (substrings) where a smaller value is an improvement
const LOWER_IS_BETTER: &[&str] = &["seconds", "memory_peaks", "Complexity", "degenerate_triangle", "Hausdorff_distance"];
/// Metric labels (substrings) where a larger value is an improvement
const HIGHER_IS_BETTER: &[&str] = &["Mean_Min_Angle", "Mean_Radius_Ratio"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetEntry {
    pub name: String,
    /// Files of the current store matching the type
    pub file_count: usize,
    /// current - compare for the type (file counts for "all"); 0 without a comparison
    pub diff: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Unchanged,
}

impl FileStatus {
    pub fn is_different(&self) -> bool {
        *self != FileStatus::Unchanged
    }
}

/// One entry of a file list or search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRow<'a> {
    pub file_name: &'a str,
    pub display_name: String,
    pub dataset: &'a str,
    /// Current record, or the comparison record for removed files
    #[serde(skip)]
    pub record: &'a ResultRecord,
    pub status: FileStatus,
}

impl FileRow<'_> {
    /// Differing files first, added before removed, then by file name
    fn display_order(&self, other: &Self) -> Ordering {
        other
            .status
            .is_different()
            .cmp(&self.status.is_different())
            .then(self.status.cmp(&other.status))
            .then_with(|| self.file_name.cmp(other.file_name))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
}

impl DiffSummary {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// "+N new -M removed", omitting zero parts
impl std::fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("+{} new", self.added));
        }
        if self.removed > 0 {
            parts.push(format!("-{} removed", self.removed));
        }
        f.write_str(&parts.join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileListing<'a> {
    pub rows: Vec<FileRow<'a>>,
    pub summary: DiffSummary,
}

/// One labelled metric with its optional comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub label: String,
    pub title: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl MetricRow {
    fn new(label: &str, value: &MetricValue, compare: Option<&MetricValue>) -> Self {
        let percent = compare.and_then(|c| percent_change(value, c));
        let trend = match (percent, value.as_f64(), compare.and_then(MetricValue::as_f64)) {
            (Some(_), Some(cur), Some(cmp)) => Some(Trend::from_delta(cur - cmp, metric_polarity(label))),
            _ => None,
        };
        MetricRow {
            label: label.to_string(),
            title: format_label(label),
            value: value.to_string(),
            compare_value: compare.map(|c| c.to_string()),
            percent_change: percent,
            trend,
        }
    }

    /// "(+12.50% | 3.2)" when a percentage is available
    pub fn comparison_text(&self) -> Option<String> {
        match (self.percent_change, &self.compare_value) {
            (Some(p), Some(cmp)) => Some(format!("({}% | {})", format_percent(p), cmp)),
            _ => None,
        }
    }
}

/// Everything shown for a single file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDetail<'a> {
    pub dataset: &'a str,
    pub file_name: &'a str,
    pub display_name: String,
    pub status: FileStatus,
    pub performance: Vec<MetricRow>,
    pub quality: Vec<MetricRow>,
    /// Robustness flags, verbatim
    pub robustness: Vec<(String, String)>,
}

fn metric_rows(current: &BTreeMap<String, MetricValue>, compare: Option<&BTreeMap<String, MetricValue>>) -> Vec<MetricRow> {
    current
        .iter()
        .map(|(label, value)| MetricRow::new(label, value, compare.and_then(|c| c.get(label))))
        .collect()
}

impl<'a> FileDetail<'a> {
    fn build(
        dataset: &'a str,
        file_name: &'a str,
        record: &'a ResultRecord,
        compare: Option<&'a ResultRecord>,
        status: FileStatus,
    ) -> Self {
        let robustness = record
            .robustness
            .iter()
            .flat_map(|r| r.iter())
            .map(|(k, v)| {
                let shown = match v.as_str() {
                    Some(s) => s.to_string(),
                    None => v.to_string(),
                };
                (k.clone(), shown)
            })
            .collect();
        FileDetail {
            dataset,
            file_name,
            display_name: record.display_name(file_name),
            status,
            performance: metric_rows(&record.performance, compare.map(|c| &c.performance)),
            quality: metric_rows(&record.quality, compare.map(|c| &c.quality)),
            robustness,
        }
    }
}

/// Views over one component under one type filter
pub struct DrillDown<'a> {
    current: &'a ResultStore,
    compare: Option<&'a ResultStore>,
    component: &'a str,
    filter: TypeFilter,
    differences: Option<Differences<'a>>,
}

impl<'a> DrillDown<'a> {
    pub fn new(current: &'a ResultStore, compare: Option<&'a ResultStore>, component: &'a str, filter: TypeFilter) -> Self {
        let differences = compare.map(|c| diff(current, c, component, filter));
        DrillDown { current, compare, component, filter, differences }
    }

    pub fn from_session(session: &'a Session, component: &'a str, filter: TypeFilter) -> Self {
        let compare = if session.has_compare() { Some(session.compare()) } else { None };
        Self::new(session.current(), compare, component, filter)
    }

    pub fn component(&self) -> &'a str {
        self.component
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    /// Whether the current store has this component at all
    pub fn exists(&self) -> bool {
        self.current.component(self.component).is_some()
    }

    pub fn differences(&self) -> Option<&Differences<'a>> {
        self.differences.as_ref()
    }

    fn matching(&self, dataset: &Dataset) -> usize {
        match self.filter.classification() {
            Some(class) => dataset_counts(dataset).get(class),
            None => dataset.len(),
        }
    }

    /// Datasets with at least one matching file, in display order
    pub fn datasets(&self) -> Vec<DatasetEntry> {
        let Some(results) = self.current.component(self.component) else {
            return Vec::new();
        };
        let mut entries: Vec<DatasetEntry> = results
            .datasets
            .iter()
            .map(|(name, dataset)| {
                let file_count = self.matching(dataset);
                let diff = match self.compare {
                    Some(compare) => {
                        let before = compare.dataset(self.component, name).map(|d| self.matching(d)).unwrap_or(0);
                        file_count as i64 - before as i64
                    }
                    None => 0,
                };
                DatasetEntry { name: name.clone(), file_count, diff }
            })
            .filter(|e| e.file_count > 0)
            .collect();

        let comparing = self.compare.is_some();
        entries.sort_by(|a, b| {
            let by_diff = if comparing { b.diff.abs().cmp(&a.diff.abs()) } else { Ordering::Equal };
            by_diff.then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    /// Matching files of `dataset` plus the files that left it
    pub fn files(&self, dataset: &str) -> FileListing<'a> {
        let mut rows = Vec::new();
        if let Some((name, files)) = self.current.component(self.component).and_then(|c| c.datasets.get_key_value(dataset)) {
            for (file_name, record) in files {
                if !matches_type(record, self.filter) {
                    continue;
                }
                let added = self.differences.as_ref().map(|d| d.is_added(name, file_name)).unwrap_or(false);
                rows.push(FileRow {
                    file_name,
                    display_name: record.display_name(file_name),
                    dataset: name,
                    record,
                    status: if added { FileStatus::Added } else { FileStatus::Unchanged },
                });
            }
        }
        if let Some(d) = &self.differences {
            for file in d.departed_from(dataset) {
                rows.push(FileRow {
                    file_name: file.file_name,
                    display_name: file.record.display_name(file.file_name),
                    dataset: file.dataset,
                    record: file.record,
                    status: FileStatus::Removed,
                });
            }
        }
        rows.sort_by(|a, b| a.display_order(b));

        let summary = DiffSummary {
            added: rows.iter().filter(|r| r.status == FileStatus::Added).count(),
            removed: rows.iter().filter(|r| r.status == FileStatus::Removed).count(),
        };
        FileListing { rows, summary }
    }

    /// Every listed file across the datasets, in dataset display order
    pub fn search_index(&self) -> Vec<FileRow<'a>> {
        self.datasets().iter().flat_map(|d| self.files(&d.name).rows).collect()
    }

    /// Case-insensitive search over display names and dataset names
    pub fn search(&self, term: &str) -> Vec<FileRow<'a>> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.search_index()
            .into_iter()
            .filter(|row| row.display_name.to_lowercase().contains(&needle) || row.dataset.to_lowercase().contains(&needle))
            .collect()
    }

    /// Detail panel for `file_name`
    ///
    /// With no dataset given, the first dataset (by name) holding the file is
    /// used. Files that only exist in the comparison are shown as removed.
    pub fn detail(&self, dataset: Option<&str>, file_name: &str) -> Option<FileDetail<'a>> {
        if let Some(found) = locate(self.current, self.component, dataset, file_name) {
            let (dataset, file_name, record) = found;
            let compare = self.compare.and_then(|c| c.get(self.component, dataset, file_name));
            let status = match &self.differences {
                Some(d) if d.is_added(dataset, file_name) => FileStatus::Added,
                Some(d) if d.is_departed(dataset, file_name) => FileStatus::Removed,
                _ => FileStatus::Unchanged,
            };
            return Some(FileDetail::build(dataset, file_name, record, compare, status));
        }
        let (dataset, file_name, record) = locate(self.compare?, self.component, dataset, file_name)?;
        Some(FileDetail::build(dataset, file_name, record, None, FileStatus::Removed))
    }
}

fn locate<'a>(
    store: &'a ResultStore,
    component: &str,
    dataset: Option<&str>,
    file_name: &str,
) -> Option<(&'a str, &'a str, &'a ResultRecord)> {
    let results = store.component(component)?;
    results
        .datasets
        .iter()
        .filter(|(name, _)| dataset.is_none_or(|d| d == name.as_str()))
        .find_map(|(name, files)| files.get_key_value(file_name).map(|(f, r)| (name.as_str(), f.as_str(), r)))
}

/// Improvement direction of a metric, by label
pub fn metric_polarity(label: &str) -> Polarity {
    if LOWER_IS_BETTER.iter().any(|m| label.contains(m)) {
        Polarity::LowerIsBetter
    } else if HIGHER_IS_BETTER.iter().any(|m| label.contains(m)) {
        Polarity::HigherIsBetter
    } else {
        Polarity::Neutral
    }
}

/// `((cur - cmp) / |cmp|) * 100`, when both parse and `cmp != 0`
pub fn percent_change(current: &MetricValue, compare: &MetricValue) -> Option<f64> {
    let cur = current.as_f64()?;
    let cmp = compare.as_f64()?;
    if cmp == 0.0 {
        return None;
    }
    Some((cur - cmp) / cmp.abs() * 100.0)
}

/// Two decimals, with an explicit `+` for increases
pub fn format_percent(p: f64) -> String {
    if p > 0.0 { format!("+{:.2}", p) } else { format!("{:.2}", p) }
}

/// `"Hausdorff_distance"` -> `"Hausdorff Distance"`
pub fn format_label(label: &str) -> String {
    label
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Wrap every case-insensitive occurrence of `term` in `text` with `wrap`
pub fn highlight<F>(text: &str, term: &str, wrap: F) -> String
where
    F: Fn(&str) -> String,
{
    let term = term.trim();
    if term.is_empty() {
        return text.to_string();
    }
    match RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build() {
        Ok(re) => re.replace_all(text, |caps: &Captures| wrap(&caps[0])).into_owned(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
#[path = "drilldown_test.rs"]
mod drilldown_test;
