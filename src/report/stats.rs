//! Summary statistics for the selected dates.
//!
//! Turns the current and comparison stores into the summary header and one
//! row of classification counts per component.

use super::types::{CompareHeader, CountCell, DrillDownReport, Summary, SummaryHeader, SummaryRow};
use crate::aggregate::{aggregate, aggregate_diff, totals};
use crate::drilldown::DrillDown;
use crate::session::Session;
use crate::store::ResultStore;
use crate::types::{Classification, Trend};

/// Build one summary row per component of `current`.
///
/// # Arguments
/// * `current` - Store of the current date
/// * `compare` - Store of the comparison date, if one is selected
pub fn summary_rows(current: &ResultStore, compare: Option<&ResultStore>) -> Vec<SummaryRow> {
    current
        .component_names()
        .map(|component| {
            let counts = aggregate(current, component);
            let delta = compare.map(|c| aggregate_diff(current, c, component));
            let cell = |class: Classification| CountCell {
                count: counts.get(class),
                change: delta.map(|d| d.get(class)),
                trend: delta.map(|d| d.trend(class)).unwrap_or(Trend::Same),
            };
            SummaryRow {
                component: component.to_string(),
                valid: cell(Classification::Valid),
                error: cell(Classification::Error),
                timeout: cell(Classification::Timeout),
                regressed: delta.is_some_and(|d| d.is_regression()),
            }
        })
        .collect()
}

/// Summary of the session's selection; `None` before a current date is chosen.
pub fn build_summary(session: &Session) -> Option<Summary> {
    let date = session.current_date()?;
    let current = session.current();
    let current_totals = totals(current);

    let compare = session.compare_date().map(|compare_date| {
        let files = totals(session.compare()).files;
        CompareHeader { date: compare_date.to_string(), files, file_diff: files as i64 - current_totals.files as i64 }
    });

    let header = SummaryHeader {
        date: date.to_string(),
        datasets: current_totals.datasets,
        files: current_totals.files,
        finished_at: current.finished_at().map(str::to_string),
        compare,
    };

    let compare_store = if session.has_compare() { Some(session.compare()) } else { None };
    Some(Summary { header, rows: summary_rows(current, compare_store) })
}

/// Resolve a drill-down selection into what gets rendered.
///
/// # Arguments
/// * `view` - Drill-down over one (component, type)
/// * `dataset` - Requested dataset; defaults to the first listed one
/// * `search` - Search term; replaces the file list when given
/// * `file` - File to show in the detail panel
pub fn build_drilldown<'a>(
    view: &DrillDown<'a>,
    dataset: Option<&str>,
    search: Option<&str>,
    file: Option<&str>,
) -> DrillDownReport<'a> {
    let datasets = view.datasets();
    let mut notices = Vec::new();
    let label = format!("{} ({})", view.component(), view.filter().as_str());

    if !view.exists() {
        notices.push(format!("component {} not found for the selected date", view.component()));
    }

    let mut report = DrillDownReport {
        component: view.component(),
        type_filter: view.filter(),
        comparing: view.differences().is_some(),
        datasets,
        dataset: None,
        files: None,
        search_term: None,
        search_results: Vec::new(),
        detail: None,
        notices: Vec::new(),
    };

    match search.map(str::trim).filter(|t| !t.is_empty()) {
        Some(term) => {
            report.search_results = view.search(term);
            report.search_term = Some(term.to_string());
        }
        None => {
            let selected = match dataset {
                Some(name) if report.datasets.iter().any(|d| d.name == name) => Some(name.to_string()),
                Some(name) => {
                    notices.push(format!("dataset {} has no matching files in {}", name, label));
                    None
                }
                None => report.datasets.first().map(|d| d.name.clone()),
            };
            if let Some(name) = selected {
                report.files = Some(view.files(&name));
                report.dataset = Some(name);
            }
        }
    }

    if let Some(file_name) = file {
        report.detail = view.detail(dataset, file_name);
        if report.detail.is_none() {
            match dataset {
                Some(d) => notices.push(format!("file {} not found in {}/{}", file_name, view.component(), d)),
                None => notices.push(format!("file {} not found in {}", file_name, view.component())),
            }
        }
    }

    report.notices = notices;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadOutcome;
    use crate::test_util::*;
    use crate::types::*;

    fn loaded(date: &str, compare: Option<(&str, ResultStore)>, current: ResultStore) -> Session {
        let mut session = Session::new();
        let token = session.select_date(date);
        session.apply(token, LoadOutcome { date: date.to_string(), store: current, failures: Vec::new() });
        if let Some((compare_date, store)) = compare {
            let token = session.select_compare(Some(compare_date)).unwrap();
            session.apply(token, LoadOutcome { date: compare_date.to_string(), store, failures: Vec::new() });
        }
        session
    }

    #[test]
    fn test_summary_without_compare() {
        let session = loaded(
            "2024-02-01",
            None,
            store_of(&[
                ("mesh", "D1", "a", &[VALID_SOLID_OUTPUT]),
                ("mesh", "D1", "b", &[TIMEOUT]),
                ("wrap", "D2", "a", &[INPUT_IS_INVALID]),
            ]),
        );
        let summary = build_summary(&session).unwrap();
        assert_eq!(summary.header.date, "2024-02-01");
        assert_eq!(summary.header.datasets, 2);
        assert_eq!(summary.header.files, 2, "files are distinct by display name");
        assert!(summary.header.compare.is_none());

        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].component, "mesh");
        assert_eq!(summary.rows[0].valid.format(), "1");
        assert_eq!(summary.rows[0].timeout.count, 1);
        assert!(!summary.has_regression());
    }

    #[test]
    fn test_summary_with_compare_trends() {
        let session = loaded(
            "2024-02-01",
            Some((
                "2024-01-01",
                store_of(&[
                    ("mesh", "D1", "a", &[TIMEOUT]),
                    ("mesh", "D1", "b", &[VALID_SOLID_OUTPUT]),
                    ("mesh", "D1", "c", &[VALID_SOLID_OUTPUT]),
                ]),
            )),
            store_of(&[("mesh", "D1", "a", &[VALID_SOLID_OUTPUT]), ("mesh", "D1", "b", &[TIMEOUT])]),
        );
        let summary = build_summary(&session).unwrap();
        let header = summary.header.compare.as_ref().unwrap();
        assert_eq!(header.files, 3);
        assert_eq!(header.file_diff, 1);

        let row = &summary.rows[0];
        assert_eq!(row.valid.format(), "1 (+1) (-2)");
        assert_eq!(row.valid.trend, Trend::Worse);
        assert_eq!(row.timeout.format(), "1 (+1) (-1)");
        assert_eq!(row.timeout.trend, Trend::Same);
        assert!(summary.has_regression());
        assert_eq!(summary.regressed_components(), vec!["mesh"]);
    }

    #[test]
    fn test_drilldown_defaults_to_first_dataset() {
        let current = store_of(&[("mesh", "B", "f", &[TIMEOUT]), ("mesh", "A", "g", &[VALID_SOLID_OUTPUT])]);
        let view = DrillDown::new(&current, None, "mesh", TypeFilter::All);
        let report = build_drilldown(&view, None, None, None);
        assert_eq!(report.dataset.as_deref(), Some("A"));
        assert_eq!(report.files.as_ref().unwrap().rows.len(), 1);
        assert!(report.notices.is_empty());
        assert!(!report.comparing);
    }

    #[test]
    fn test_drilldown_search_replaces_file_list() {
        let current = store_of(&[("mesh", "A", "foo.off", &[]), ("mesh", "A", "bar.off", &[])]);
        let view = DrillDown::new(&current, None, "mesh", TypeFilter::All);
        let report = build_drilldown(&view, Some("A"), Some(" FOO "), None);
        assert!(report.files.is_none());
        assert_eq!(report.search_term.as_deref(), Some("FOO"));
        assert_eq!(report.search_results.len(), 1);
    }

    #[test]
    fn test_drilldown_reports_missing_pieces() {
        let current = store_of(&[("mesh", "A", "f", &[VALID_SOLID_OUTPUT])]);
        let view = DrillDown::new(&current, None, "mesh", TypeFilter::Timeout);
        let report = build_drilldown(&view, Some("A"), None, Some("nope"));
        assert!(report.files.is_none());
        assert_eq!(report.notices.len(), 2);

        let view = DrillDown::new(&current, None, "other", TypeFilter::All);
        let report = build_drilldown(&view, None, None, None);
        assert!(report.datasets.is_empty());
        assert!(report.notices[0].contains("component other not found"));

        let view = DrillDown::new(&current, None, "mesh", TypeFilter::All);
        let report = build_drilldown(&view, None, None, Some("f"));
        assert_eq!(report.detail.unwrap().dataset, "A");
    }

    #[test]
    fn test_no_summary_before_selection() {
        assert!(build_summary(&Session::new()).is_none());
    }
}
