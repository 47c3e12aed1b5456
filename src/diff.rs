/// File-level differences between the current and comparison stores
///
/// Every entry carries its full (component, dataset, file) triple so callers
/// never have to infer which component a record came from.
use crate::classify::matches_type;
use crate::store::ResultStore;
use crate::types::{ResultRecord, TypeFilter};
use serde::Serialize;
use std::collections::BTreeSet;

/// Reference to one record in a store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRef<'a> {
    pub component: &'a str,
    pub dataset: &'a str,
    pub file_name: &'a str,
    pub record: &'a ResultRecord,
}

/// Direction of a classification change for a file present in both stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Matches the filter now but did not in the comparison
    AddedToType,
    /// Matched the filter in the comparison but no longer does
    RemovedFromType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeChange<'a> {
    #[serde(flatten)]
    pub file: FileRef<'a>,
    pub change: ChangeType,
}

/// Result of comparing one component under one filter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Differences<'a> {
    pub added: Vec<FileRef<'a>>,
    pub removed: Vec<FileRef<'a>>,
    pub changed_type: Vec<TypeChange<'a>>,
}

impl<'a> Differences<'a> {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed_type.is_empty()
    }

    /// Whether `file_name` of `dataset` shows up as added (or added to the type)
    pub fn is_added(&self, dataset: &str, file_name: &str) -> bool {
        self.added.iter().any(|f| f.dataset == dataset && f.file_name == file_name)
            || self.changed_type.iter().any(|c| {
                c.change == ChangeType::AddedToType && c.file.dataset == dataset && c.file.file_name == file_name
            })
    }

    /// Whether `file_name` of `dataset` left the view (removed, or removed from the type)
    pub fn is_departed(&self, dataset: &str, file_name: &str) -> bool {
        self.departed_from(dataset).iter().any(|f| f.file_name == file_name)
    }

    /// Files that left the view for `dataset`: removed outright or removed from the type
    pub fn departed_from(&self, dataset: &str) -> Vec<&FileRef<'a>> {
        self.removed
            .iter()
            .filter(|f| f.dataset == dataset)
            .chain(
                self.changed_type
                    .iter()
                    .filter(|c| c.change == ChangeType::RemovedFromType && c.file.dataset == dataset)
                    .map(|c| &c.file),
            )
            .collect()
    }
}

/// Compare `component` between `current` and `compare` under `filter`
///
/// Datasets present in either store are visited; a missing dataset counts as
/// every one of its files being absent. Classification changes are only
/// computed for a concrete class, never for [`TypeFilter::All`].
pub fn diff<'a>(
    current: &'a ResultStore,
    compare: &'a ResultStore,
    component: &'a str,
    filter: TypeFilter,
) -> Differences<'a> {
    let mut out = Differences::default();

    let current_sets = current.component(component).map(|c| &c.datasets);
    let compare_sets = compare.component(component).map(|c| &c.datasets);

    let mut dataset_names: BTreeSet<&'a str> = BTreeSet::new();
    for sets in [current_sets, compare_sets].into_iter().flatten() {
        dataset_names.extend(sets.keys().map(String::as_str));
    }

    for dataset in dataset_names {
        let now = current_sets.and_then(|s| s.get(dataset));
        let before = compare_sets.and_then(|s| s.get(dataset));

        for (file_name, record) in now.into_iter().flatten() {
            let file = FileRef { component, dataset, file_name, record };
            match before.and_then(|b| b.get(file_name)) {
                None => {
                    if matches_type(record, filter) {
                        out.added.push(file);
                    }
                }
                Some(previous) => {
                    if filter == TypeFilter::All {
                        continue;
                    }
                    let is_type = matches_type(record, filter);
                    let was_type = matches_type(previous, filter);
                    if is_type && !was_type {
                        out.changed_type.push(TypeChange { file, change: ChangeType::AddedToType });
                    } else if !is_type && was_type {
                        out.changed_type.push(TypeChange {
                            file: FileRef { record: previous, ..file },
                            change: ChangeType::RemovedFromType,
                        });
                    }
                }
            }
        }

        for (file_name, record) in before.into_iter().flatten() {
            let still_present = now.map(|n| n.contains_key(file_name)).unwrap_or(false);
            if !still_present && matches_type(record, filter) {
                out.removed.push(FileRef { component, dataset, file_name, record });
            }
        }
    }

    out
}

#[cfg(test)]
#[path = "diff_test.rs"]
mod diff_test;
