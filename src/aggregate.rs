/// Classification counts per component, with added/removed deltas against a
/// comparison store.
use crate::classify::classify;
use crate::store::{Dataset, ResultStore};
use crate::types::{Classification, ResultRecord, Trend};
use serde::Serialize;
use std::collections::HashSet;

/// Number of files in each classification bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub valid: usize,
    pub error: usize,
    pub timeout: usize,
}

impl ClassCounts {
    pub fn get(&self, class: Classification) -> usize {
        match class {
            Classification::Valid => self.valid,
            Classification::Error => self.error,
            Classification::Timeout => self.timeout,
        }
    }

    fn bump(&mut self, record: &ResultRecord) {
        for class in classify(record).iter() {
            match class {
                Classification::Valid => self.valid += 1,
                Classification::Error => self.error += 1,
                Classification::Timeout => self.timeout += 1,
            }
        }
    }
}

/// Files that entered and left one classification between two stores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AddRemove {
    pub added: usize,
    pub removed: usize,
}

impl AddRemove {
    pub fn diff(&self) -> i64 {
        self.added as i64 - self.removed as i64
    }
}

/// Per-classification deltas of one component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateDiff {
    pub valid: AddRemove,
    pub error: AddRemove,
    pub timeout: AddRemove,
}

impl AggregateDiff {
    pub fn get(&self, class: Classification) -> AddRemove {
        match class {
            Classification::Valid => self.valid,
            Classification::Error => self.error,
            Classification::Timeout => self.timeout,
        }
    }

    fn get_mut(&mut self, class: Classification) -> &mut AddRemove {
        match class {
            Classification::Valid => &mut self.valid,
            Classification::Error => &mut self.error,
            Classification::Timeout => &mut self.timeout,
        }
    }

    /// Trend of one classification, honoring its polarity
    pub fn trend(&self, class: Classification) -> Trend {
        Trend::from_delta(self.get(class).diff() as f64, class.polarity())
    }

    /// True when any classification moved in the wrong direction
    pub fn is_regression(&self) -> bool {
        Classification::ALL.iter().any(|c| self.trend(*c) == Trend::Worse)
    }
}

/// Count files of `component` per classification across all its datasets
pub fn aggregate(store: &ResultStore, component: &str) -> ClassCounts {
    let mut counts = ClassCounts::default();
    if let Some(results) = store.component(component) {
        for dataset in results.datasets.values() {
            for record in dataset.values() {
                counts.bump(record);
            }
        }
    }
    counts
}

/// Count the files of a single dataset per classification
pub fn dataset_counts(dataset: &Dataset) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for record in dataset.values() {
        counts.bump(record);
    }
    counts
}

/// Added/removed counts per classification of `component`
///
/// A record is "added" to a class when it matches in `current` and is either
/// absent from `compare` or did not match there; "removed" is the mirror image.
pub fn aggregate_diff(current: &ResultStore, compare: &ResultStore, component: &str) -> AggregateDiff {
    let mut result = AggregateDiff::default();
    count_departures(current, compare, component, |class| result.get_mut(class).added += 1);
    count_departures(compare, current, component, |class| result.get_mut(class).removed += 1);
    result
}

/// Call `hit` once per class matched by a file of `from` that the same file
/// does not match in `other` (or the file is missing there).
fn count_departures<F>(from: &ResultStore, other: &ResultStore, component: &str, mut hit: F)
where
    F: FnMut(Classification),
{
    let Some(results) = from.component(component) else {
        return;
    };
    for (dataset_name, dataset) in &results.datasets {
        for (file_name, record) in dataset {
            let counterpart = other.get(component, dataset_name, file_name).map(classify);
            for class in classify(record).iter() {
                let still_matches = counterpart.map(|set| set.contains(class)).unwrap_or(false);
                if !still_matches {
                    hit(class);
                }
            }
        }
    }
}

/// Distinct dataset and file counts over a whole store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub datasets: usize,
    pub files: usize,
}

/// Distinct dataset names across components, and distinct `path + file` names
pub fn totals(store: &ResultStore) -> Totals {
    let mut datasets = HashSet::new();
    let mut files = HashSet::new();
    for (_, results) in store.components() {
        for (dataset_name, dataset) in &results.datasets {
            datasets.insert(dataset_name.as_str());
            for (file_name, record) in dataset {
                files.insert(record.display_name(file_name));
            }
        }
    }
    Totals { datasets: datasets.len(), files: files.len() }
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod aggregate_test;
