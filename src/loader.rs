/// Result store loader
///
/// This module handles:
/// - Filtering a listing down to `<component>_results_<YYYY-MM-DD>...json` files
/// - Grouping those files by embedded date
/// - Fetching every file of one date concurrently and merging them into a store
///
/// Per-file failures are logged and skipped; a load never aborts as a whole.
use crate::error::SourceError;
use crate::source::ResultSource;
use crate::store::{ComponentResults, ResultStore};
use lazy_static::lazy_static;
use log::{debug, warn};
use rayon::prelude::*;
use regex::Regex;
use std::collections::BTreeMap;

const RESULTS_MARKER: &str = "_results_";

lazy_static! {
    static ref DATE_RE: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid date regex");
}

/// Whether a listing entry is a result file at all
pub fn is_result_file(name: &str) -> bool {
    name.contains(RESULTS_MARKER) && name.ends_with(".json")
}

/// First `YYYY-MM-DD` substring of a file name
pub fn date_from_filename(name: &str) -> Option<&str> {
    DATE_RE.captures(name).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Component name: the part of the base name before `_results_`
///
/// `"mesh_results_2024-01-01_run1.json"` -> `"mesh"`
pub fn component_from_filename(name: &str) -> Option<&str> {
    let base = name.rsplit('/').next().unwrap_or(name);
    match base.find(RESULTS_MARKER) {
        Some(idx) if idx > 0 => Some(&base[..idx]),
        _ => None,
    }
}

/// Result files of a listing, grouped by date
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_date: BTreeMap<String, Vec<String>>,
}

impl Catalog {
    /// Build from raw listing entries; non-result files and undated files are dropped
    pub fn from_listing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_date: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            if !is_result_file(name) {
                continue;
            }
            match date_from_filename(name) {
                Some(date) => {
                    let files = by_date.entry(date.to_string()).or_default();
                    if !files.iter().any(|f| f == name) {
                        files.push(name.to_string());
                    }
                }
                None => debug!("skipping result file without a date: {}", name),
            }
        }
        for files in by_date.values_mut() {
            files.sort();
        }
        Catalog { by_date }
    }

    /// Fetch the listing from `source`
    ///
    /// A failing listing is reported and treated as "no dates available".
    pub fn fetch(source: &ResultSource) -> Self {
        match source.list() {
            Ok(names) => Self::from_listing(names),
            Err(e) => {
                warn!("Error fetching JSON files: {}", e);
                Catalog::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Available dates, newest first
    pub fn dates(&self) -> Vec<&str> {
        self.by_date.keys().rev().map(String::as_str).collect()
    }

    pub fn latest(&self) -> Option<&str> {
        self.by_date.keys().next_back().map(String::as_str)
    }

    pub fn contains(&self, date: &str) -> bool {
        self.by_date.contains_key(date)
    }

    /// Files recorded for `date` (empty when unknown)
    pub fn files_for(&self, date: &str) -> &[String] {
        self.by_date.get(date).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Result of loading all files of one date
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub date: String,
    pub store: ResultStore,
    /// Files that could not be fetched or parsed, with the reason
    pub failures: Vec<(String, String)>,
}

impl LoadOutcome {
    pub fn loaded_files(&self, attempted: usize) -> usize {
        attempted.saturating_sub(self.failures.len())
    }
}

/// Unwrap `{ component: {...} }` when the payload is keyed by its own
/// component name; otherwise the whole payload is the dataset map.
pub fn component_payload<'v>(component: &str, data: &'v serde_json::Value) -> &'v serde_json::Value {
    match data.get(component) {
        Some(inner) if !inner.is_null() => inner,
        _ => data,
    }
}

fn load_file(source: &ResultSource, file: &str) -> Result<(String, ComponentResults), SourceError> {
    let component = component_from_filename(file).ok_or_else(|| SourceError::UnknownComponent(file.to_string()))?;
    let data = source.fetch_json(file)?;
    let results = ComponentResults::from_payload(component, component_payload(component, &data));
    Ok((component.to_string(), results))
}

/// Fetch every file of `date` concurrently and merge them into one store
///
/// Returns only once every fetch has settled. Merging happens afterwards in
/// file-name order, so two files of the same component resolve the same way
/// on every run.
pub fn load_date(source: &ResultSource, catalog: &Catalog, date: &str) -> LoadOutcome {
    let files = catalog.files_for(date);
    let mut outcome = LoadOutcome { date: date.to_string(), ..Default::default() };
    if files.is_empty() {
        warn!("No files found for date: {}", date);
        return outcome;
    }

    debug!("loading {} files for {}", files.len(), date);
    let settled: Vec<(&String, Result<(String, ComponentResults), SourceError>)> =
        files.par_iter().map(|file| (file, load_file(source, file))).collect();

    for (file, result) in settled {
        match result {
            Ok((component, results)) => {
                debug!("loaded {} ({} files) from {}", component, results.file_count(), file);
                outcome.store.insert_component(&component, results);
            }
            Err(e) => {
                warn!("Error loading JSON file: {}: {}", file, e);
                outcome.failures.push((file.clone(), e.to_string()));
            }
        }
    }

    if outcome.store.is_empty() {
        warn!("No valid data loaded for date: {}", date);
    }
    outcome
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;
