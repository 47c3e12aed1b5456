/// In-memory result store
///
/// A store maps component -> dataset -> file name -> record for one selected
/// date. The session keeps two of them (current and compare).
use crate::types::ResultRecord;
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

/// Key of the optional completion timestamp inside a component payload
pub const FINISHED_AT_KEY: &str = "finished_at";

/// Files of one dataset, keyed by file name
pub type Dataset = BTreeMap<String, ResultRecord>;

/// All datasets of one component, plus payload metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComponentResults {
    pub datasets: BTreeMap<String, Dataset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<String>,
}

impl ComponentResults {
    /// Build from a component payload `{ dataset: { file: record }, "finished_at": "..." }`
    ///
    /// Entries that do not have the expected shape are skipped with a warning.
    pub fn from_payload(component: &str, payload: &serde_json::Value) -> Self {
        let mut results = ComponentResults::default();
        let Some(object) = payload.as_object() else {
            warn!("payload for component {} is not an object, ignoring it", component);
            return results;
        };

        for (key, value) in object {
            if key == FINISHED_AT_KEY {
                match value.as_str() {
                    Some(s) => results.finished_at = Some(s.to_string()),
                    None => warn!("{}: finished_at is not a string", component),
                }
                continue;
            }

            let Some(files) = value.as_object() else {
                warn!("{}: dataset {} is not an object, skipping", component, key);
                continue;
            };

            let dataset = results.datasets.entry(key.clone()).or_default();
            for (file_name, record) in files {
                match serde_json::from_value::<ResultRecord>(record.clone()) {
                    Ok(record) => {
                        dataset.insert(file_name.clone(), record);
                    }
                    Err(e) => warn!("{}/{}: skipping malformed record {}: {}", component, key, file_name, e),
                }
            }
        }

        results
    }

    /// Merge another payload of the same component; later records win
    pub fn merge(&mut self, other: ComponentResults) {
        for (name, files) in other.datasets {
            self.datasets.entry(name).or_default().extend(files);
        }
        if other.finished_at.is_some() {
            self.finished_at = other.finished_at;
        }
    }

    pub fn file_count(&self) -> usize {
        self.datasets.values().map(|d| d.len()).sum()
    }
}

/// component -> dataset -> file -> record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultStore {
    components: BTreeMap<String, ComponentResults>,
}

impl ResultStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// Insert a component, merging with any results already present for it
    pub fn insert_component(&mut self, name: &str, results: ComponentResults) {
        match self.components.get_mut(name) {
            Some(existing) => existing.merge(results),
            None => {
                self.components.insert(name.to_string(), results);
            }
        }
    }

    /// Insert a single record, creating the component and dataset as needed
    #[cfg(test)]
    pub fn insert(&mut self, component: &str, dataset: &str, file_name: &str, record: ResultRecord) {
        self.components
            .entry(component.to_string())
            .or_default()
            .datasets
            .entry(dataset.to_string())
            .or_default()
            .insert(file_name.to_string(), record);
    }

    pub fn component_names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn component(&self, name: &str) -> Option<&ComponentResults> {
        self.components.get(name)
    }

    pub fn components(&self) -> impl Iterator<Item = (&str, &ComponentResults)> {
        self.components.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn dataset(&self, component: &str, dataset: &str) -> Option<&Dataset> {
        self.components.get(component).and_then(|c| c.datasets.get(dataset))
    }

    pub fn get(&self, component: &str, dataset: &str, file_name: &str) -> Option<&ResultRecord> {
        self.dataset(component, dataset).and_then(|d| d.get(file_name))
    }

    /// First `finished_at` found among the components, in name order
    pub fn finished_at(&self) -> Option<&str> {
        self.components.values().find_map(|c| c.finished_at.as_deref())
    }
}
