/// Shared builders for unit tests
use crate::store::ResultStore;
use crate::types::{ResultRecord, Robustness};

/// Record whose robustness block sets each of `flags` to 1
pub fn record_with(flags: &[&str]) -> ResultRecord {
    ResultRecord {
        robustness: Some(Robustness(flags.iter().map(|f| (f.to_string(), serde_json::json!(1))).collect())),
        ..Default::default()
    }
}

/// Store built from (component, dataset, file, flags) rows
pub fn store_of(rows: &[(&str, &str, &str, &[&str])]) -> ResultStore {
    let mut store = ResultStore::new();
    for (component, dataset, file, flags) in rows {
        store.insert(component, dataset, file, record_with(flags));
    }
    store
}
