/// Tests for the aggregator
#[cfg(test)]
mod tests {
    use crate::aggregate::*;
    use crate::store::ResultStore;
    use crate::test_util::*;
    use crate::types::*;

    #[test]
    fn test_aggregate_counts_per_bucket() {
        let store = store_of(&[
            ("mesh", "D1", "a", &[VALID_SOLID_OUTPUT]),
            ("mesh", "D1", "b", &[TIMEOUT]),
            ("mesh", "D2", "c", &[INPUT_IS_INVALID]),
            ("mesh", "D2", "d", &[OUTPUT_DISTANCE_IS_TOO_LARGE]),
            ("mesh", "D2", "e", &[]),
            ("other", "D1", "a", &[VALID_SOLID_OUTPUT]),
        ]);
        let counts = aggregate(&store, "mesh");
        assert_eq!(counts, ClassCounts { valid: 1, error: 2, timeout: 1 });
    }

    #[test]
    fn test_aggregate_multi_class_counts_once_per_bucket() {
        let store = store_of(&[("mesh", "D1", "a", &[VALID_SOLID_OUTPUT, TIMEOUT])]);
        let counts = aggregate(&store, "mesh");
        assert_eq!(counts.valid, 1);
        assert_eq!(counts.timeout, 1);
        assert_eq!(counts.error, 0);
    }

    #[test]
    fn test_aggregate_unknown_component_is_zero() {
        let store = store_of(&[("mesh", "D1", "a", &[VALID_SOLID_OUTPUT])]);
        assert_eq!(aggregate(&store, "nope"), ClassCounts::default());
    }

    #[test]
    fn test_aggregate_valid_bounded_and_monotonic() {
        let mut store = store_of(&[("mesh", "D1", "a", &[VALID_SOLID_OUTPUT]), ("mesh", "D1", "b", &[TIMEOUT])]);
        let before = aggregate(&store, "mesh").valid;
        assert!(before <= store.component("mesh").unwrap().file_count());

        store.insert("mesh", "D2", "c", record_with(&[VALID_SOLID_OUTPUT]));
        let after = aggregate(&store, "mesh").valid;
        assert_eq!(after, before + 1);
        assert!(after <= store.component("mesh").unwrap().file_count());
    }

    #[test]
    fn test_aggregate_diff_against_empty_compare() {
        let current = store_of(&[("A", "D1", "f1", &[VALID_SOLID_OUTPUT])]);
        let compare = ResultStore::new();
        let diff = aggregate_diff(&current, &compare, "A");
        assert_eq!(diff.valid, AddRemove { added: 1, removed: 0 });
        assert_eq!(diff.error, AddRemove::default());
        assert_eq!(diff.timeout, AddRemove::default());
    }

    #[test]
    fn test_aggregate_diff_class_change() {
        let current = store_of(&[("A", "D1", "f1", &[TIMEOUT]), ("A", "D1", "f2", &[VALID_SOLID_OUTPUT])]);
        let compare = store_of(&[("A", "D1", "f1", &[VALID_SOLID_OUTPUT]), ("A", "D1", "f2", &[VALID_SOLID_OUTPUT])]);
        let diff = aggregate_diff(&current, &compare, "A");
        assert_eq!(diff.valid, AddRemove { added: 0, removed: 1 });
        assert_eq!(diff.timeout, AddRemove { added: 1, removed: 0 });
        assert_eq!(diff.valid.diff(), -1);
        assert_eq!(diff.trend(Classification::Valid), Trend::Worse);
        assert_eq!(diff.trend(Classification::Timeout), Trend::Worse);
        assert!(diff.is_regression());
    }

    #[test]
    fn test_aggregate_diff_removed_file() {
        let current = store_of(&[("A", "D1", "f1", &[TIMEOUT])]);
        let compare = store_of(&[("A", "D1", "f1", &[TIMEOUT]), ("A", "D2", "gone", &[INPUT_IS_INVALID])]);
        let diff = aggregate_diff(&current, &compare, "A");
        assert_eq!(diff.error, AddRemove { added: 0, removed: 1 });
        assert_eq!(diff.timeout, AddRemove::default());
        assert_eq!(diff.trend(Classification::Error), Trend::Better);
        assert!(!diff.is_regression());
    }

    #[test]
    fn test_aggregate_diff_unclassified_counterpart_counts() {
        let current = store_of(&[("A", "D1", "f1", &[])]);
        let compare = store_of(&[("A", "D1", "f1", &[VALID_SOLID_OUTPUT])]);
        let diff = aggregate_diff(&current, &compare, "A");
        assert_eq!(diff.valid.removed, 1);
    }

    #[test]
    fn test_aggregate_diff_identical_stores() {
        let store = store_of(&[("A", "D1", "f1", &[TIMEOUT]), ("A", "D1", "f2", &[VALID_SOLID_OUTPUT])]);
        let diff = aggregate_diff(&store, &store, "A");
        assert_eq!(diff, AggregateDiff::default());
        for class in Classification::ALL {
            assert_eq!(diff.trend(class), Trend::Same);
        }
    }

    #[test]
    fn test_totals_distinct_names() {
        let mut store = store_of(&[
            ("A", "D1", "f1", &[]),
            ("A", "D2", "f2", &[]),
            ("B", "D1", "f1", &[]),
        ]);
        let mut nested = record_with(&[]);
        nested.path = Some("sub/".to_string());
        store.insert("B", "D3", "f1", nested);

        let totals = totals(&store);
        assert_eq!(totals.datasets, 3);
        // "f1", "f2", "sub/f1"
        assert_eq!(totals.files, 3);
    }

    #[test]
    fn test_dataset_counts() {
        let store = store_of(&[("A", "D1", "f1", &[TIMEOUT]), ("A", "D1", "f2", &[TIMEOUT, INPUT_IS_INVALID])]);
        let counts = dataset_counts(store.dataset("A", "D1").unwrap());
        assert_eq!(counts, ClassCounts { valid: 0, error: 1, timeout: 2 });
    }
}
