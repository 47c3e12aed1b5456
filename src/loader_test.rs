/// Tests for listing parsing and date loading
#[cfg(test)]
mod tests {
    use crate::aggregate::aggregate;
    use crate::loader::*;
    use crate::source::ResultSource;
    use std::fs;

    #[test]
    fn test_filename_extraction() {
        let name = "mesh_results_2024-01-01_run1.json";
        assert_eq!(component_from_filename(name), Some("mesh"));
        assert_eq!(date_from_filename(name), Some("2024-01-01"));
        assert_eq!(component_from_filename("Alpha_wrap_3_results_2025-03-04.json"), Some("Alpha_wrap_3"));
        assert_eq!(component_from_filename("dir/x_results_2024-01-01.json"), Some("x"));
        assert_eq!(component_from_filename("_results_2024-01-01.json"), None);
        assert_eq!(component_from_filename("results.json"), None);
        assert_eq!(date_from_filename("mesh_results_latest.json"), None);
    }

    #[test]
    fn test_is_result_file() {
        assert!(is_result_file("a_results_2024-01-01.json"));
        assert!(!is_result_file("a_results_2024-01-01.json.bak"));
        assert!(!is_result_file("a_2024-01-01.json"));
    }

    #[test]
    fn test_catalog_groups_by_date_newest_first() {
        let catalog = Catalog::from_listing([
            "../",
            "mesh_results_2024-01-01.json",
            "wrap_results_2024-01-01.json",
            "mesh_results_2024-02-10_run2.json",
            "mesh_results_2024-02-10_run1.json",
            "mesh_results_nodate.json",
            "index.html",
        ]);
        assert_eq!(catalog.dates(), vec!["2024-02-10", "2024-01-01"]);
        assert_eq!(catalog.latest(), Some("2024-02-10"));
        assert_eq!(
            catalog.files_for("2024-02-10"),
            &["mesh_results_2024-02-10_run1.json".to_string(), "mesh_results_2024-02-10_run2.json".to_string()]
        );
        assert_eq!(catalog.files_for("2024-01-01").len(), 2);
        assert!(catalog.files_for("1999-01-01").is_empty());
        assert!(!catalog.contains("1999-01-01"));
    }

    #[test]
    fn test_component_payload_unwrap() {
        let wrapped = serde_json::json!({ "mesh": { "D": {} } });
        assert!(component_payload("mesh", &wrapped).get("D").is_some());

        let bare = serde_json::json!({ "D": {} });
        assert!(component_payload("mesh", &bare).get("D").is_some());
    }

    #[test]
    fn test_load_date_skips_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("mesh_results_2024-01-01.json"),
            r#"{"mesh": {"finished_at": "2024-01-01 05:00", "D1": {"f1": {"Robustness": {"VALID_SOLID_OUTPUT": 1}}}}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("wrap_results_2024-01-01.json"),
            r#"{"D1": {"f1": {"Robustness": {"TIMEOUT": 1}}, "f2": {"Robustness": {"TIMEOUT": 1}}}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken_results_2024-01-01.json"), "{ not json").unwrap();

        let source = ResultSource::parse(dir.path().to_str().unwrap());
        let catalog = Catalog::fetch(&source);
        let outcome = load_date(&source, &catalog, "2024-01-01");

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "broken_results_2024-01-01.json");
        assert_eq!(outcome.loaded_files(3), 2);
        assert_eq!(outcome.store.component_names().collect::<Vec<_>>(), vec!["mesh", "wrap"]);
        assert_eq!(aggregate(&outcome.store, "mesh").valid, 1);
        assert_eq!(aggregate(&outcome.store, "wrap").timeout, 2);
        assert_eq!(outcome.store.finished_at(), Some("2024-01-01 05:00"));
    }

    #[test]
    fn test_load_date_merges_runs_of_same_component() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("mesh_results_2024-01-01_run1.json"),
            r#"{"D1": {"f1": {"Robustness": {"TIMEOUT": 1}}}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("mesh_results_2024-01-01_run2.json"),
            r#"{"D1": {"f1": {"Robustness": {"VALID_SOLID_OUTPUT": 1}}, "f2": {}}}"#,
        )
        .unwrap();

        let source = ResultSource::parse(dir.path().to_str().unwrap());
        let catalog = Catalog::fetch(&source);
        let outcome = load_date(&source, &catalog, "2024-01-01");
        let counts = aggregate(&outcome.store, "mesh");
        assert_eq!(counts.valid, 1, "later run wins for f1");
        assert_eq!(counts.timeout, 0);
        assert_eq!(outcome.store.component("mesh").unwrap().file_count(), 2);
    }

    #[test]
    fn test_missing_directory_means_no_dates() {
        let source = ResultSource::parse("/definitely/not/here/bench-viewer");
        let catalog = Catalog::fetch(&source);
        assert!(catalog.is_empty());
        let outcome = load_date(&source, &catalog, "2024-01-01");
        assert!(outcome.store.is_empty());
        assert!(outcome.failures.is_empty());
    }
}
