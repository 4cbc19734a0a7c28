//! End-to-end: write a dataset to disk, load it back, query it.

use std::fs;

use fadefinder_core::data::{write_csv, write_parquet};
use fadefinder_core::export::write_outcomes_csv;
use fadefinder_core::{
    load_dataset, run_query, synthetic, CoreError, Dataset, FadeFinderConfig, LoadError,
    LoadOptions, QueryParams,
};

#[test]
fn csv_and_parquet_exports_load_to_the_same_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let events = synthetic::generate(400, 2023);
    let opts = LoadOptions::default();

    let csv_path = dir.path().join("gaps.csv");
    let pq_path = dir.path().join("gaps.parquet");
    write_csv(&csv_path, &events, &opts).unwrap();
    write_parquet(&pq_path, &events, &opts).unwrap();

    let from_csv = load_dataset(&csv_path, &opts).unwrap();
    let from_pq = load_dataset(&pq_path, &opts).unwrap();
    let direct = Dataset::new(events).unwrap();

    assert_eq!(from_csv.len(), 400);
    assert_eq!(from_csv.fingerprint(), direct.fingerprint());
    assert_eq!(from_pq.fingerprint(), direct.fingerprint());
}

#[test]
fn loaded_dataset_answers_queries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaps.csv");
    write_csv(&path, &synthetic::generate(2_000, 5), &LoadOptions::default()).unwrap();

    let dataset = load_dataset(&path, &LoadOptions::default()).unwrap();
    let outcome = run_query(&dataset, &QueryParams::default()).unwrap();

    assert!(!outcome.rows.is_empty());
    assert_eq!(outcome.stats.setups, outcome.rows.len());
    assert!(outcome.stats.red_closes + outcome.stats.green_closes <= outcome.stats.setups);

    let export = dir.path().join("outcomes.csv");
    write_outcomes_csv(&export, &outcome).unwrap();
    let mut reader = csv::Reader::from_path(&export).unwrap();
    assert_eq!(reader.records().count(), outcome.rows.len());
}

#[test]
fn config_file_drives_the_query() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("gaps.csv");
    write_csv(&data_path, &synthetic::generate(1_000, 9), &LoadOptions::default()).unwrap();

    let config_path = dir.path().join("fadefinder.toml");
    fs::write(
        &config_path,
        format!(
            "[data]\npath = {:?}\n\n[filter]\ngap_size = {{ min = 0.0, max = 1000.0 }}\npre_volume = {{ min = 0.0, max = 100.0 }}\nopen_price = {{ min = 0.0, max = 100.0 }}\nmarket_cap = {{ min = 0.0, max = 1000.0 }}\nopen_pre_high = {{ min = 0.0, max = 1.0 }}\n",
            data_path.display().to_string()
        ),
    )
    .unwrap();

    let config = FadeFinderConfig::from_file(&config_path).unwrap();
    let dataset = load_dataset(
        config.data.path.as_deref().unwrap(),
        &config.data.load,
    )
    .unwrap();
    let params = config.to_query_params().unwrap();
    let outcome = run_query(&dataset, &params).unwrap();

    // Wide-open ranges keep every row inside the default date window.
    let in_window = dataset
        .events()
        .iter()
        .filter(|e| params.criteria.dates.contains(e.date))
        .count();
    assert_eq!(outcome.rows.len(), in_window);
}

#[test]
fn impossible_filter_is_empty_result_set() {
    let dataset = Dataset::new(synthetic::generate(200, 1)).unwrap();
    let mut params = QueryParams::default();
    params.criteria.market_cap.min = 10_000.0;
    assert_eq!(
        run_query(&dataset, &params).unwrap_err(),
        CoreError::EmptyResultSet
    );
}

#[test]
fn unscaled_csv_requires_matching_options() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("millions.csv");
    let events = synthetic::generate(50, 77);
    let raw = LoadOptions {
        scale_to_millions: false,
        ..LoadOptions::default()
    };
    write_csv(&path, &events, &raw).unwrap();

    let loaded = load_dataset(&path, &raw).unwrap();
    assert_eq!(loaded.events(), events.as_slice());
}

#[test]
fn corrupt_parquet_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.parquet");
    fs::write(&path, b"not a parquet file").unwrap();
    assert!(matches!(
        load_dataset(&path, &LoadOptions::default()),
        Err(LoadError::Parquet(_))
    ));
}
