//! Runs the `fadefinder` binary end to end.

use std::process::Command;

fn fadefinder() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fadefinder"))
}

#[test]
fn synth_then_inspect_then_query() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("gaps.csv");
    let export = dir.path().join("outcomes.csv");

    let status = fadefinder()
        .args(["synth", "--count", "2000", "--seed", "4", "--out"])
        .arg(&data)
        .status()
        .unwrap();
    assert!(status.success());

    let out = fadefinder().args(["inspect", "--data"]).arg(&data).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("Rows:         2000"));

    let out = fadefinder()
        .args(["query", "--data"])
        .arg(&data)
        .arg("--export")
        .arg(&export)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("Backtest (Short)"));
    assert!(text.contains("Basic statistics"));
    assert!(export.exists());
}

#[test]
fn json_output_is_parseable() {
    let out = fadefinder()
        .args(["query", "--synthetic", "3000", "--json", "--direction", "long"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["backtest"]["direction"], "long");
    assert_eq!(value["backtest"]["per_stop"].as_array().unwrap().len(), 5);
}

#[test]
fn no_matching_rows_exits_non_zero() {
    let out = fadefinder()
        .args(["query", "--synthetic", "100", "--gap", "5000", "6000"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no rows match"));
}

#[test]
fn malformed_date_exits_non_zero() {
    let out = fadefinder()
        .args(["query", "--synthetic", "100", "--end", "July 1st"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid date"));
}
