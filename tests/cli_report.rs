use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

const EXPORT: &str = "\
Date,Station,Commodity,Wagons,Tonnage,Freight
2024-06-10,BSL,Coal,58,3850.5,1200000
2024-06-11,NGP,Coal,42,2700,900000
2024-06-11,AK,Cement,40,2500,800000
2024-06-11,,,40,,
2023-06-10,BSL,Coal,58,3000,1000000
2023-06-11,AK,Gypsum,30,400,150000
bad-date,AK,Coal,1,1,1
";

fn write_export(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("rakes.csv");
    fs::write(&path, EXPORT).expect("write export");
    path
}

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("rake-report"))
}

#[test]
fn window_on_monday_reports_previous_week() {
    bin()
        .args(["window", "--today", "2024-06-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-03 to 2024-06-09 (7 days)"))
        .stdout(predicate::str::contains("2023-06-03 to 2023-06-09 (7 days)"));
}

#[test]
fn window_midweek_reports_week_to_date() {
    bin()
        .args(["window", "--today", "2024-06-12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-10 to 2024-06-11 (2 days)"));
}

#[test]
fn window_rejects_impossible_date() {
    bin()
        .args(["window", "--today", "31/02/2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date: 31/02/2024"));
}

#[test]
fn load_prints_diagnostics() {
    let dir = tempdir().expect("tempdir");
    let csv = write_export(dir.path());
    bin()
        .arg("load")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("7 rows read, 6 loaded"))
        .stdout(predicate::str::contains("1 rows skipped"))
        .stdout(predicate::str::contains("Skipped lines: 8"));
}

#[test]
fn report_writes_tables_and_summary() {
    let dir = tempdir().expect("tempdir");
    let csv = write_export(dir.path());
    let out = dir.path().join("out");
    bin()
        .arg("report")
        .arg(&csv)
        .args(["--today", "2024-06-12"])
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Commodity-wise Loading Comparison"))
        .stdout(predicate::str::contains("Unknown"));

    for name in [
        "commodity_comparison.csv",
        "station_comparison.csv",
        "commodity_station_breakdown.csv",
        "summary.json",
    ] {
        assert!(out.join(name).exists(), "{name}");
    }

    let commodity = fs::read_to_string(out.join("commodity_comparison.csv")).expect("csv");
    let first = commodity.lines().next().expect("header");
    assert!(first.starts_with("Group,Rakes,RakesPerDay"));
    assert!(commodity.lines().last().expect("total").starts_with("Total,"));

    let summary: Value =
        serde_json::from_str(&fs::read_to_string(out.join("summary.json")).expect("json"))
            .expect("parse");
    assert_eq!(summary["records"]["current"], 4);
    assert_eq!(summary["records"]["previous"], 2);
    assert_eq!(summary["commodity"]["totals"]["current"]["tonnage"], 9050.5);
    assert_eq!(summary["commodity"]["totals"]["previous"]["tonnage"], 3400.0);
    assert_eq!(summary["commodity"]["totals"]["current"]["avgPerDay"], 2.0);
}

#[test]
fn report_json_format_prints_summary() {
    let dir = tempdir().expect("tempdir");
    let csv = write_export(dir.path());
    let output = bin()
        .arg("report")
        .arg(&csv)
        .args(["--from", "2024-06-11", "--to", "2024-06-11"])
        .args(["--format", "json"])
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(summary["window"]["current"]["days"], 1);
    assert_eq!(summary["window"]["previous"]["start"], "2023-06-11");
    assert_eq!(summary["records"]["current"], 3);
}

#[test]
fn explicit_comparison_window_replaces_year_prior() {
    let dir = tempdir().expect("tempdir");
    let csv = write_export(dir.path());
    let output = bin()
        .arg("report")
        .arg(&csv)
        .args(["--today", "2024-06-12"])
        .args(["--compare-from", "2023-06-10", "--compare-to", "2023-06-10"])
        .args(["--format", "json"])
        .arg("--output-dir")
        .arg(dir.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(summary["window"]["current"]["start"], "2024-06-10");
    assert_eq!(summary["window"]["previous"]["start"], "2023-06-10");
    assert_eq!(summary["window"]["previous"]["end"], "2023-06-10");
    assert_eq!(summary["window"]["previous"]["days"], 1);
    assert_eq!(summary["records"]["previous"], 1);
    assert_eq!(summary["commodity"]["totals"]["previous"]["tonnage"], 3000.0);
}

#[test]
fn rejects_reversed_comparison_range() {
    let dir = tempdir().expect("tempdir");
    let csv = write_export(dir.path());
    bin()
        .arg("report")
        .arg(&csv)
        .args(["--today", "2024-06-12"])
        .args(["--compare-from", "2023-06-11", "--compare-to", "2023-06-10"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn rejects_reversed_range() {
    let dir = tempdir().expect("tempdir");
    let csv = write_export(dir.path());
    bin()
        .arg("report")
        .arg(&csv)
        .args(["--from", "2024-06-12", "--to", "2024-06-10"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid range"));
}

#[test]
fn rejects_unsupported_share_precision() {
    let dir = tempdir().expect("tempdir");
    let csv = write_export(dir.path());
    bin()
        .arg("report")
        .arg(&csv)
        .args(["--share-places", "4"])
        .arg("--output-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("share places must be 1 or 2"));
}
