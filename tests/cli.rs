use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn records_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

const TWO_MONTHS: &str = r#"[
    {"date": "2024-01-01", "revenue": 1000, "expense": 600},
    {"date": "2024-02-01", "revenue": 1500, "expense": 700}
]"#;

fn margin() -> Command {
    let mut cmd = Command::cargo_bin("margin").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn summarize_prints_totals() {
    let file = records_file(TWO_MONTHS);
    margin()
        .args(["summarize", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2500.00"))
        .stdout(predicate::str::contains("1200.00"))
        .stdout(predicate::str::contains("100.00%"));
}

#[test]
fn forecast_prints_one_row_per_period() {
    let file = records_file(TWO_MONTHS);
    margin()
        .args(["forecast", "--horizon", "2", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-03"))
        .stdout(predicate::str::contains("2000.00"))
        .stdout(predicate::str::contains("2024-04-03"));
}

#[test]
fn forecast_rejects_non_positive_horizon() {
    let file = records_file(TWO_MONTHS);
    margin()
        .args(["forecast", "--horizon", "0", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid forecast horizon"));
}

#[test]
fn insights_need_two_records() {
    let file = records_file(r#"[{"date": "2024-01-01", "revenue": 1, "expense": 1}]"#);
    margin()
        .args(["insights", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not enough data"));
}

#[test]
fn invalid_records_are_reported() {
    let file = records_file(r#"[{"date": "2024-13-01", "revenue": 1, "expense": 1}]"#);
    margin()
        .args(["summarize", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unparseable date"));
}

#[test]
fn explicit_config_file_sets_default_horizon() {
    let records = records_file(TWO_MONTHS);
    let mut config = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    config
        .write_all(b"[forecast]\ndefault_horizon = 1\n")
        .unwrap();

    margin()
        .arg("--config")
        .arg(config.path())
        .args(["forecast", "--input"])
        .arg(records.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-03"))
        .stdout(predicate::str::contains("2024-04-03").not());
}
