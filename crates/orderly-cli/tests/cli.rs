use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated (absent) default config file.
fn orderly(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("orderly").unwrap();
    cmd.env("ORDERLY_CONFIG", dir.path().join("config.json"));
    cmd
}

#[test]
fn test_parse_single_order_json() {
    let dir = TempDir::new().unwrap();

    orderly(&dir)
        .args([
            "parse",
            "STL 120 bags to Sri Lakshmi on 22/08 broker Mani — rate 1345",
            "--today",
            "2025-08-20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"[{"unit":"STL","bags":"120","rate":"1345","customer":"Sri Lakshmi","broker":"Mani","date":"2025-08-22"}]"#,
        ));
}

#[test]
fn test_parse_splits_units() {
    let dir = TempDir::new().unwrap();

    orderly(&dir)
        .args([
            "parse",
            "STL 50 bags to A broker M, SKS 30 bags to B broker N, rate 1200",
            "--today",
            "2025-08-20",
            "--format",
            "csv",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("unit,date,bags,broker,customer,rate,amount"))
        .stdout(predicate::str::contains("STL,,50,M,A,,"))
        .stdout(predicate::str::contains("SKS,,30,N,B,1200,36000"));
}

#[test]
fn test_parse_from_stdin_with_override() {
    let dir = TempDir::new().unwrap();

    orderly(&dir)
        .args(["parse", "--today", "2025-08-20", "--set", "broker=Arjun"])
        .write_stdin("SKS 200 bg to Kumar Friday\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""broker":"Arjun""#))
        .stdout(predicate::str::contains(r#""date":"2025-08-22""#));
}

#[test]
fn test_parse_single_flag_outputs_object() {
    let dir = TempDir::new().unwrap();

    orderly(&dir)
        .args(["parse", "", "--single", "--today", "2025-08-20"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{}"));
}

#[test]
fn test_parse_single_warnings_match_printed_order() {
    let dir = TempDir::new().unwrap();

    orderly(&dir)
        .args([
            "parse",
            "STL 10 bags to Ravi, SKS broker N",
            "--single",
            "--warnings",
            "--today",
            "2025-08-20",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("Order 1 (STL): could not resolve a date"))
        .stderr(predicate::str::contains("SKS").not());
}

#[test]
fn test_parse_rejects_bad_override() {
    let dir = TempDir::new().unwrap();

    orderly(&dir)
        .args(["parse", "STL 10 bags", "--set", "colour=red"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown order field"));
}

#[test]
fn test_parse_missing_file() {
    let dir = TempDir::new().unwrap();

    orderly(&dir)
        .args(["parse", "--file", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    let inbox = dir.path().join("inbox");
    let out = dir.path().join("out");
    fs::create_dir_all(&inbox).unwrap();
    fs::write(inbox.join("a.txt"), "STL 10 bags to Ravi today").unwrap();
    fs::write(inbox.join("b.txt"), "SKS 5 bags, DV 7 bags").unwrap();
    fs::write(inbox.join("ignored.md"), "STL 1 bag").unwrap();

    orderly(&dir)
        .args([
            "batch",
            &format!("{}/*", inbox.display()),
            "--output-dir",
            &out.display().to_string(),
            "--summary",
            "--today",
            "2025-08-20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"));

    let a = fs::read_to_string(out.join("a.json")).unwrap();
    assert!(a.contains(r#""date":"2025-08-20""#));

    let b = fs::read_to_string(out.join("b.json")).unwrap();
    assert!(b.contains(r#""unit":"DV""#));

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("b.txt,success,2,SKS DV,"));
}

#[test]
fn test_config_init_and_set() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("config.json");

    orderly(&dir).args(["config", "init"]).assert().success();
    assert!(config_path.exists());

    orderly(&dir)
        .args(["config", "set", "extraction.currency_symbols", r#"["Rs."]"#])
        .assert()
        .success();

    orderly(&dir)
        .args(["config", "get", "extraction.currency_symbols"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rs."));

    orderly(&dir)
        .args(["parse", "STL 10 bags @ Rs.1300/bag", "--today", "2025-08-20"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""rate":"1300""#));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();

    orderly(&dir).args(["config", "init"]).assert().success();
    orderly(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
