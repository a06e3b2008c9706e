use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

const LOG: &str = "\
Person,Date,Time,Number of Guesses,Correct Letters Guess 1,Correct Letters Guess 2,Correct Letters Guess 3,Correct Letters Guess 4,Correct Letters Guess 5,Correct Letters Guess 6
Alice,13/01/2022,00:10:00,3,1,3,5,,,
Bob,13/01/2022,00:05:00,4,0,2,4,5,,
Alice,14/01/2022,00:08:00,2,2,5,,,,
";

fn write_log(dir: &Path) -> PathBuf {
    let path = dir.join("log.csv");
    fs::write(&path, LOG).unwrap();
    path
}

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("wordleplot").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn report_writes_a_document() {
    let dir = tempdir().unwrap();
    let input = write_log(dir.path());
    let out = dir.path().join("report.svg");
    let mut cmd = Command::cargo_bin("wordleplot").unwrap();
    cmd.args(["report", "--today", "2022-01-20", "--width", "800", "--input"])
        .arg(&input)
        .arg("--out")
        .arg(&out);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("report.svg"));
    assert!(fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn report_with_bad_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "Person,Date\nAlice,13/01/2022\n").unwrap();
    let out = dir.path().join("report.svg");
    let mut cmd = Command::cargo_bin("wordleplot").unwrap();
    cmd.arg("report").arg("--input").arg(&input).arg("--out").arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing required columns"));
    assert!(!out.exists());
}

#[test]
fn stats_prints_the_error_table() {
    let dir = tempdir().unwrap();
    let input = write_log(dir.path());
    let mut cmd = Command::cargo_bin("wordleplot").unwrap();
    cmd.arg("stats").arg("--input").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("std_time"))
        .stdout(predicate::str::contains("2022-01-13"))
        .stdout(predicate::str::contains("0:02:30"))
        .stdout(predicate::str::contains("3.50"));
}

#[test]
fn stats_saves_json_for_one_person() {
    let dir = tempdir().unwrap();
    let input = write_log(dir.path());
    let out = dir.path().join("alice.json");
    let mut cmd = Command::cargo_bin("wordleplot").unwrap();
    cmd.args(["stats", "--person", "Alice", "--input"])
        .arg(&input)
        .arg("--out")
        .arg(&out);
    cmd.assert().success();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
}

#[test]
fn names_lists_persons_in_order() {
    let dir = tempdir().unwrap();
    let input = write_log(dir.path());
    let mut cmd = Command::cargo_bin("wordleplot").unwrap();
    cmd.arg("names").arg("--input").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("Alice\nBob\n"));
}
