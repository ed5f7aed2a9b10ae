//! Binary smoke tests: argument handling, config printing, publish dry runs.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn rollatron() -> Command {
    Command::cargo_bin("rollatron").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    rollatron()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_prints_effective_toml() {
    let dir = tempfile::tempdir().unwrap();
    rollatron()
        .current_dir(dir.path())
        .args(["--root", "/data/rolls", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[paths]"))
        .stdout(predicate::str::contains("root = \"/data/rolls\""))
        .stdout(predicate::str::contains("[publish]"))
        .stdout(predicate::str::contains("author_name = \"rollatron-bot\""));
}

#[test]
fn test_build_rejects_malformed_druid() {
    let dir = tempfile::tempdir().unwrap();
    rollatron()
        .current_dir(dir.path())
        .args(["--root", ".", "build", "not-a-druid"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-druid"));
}

#[test]
fn test_build_missing_roster_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    rollatron()
        .current_dir(dir.path())
        .args(["--root", ".", "build", "--druids-csv-file", "absent.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.csv"));
}

#[test]
fn test_build_with_empty_roster_succeeds_quietly() {
    let dir = tempfile::tempdir().unwrap();
    rollatron()
        .current_dir(dir.path())
        .args(["--root", ".", "build"])
        .assert()
        .success();
    assert!(!dir.path().join("output/catalog.json").exists());
}

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

#[test]
fn test_publish_dry_run_lists_pending_files() {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    std::fs::create_dir_all(dir.path().join("output")).unwrap();
    std::fs::write(dir.path().join("output/catalog.json"), "[]\n").unwrap();
    // Outside the allow list, must never show up
    std::fs::write(dir.path().join("notes.txt"), "scratch").unwrap();

    rollatron()
        .current_dir(dir.path())
        .args(["--root", ".", "publish", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would commit 1 file(s):"))
        .stdout(predicate::str::contains("output/catalog.json"))
        .stdout(predicate::str::contains("notes.txt").not());
}
