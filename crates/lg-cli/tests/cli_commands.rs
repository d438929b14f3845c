#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn littleguy() -> Command {
    Command::cargo_bin("littleguy").unwrap()
}

/// Write a config file into a fresh temp directory.
fn config_file(json: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("littleguy.json");
    fs::write(&path, json).unwrap();
    (dir, path)
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_reports_default_scene() {
    littleguy()
        .args(["simulate", "--ticks", "120"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Simulation")
                .and(predicate::str::contains("3 entities"))
                .and(predicate::str::contains("Entity Status"))
                .and(predicate::str::contains("actor"))
                .and(predicate::str::contains("ball"))
                .and(predicate::str::contains("bed")),
        );
}

#[test]
fn simulate_verbose_shows_event_log() {
    littleguy()
        .args(["simulate", "--ticks", "60", "--verbose"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Event Log")
                .and(predicate::str::contains("[tick"))
                .and(predicate::str::contains("spawned")),
        );
}

#[test]
fn simulate_summary_counts_events() {
    littleguy()
        .args(["simulate", "--ticks", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Event Summary").and(predicate::str::contains("spawned")));
}

#[test]
fn simulate_is_deterministic_for_a_seed() {
    let run = || {
        littleguy()
            .args(["simulate", "--ticks", "900", "--seed", "1234", "--verbose"])
            .env("NO_COLOR", "1")
            .output()
            .unwrap()
    };
    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn simulate_zero_ticks_still_reports() {
    littleguy()
        .args(["simulate", "--ticks", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0s simulated"));
}

#[test]
fn simulate_reads_config_file() {
    let (_dir, path) = config_file(r#"{ "seed": 5, "actor": { "walk_speed": 80.0 } }"#);
    littleguy()
        .args(["simulate", "--ticks", "60", "-c", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed=5"));
}

#[test]
fn simulate_seed_flag_overrides_config() {
    let (_dir, path) = config_file(r#"{ "seed": 5 }"#);
    littleguy()
        .args([
            "simulate",
            "--ticks",
            "10",
            "--seed",
            "99",
            "-c",
            path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed=99"));
}

#[test]
fn simulate_rejects_malformed_config() {
    let (_dir, path) = config_file("{ not json");
    littleguy()
        .args(["simulate", "-c", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn simulate_rejects_out_of_range_config() {
    let (_dir, path) = config_file(r#"{ "actor": { "throw_probability": 2.0 } }"#);
    littleguy()
        .args(["simulate", "-c", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("throw_probability"));
}

#[test]
fn simulate_fails_on_missing_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.json");
    littleguy()
        .args(["simulate", "-c", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_default_json() {
    let output = littleguy().arg("config").output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["seed"], 42);
    assert_eq!(json["actor"]["walk_speed"], 50.0);
    assert!(json["physics"].is_object());
}

#[test]
fn config_writes_file_that_simulate_accepts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("defaults.json");

    littleguy()
        .args(["config", "-o", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));
    assert!(path.exists());

    littleguy()
        .args(["simulate", "--ticks", "10", "-c", path.to_str().unwrap()])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// misc
// ---------------------------------------------------------------------------

#[test]
fn help_lists_subcommands() {
    littleguy()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate").and(predicate::str::contains("config")));
}

#[test]
fn unknown_subcommand_fails() {
    littleguy().arg("frobnicate").assert().failure();
}
