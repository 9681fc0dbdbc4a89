//! Tests for CLI argument parsing and end-to-end runs of the binary

use assert_cmd::Command;
use clap::Parser;
use predicates::prelude::*;
use puckline::cli::{Cli, SplitWeights};
use puckline::pipeline::{HandleInvalid, ImputeStrategy, DEFAULT_VIEW_NAME};
use std::path::PathBuf;

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["puckline", "-i", "players.csv"]);

    assert_eq!(cli.null_token, "NA");
    assert!(!cli.apply_row_filter, "Row filter should be off by default");
    assert_eq!(cli.split_weights, SplitWeights(vec![0.7, 0.3]));
    assert_eq!(cli.seed, None);
    assert_eq!(cli.impute_strategy, ImputeStrategy::Mean);
    assert_eq!(cli.missing_value, 0.0);
    assert_eq!(cli.handle_invalid, HandleInvalid::Error);
    assert_eq!(cli.reg_param, 0.0);
    assert!(!cli.exclude_label);
    assert_eq!(cli.view_name, DEFAULT_VIEW_NAME);
    assert!(!cli.persist);
    assert!(!cli.no_confirm);
}

#[test]
fn test_cli_custom_values() {
    let cli = Cli::parse_from([
        "puckline",
        "-i",
        "players.csv",
        "--apply-row-filter",
        "--split-weights",
        "0.8,0.2",
        "--seed",
        "42",
        "--impute-strategy",
        "median",
        "--missing-value",
        "-1",
        "--handle-invalid",
        "skip",
        "--reg-param",
        "0.5",
        "--exclude-label",
    ]);

    assert!(cli.apply_row_filter);
    assert_eq!(cli.split_weights, SplitWeights(vec![0.8, 0.2]));
    assert_eq!(cli.seed, Some(42));

    let config = cli.feature_config();
    assert_eq!(config.impute_strategy, ImputeStrategy::Median);
    assert_eq!(config.missing_value, -1.0);
    assert_eq!(config.handle_invalid, HandleInvalid::Skip);
    assert_eq!(config.reg_param, 0.5);
    assert!(config.exclude_label);
    assert!(cli.clean_options().apply_row_filter);
}

#[test]
fn test_cli_rejects_bad_weights_and_params() {
    assert!(Cli::try_parse_from(["puckline", "-i", "a.csv", "--split-weights", "1.0"]).is_err());
    assert!(Cli::try_parse_from(["puckline", "-i", "a.csv", "--reg-param", "-0.1"]).is_err());
    assert!(Cli::try_parse_from(["puckline", "-i", "a.csv", "--impute-strategy", "max"]).is_err());
    assert!(Cli::try_parse_from(["puckline"]).is_err(), "Input is required");
}

#[test]
fn test_cli_warehouse_derivation() {
    let cli = Cli::parse_from(["puckline", "-i", "/path/to/players.csv"]);
    assert_eq!(cli.warehouse_dir(), PathBuf::from("/path/to/warehouse"));

    let cli = Cli::parse_from(["puckline", "-i", "players.csv"]);
    assert_eq!(cli.warehouse_dir(), PathBuf::from("./warehouse"));

    let cli = Cli::parse_from(["puckline", "-i", "players.csv", "--warehouse", "/tmp/wh"]);
    assert_eq!(cli.warehouse_dir(), PathBuf::from("/tmp/wh"));
}

#[test]
fn test_cli_load_options_use_null_token() {
    let cli = Cli::parse_from(["puckline", "-i", "players.csv", "--null-token", "?"]);

    assert_eq!(cli.load_options().null_token, "?");
}

#[test]
fn test_binary_full_run() {
    let (dir, path) = common::generated_player_csv(150, 17);
    let model_path = dir.path().join("model.json");
    let predictions_path = dir.path().join("predictions.csv");

    Command::cargo_bin("puckline")
        .unwrap()
        .arg("-i")
        .arg(&path)
        .args(["--seed", "42", "--no-confirm", "--persist"])
        .args(["--query", "SELECT Salary, GP FROM train__reduced__csv WHERE GP > 40"])
        .arg("--model-output")
        .arg(&model_path)
        .arg("--predictions")
        .arg(&predictions_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("RUN SUMMARY"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&model_path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["seed"], 42);
    assert_eq!(json["metadata"]["view_name"], DEFAULT_VIEW_NAME);
    assert_eq!(json["regression"]["coefficients"].as_array().unwrap().len(), 12);
    assert!(json["imputer"]["surrogates"]["DftRd"].is_number());

    assert!(predictions_path.is_file());
    assert!(dir
        .path()
        .join("warehouse")
        .join(format!("{}.parquet", DEFAULT_VIEW_NAME))
        .is_file());
}

#[test]
fn test_binary_missing_input_fails() {
    let dir = tempfile::TempDir::new().unwrap();

    Command::cargo_bin("puckline")
        .unwrap()
        .arg("-i")
        .arg(dir.path().join("absent.csv"))
        .arg("--no-confirm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load"));
}

#[test]
fn test_binary_reports_fit_failure() {
    // Five rows with nulls cannot support a twelve-feature fit
    let (_dir, path) = common::small_player_csv();

    Command::cargo_bin("puckline")
        .unwrap()
        .arg("-i")
        .arg(&path)
        .args(["--seed", "1", "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fit"));
}

#[test]
fn test_binary_reports_removed_rows() {
    let (_dir, path) = common::small_player_csv();

    // Three of the five rows hold a null; the two left cannot support the fit
    Command::cargo_bin("puckline")
        .unwrap()
        .arg("-i")
        .arg(&path)
        .args(["--apply-row-filter", "--seed", "1", "--no-confirm"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Removed 3 row(s) with nulls"));
}
