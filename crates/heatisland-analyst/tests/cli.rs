//! Runs the `heatisland` binary end to end.
//!
//! Each command runs from the system temp directory with a config path that
//! does not exist, so defaults apply and no `.env` from the workspace leaks in.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::process::{Command, Output};

const KEY_VARS: [&str; 6] = [
    "API_KEY",
    "GEMINI_API_KEY",
    "HEATISLAND_LLM_API_KEY",
    "HEATISLAND_LLM_BACKEND",
    "HEATISLAND_LLM_API_URL",
    "HEATISLAND_LLM_MODEL",
];

fn heatisland(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_heatisland"));
    cmd.current_dir(std::env::temp_dir())
        .args(["--config", "heatisland-cli-test-missing.yaml"])
        .args(args)
        .env("RUST_LOG", "warn");
    for var in KEY_VARS {
        cmd.env_remove(var);
    }
    cmd.output().expect("binary should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn roster_lists_world_cities() {
    let output = heatisland(&["roster", "--region", "world"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("nyc"));
    assert!(text.contains("london"));
    assert!(!text.contains("taipei"));
}

#[test]
fn seeded_csv_is_reproducible() {
    let args = ["series", "--scenario", "bau", "--seed", "3", "--format", "csv"];
    let first = heatisland(&args);
    let second = heatisland(&args);
    assert!(first.status.success());

    let text = stdout(&first);
    assert_eq!(text, stdout(&second));
    // header plus 1880..=2050
    assert_eq!(text.lines().count(), 172);
    assert!(text.lines().last().unwrap().starts_with("2050,"));
}

#[test]
fn series_json_defaults_to_historical() {
    let output = heatisland(&["series", "--seed", "1"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["scenario"], "HISTORICAL");
    assert_eq!(value["records"].as_array().unwrap().len(), 144);
}

#[test]
fn unknown_scenario_is_rejected() {
    let output = heatisland(&["series", "--scenario", "rcp85"]);
    assert!(!output.status.success());
}

#[test]
fn analyze_without_key_fails_with_one_message() {
    let output = heatisland(&["analyze", "--scenario", "optimistic", "--seed", "1"]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("API key is not configured"));
}
