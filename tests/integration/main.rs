//! Integration tests for nbcrate
//!
//! These tests drive the CLI and the library crates together over a
//! temporary repository.

use nbcrate_core::{load_document, metadata_path, Value};
use nbcrate_lookup::StaticSource;
use nbcrate_reconciler::{reconcile, ReconcileConfig, RunOptions};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const REPO_URL: &str = "https://github.com/example/trove-newspapers";

fn nbcrate(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nbcrate"))
        .arg("--root")
        .arg(root)
        .args(args)
        .env_remove("GITHUB_TOKEN")
        .output()
        .expect("Failed to execute nbcrate")
}

fn write_repository(dir: &Path) {
    let notebook = serde_json::json!({
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Harvest newspaper articles\n", "\n", "Saves results as CSV."]},
            {"cell_type": "code", "execution_count": null, "metadata": {}, "outputs": [], "source": ["print('harvest')"]},
        ],
        "metadata": {"kernelspec": {"display_name": "Python 3", "language": "python", "name": "python3"}},
        "nbformat": 4,
        "nbformat_minor": 5,
    });
    fs::write(dir.join("harvest.ipynb"), serde_json::to_string_pretty(&notebook).unwrap()).unwrap();
    fs::write(dir.join("Untitled.ipynb"), "{}").unwrap();

    let mut csv = String::from("id,title\n");
    for i in 1..=20 {
        csv.push_str(&format!("{i},article {i}\n"));
    }
    fs::write(dir.join("articles.csv"), csv).unwrap();
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_nbcrate"))
        .arg("--help")
        .output()
        .expect("Failed to execute nbcrate");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("nbcrate"));
    for command in ["update", "readme", "annotate", "version"] {
        assert!(stdout.contains(command), "missing {command}");
    }
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = nbcrate(dir.path(), &["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("nbcrate v{}", env!("CARGO_PKG_VERSION"))
    );
}

/// Annotate, update twice, then render the README, all through the CLI
#[test]
fn test_cli_workflow() {
    let dir = TempDir::new().unwrap();
    write_repository(dir.path());

    let output = nbcrate(dir.path(), &["annotate"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let annotated: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("harvest.ipynb")).unwrap()).unwrap();
    assert_eq!(annotated["metadata"]["rocrate"]["name"], "Harvest newspaper articles");
    assert_eq!(annotated["metadata"]["kernelspec"]["name"], "python3");
    // Excluded by the default patterns
    assert_eq!(fs::read_to_string(dir.path().join("Untitled.ipynb")).unwrap(), "{}");

    let update = ["update", "--offline", "--repo-url", REPO_URL, "--version", "1.0.0"];
    let output = nbcrate(dir.path(), &update);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let first = fs::read_to_string(metadata_path(dir.path())).unwrap();

    let output = nbcrate(dir.path(), &update);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(metadata_path(dir.path())).unwrap(), first);

    let graph = load_document(dir.path()).unwrap().unwrap();
    let root = graph.root().unwrap();
    assert_eq!(root.text("name"), Some("trove-newspapers"));
    assert_eq!(root.text("version"), Some("1.0.0"));
    assert!(graph.contains("create_version_1_0_0"));
    assert!(graph.get("harvest.ipynb").unwrap().has_type("SoftwareSourceCode"));

    let output = nbcrate(dir.path(), &["readme"]);
    assert!(output.status.success());
    let readme = fs::read_to_string(dir.path().join("README.md")).unwrap();
    assert!(readme.starts_with("# trove-newspapers\n\nCURRENT VERSION: 1.0.0\n"));
    assert!(readme.contains("[Harvest newspaper articles]"));
}

#[test]
fn test_update_without_repository_url_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let output = nbcrate(dir.path(), &["update", "--offline"]);
    assert!(!output.status.success());
    assert!(!metadata_path(dir.path()).exists());
}

/// Library-level run declaring a result, as a notebook author would
#[tokio::test]
async fn test_declared_results_are_described() {
    let dir = TempDir::new().unwrap();
    write_repository(dir.path());
    let mut notebook: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("harvest.ipynb")).unwrap()).unwrap();
    notebook["metadata"]["rocrate"] = serde_json::json!({
        "name": "Harvest newspaper articles",
        "author": [{"name": "Doe, Jane"}],
        "action": [{"result": [{"url": "articles.csv", "name": "Harvested articles"}]}],
    });
    fs::write(dir.path().join("harvest.ipynb"), notebook.to_string()).unwrap();

    let config = ReconcileConfig::default();
    let options = RunOptions {
        repo_url: Some(REPO_URL.to_string()),
        run_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        ..RunOptions::default()
    };
    let report = reconcile(dir.path(), &config, &options, &StaticSource::new()).await.unwrap();
    assert_eq!(report.notebooks, 1);

    let graph = load_document(dir.path()).unwrap().unwrap();
    let articles = graph.get("articles.csv").unwrap();
    assert_eq!(articles.text("name"), Some("Harvested articles"));
    assert_eq!(articles.get("size"), Some(&Value::from(20u64)));
    assert_eq!(graph.get("harvest_run_0").unwrap().references("result"), vec!["articles.csv"]);

    // The root keeps its default author alongside the notebook's own
    let people = graph.ids_of_type("Person");
    assert!(people.contains(&"https://orcid.org/0000-0001-7956-4498".to_string()));
    assert!(people.contains(&"#Doe_Jane".to_string()));
}
