//! Test utilities for nbcrate-reconciler

use crate::{reconcile, ReconcileConfig, RunOptions, RunReport};
use chrono::NaiveDate;
use nbcrate_core::{load_document, EntityGraph};
use nbcrate_lookup::StaticSource;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPO_URL: &str = "https://github.com/example/trove-newspapers/";
pub const DATA_REPO_URL: &str = "https://github.com/example/trove-data/";

pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Options with a fixed repository URL and run date.
pub fn test_options() -> RunOptions {
    RunOptions {
        repo_url: Some(REPO_URL.to_string()),
        run_date: run_date(),
        ..RunOptions::default()
    }
}

/// Defaults, but without default authors.
pub fn config_without_authors() -> ReconcileConfig {
    ReconcileConfig {
        default_authors: Vec::new(),
        ..ReconcileConfig::default()
    }
}

/// Write a notebook carrying the given annotation block.
pub fn write_notebook(dir: &Path, name: &str, annotation: serde_json::Value) -> PathBuf {
    write_raw_notebook(dir, name, serde_json::json!({ "rocrate": annotation }))
}

/// Write a notebook with the given notebook-level metadata.
pub fn write_raw_notebook(dir: &Path, name: &str, metadata: serde_json::Value) -> PathBuf {
    let notebook = serde_json::json!({
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Harvest newspaper articles\n"]},
        ],
        "metadata": metadata,
        "nbformat": 4,
        "nbformat_minor": 5,
    });
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(&notebook).unwrap()).unwrap();
    path
}

/// Write a CSV with a header and `lines - 1` rows.
pub fn write_csv(path: &Path, lines: usize) {
    let mut text = String::from("id,title\n");
    for i in 1..lines {
        text.push_str(&format!("{i},article {i}\n"));
    }
    fs::write(path, text).unwrap();
}

pub async fn run(dir: &Path, config: &ReconcileConfig, options: &RunOptions, source: &StaticSource) -> RunReport {
    reconcile(dir, config, options, source).await.unwrap()
}

pub fn load(dir: &Path) -> EntityGraph {
    load_document(dir).unwrap().unwrap()
}
