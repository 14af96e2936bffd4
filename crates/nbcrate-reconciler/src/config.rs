//! Repository configuration and per-run options

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use nbcrate_notebook::{AuthorRecord, DEFAULT_EXCLUDES};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional configuration file in the repository root.
pub const CONFIG_FILE: &str = "nbcrate.toml";

/// The collection a repository's documentation lives in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Workbench {
    pub name: String,
    pub url: String,
    pub description: String,
}

impl Default for Workbench {
    fn default() -> Self {
        Self {
            name: "GLAM Workbench".to_string(),
            url: "https://glam-workbench.net/".to_string(),
            description: "A collection of tools, tutorials, examples, and hacks to help you work with the data provided by galleries, libraries, archives, and museums (the GLAM sector).".to_string(),
        }
    }
}

/// Settings read from `nbcrate.toml`. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Authors of the repository itself, and of notebooks seeded by `annotate`.
    pub default_authors: Vec<AuthorRecord>,
    pub workbench: Workbench,
    /// Notebook file name patterns to skip.
    pub exclude: Vec<String>,
    /// Directories (relative to the repository) holding local data files.
    pub data_paths: Vec<PathBuf>,
    /// README footer line, in Markdown.
    pub credit: Option<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        let mut author = AuthorRecord::new("Sherratt, Tim").with_orcid("https://orcid.org/0000-0001-7956-4498");
        author.extra.insert(
            "mainEntityOfPage".to_string(),
            serde_json::Value::String("https://timsherratt.au".to_string()),
        );
        Self {
            default_authors: vec![author],
            workbench: Workbench::default(),
            exclude: DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect(),
            data_paths: vec![PathBuf::from(".")],
            credit: Some(
                "Created by [Tim Sherratt](https://timsherratt.au) for the [GLAM Workbench](https://glam-workbench.net/)."
                    .to_string(),
            ),
        }
    }
}

impl ReconcileConfig {
    /// Load `nbcrate.toml` from `root`, or the defaults when it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Options for a single `update` run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// New version label; bumps the version and records an UpdateAction.
    pub version: Option<String>,
    /// Sibling data repository URL; switches to data-repository mode.
    pub data_repo: Option<String>,
    /// Code repository URL. Read from the git remote when unset.
    pub repo_url: Option<String>,
    /// Skip all network lookups.
    pub offline: bool,
    /// Date recorded for this run.
    pub run_date: NaiveDate,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            version: None,
            data_repo: None,
            repo_url: None,
            offline: false,
            run_date: Local::now().date_naive(),
        }
    }
}
