//! Live source: local filesystem first, then GitHub or plain HTTP

use super::github::{parse_repo, GitHubClient, GitHubPath};
use super::web;
use crate::local::{local_path, local_stats};
use crate::source::{FileStats, MetadataSource};
use anyhow::{Context, Result};
use nbcrate_core::ids::is_url;
use std::path::Path;

pub struct LiveSource {
    client: reqwest::Client,
    github: GitHubClient,
}

impl LiveSource {
    /// Create a live source. Without a token GitHub is queried anonymously.
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nbcrate/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        if token.is_none() {
            tracing::debug!("No GitHub token set, using anonymous API calls");
        }
        Ok(Self {
            github: GitHubClient::new(client.clone(), token),
            client,
        })
    }

    async fn github_stats(&self, file: &GitHubPath) -> FileStats {
        let date = match self.github.last_commit_date(file).await {
            Ok(date) => date,
            Err(e) => {
                tracing::warn!("Could not get commit date for {}: {:#}", file.path, e);
                None
            }
        };
        let size = match self.github.blob_size(file).await {
            Ok(size) => Some(size),
            Err(e) => {
                tracing::warn!("Could not get size of {}: {:#}", file.path, e);
                None
            }
        };
        FileStats {
            date,
            size,
            count: None,
        }
    }
}

#[async_trait::async_trait]
impl MetadataSource for LiveSource {
    async fn file_stats(&self, reference: &str, local_dir: &Path) -> FileStats {
        let local = local_path(reference, local_dir);
        if local.exists() {
            return local_stats(&local);
        }
        if !is_url(reference) {
            return FileStats::default();
        }

        if let Some(file) = GitHubPath::parse(reference) {
            return self.github_stats(&file).await;
        }

        match web::content_length(&self.client, reference).await {
            Ok(size) => FileStats {
                size,
                ..FileStats::default()
            },
            Err(e) => {
                tracing::warn!("Could not get size of {}: {:#}", reference, e);
                FileStats::default()
            }
        }
    }

    async fn page_title(&self, url: &str) -> Option<String> {
        match web::fetch_title(&self.client, url).await {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!("Could not get title of {}: {:#}", url, e);
                None
            }
        }
    }

    async fn default_branch(&self, repo_url: &str) -> Option<String> {
        let (owner, repo) = parse_repo(repo_url)?;
        match self.github.default_branch(&owner, &repo).await {
            Ok(branch) => Some(branch),
            Err(e) => {
                tracing::warn!("Could not get default branch of {}: {:#}", repo_url, e);
                None
            }
        }
    }
}
