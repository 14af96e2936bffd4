//! GitHub REST API client for repository files

use anyhow::{Context, Result};
use serde::Deserialize;

const API_BASE: &str = "https://api.github.com";

/// A file location inside a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubPath {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Path of the file within the repository.
    pub path: String,
}

impl GitHubPath {
    /// Parse a `github.com/{owner}/{repo}/blob/{branch}/{path}` URL.
    /// `/raw/` URLs are treated as their `/blob/` equivalent.
    pub fn parse(url: &str) -> Option<Self> {
        let url = url.replace("/raw/", "/blob/");
        let rest = url.split_once("github.com/")?.1;
        let mut parts = rest.splitn(5, '/');
        let owner = parts.next()?;
        let repo = parts.next()?;
        if parts.next()? != "blob" {
            return None;
        }
        let branch = parts.next()?;
        let path = parts.next()?.split(['?', '#']).next()?;
        if owner.is_empty() || repo.is_empty() || branch.is_empty() || path.is_empty() {
            return None;
        }
        Some(GitHubPath {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
            path: path.to_string(),
        })
    }
}

/// `(owner, repo)` of a repository URL such as `https://github.com/o/r/`.
pub fn parse_repo(url: &str) -> Option<(String, String)> {
    let rest = url.split_once("github.com/")?.1;
    let mut parts = rest.trim_end_matches('/').split('/');
    let owner = parts.next().filter(|s| !s.is_empty())?;
    let repo = parts.next().filter(|s| !s.is_empty())?;
    Some((owner.to_string(), repo.trim_end_matches(".git").to_string()))
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    committer: CommitSignature,
}

#[derive(Debug, Deserialize)]
struct CommitSignature {
    date: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    size: u64,
}

#[derive(Debug, Deserialize)]
struct RepoInfo {
    default_branch: String,
}

pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(client: reqwest::Client, token: Option<String>) -> Self {
        Self {
            client,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let mut request = self.client.get(url).header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("token {}", token));
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API error {}: {}", status, error_text);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse GitHub response from {}", url))
    }

    /// Date of the latest commit touching the file, `YYYY-MM-DD`.
    pub async fn last_commit_date(&self, file: &GitHubPath) -> Result<Option<String>> {
        let url = format!(
            "{}/repos/{}/{}/commits?path={}&sha={}&per_page=1",
            API_BASE, file.owner, file.repo, file.path, file.branch
        );
        let commits: Vec<CommitEntry> = self.get(&url).await?;
        Ok(commits
            .first()
            .and_then(|c| c.commit.committer.date.get(..10))
            .map(str::to_string))
    }

    /// Size in bytes of the file's blob.
    pub async fn blob_size(&self, file: &GitHubPath) -> Result<u64> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            API_BASE, file.owner, file.repo, file.path, file.branch
        );
        let entry: ContentEntry = self.get(&url).await?;
        Ok(entry.size)
    }

    pub async fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}", API_BASE, owner, repo);
        let info: RepoInfo = self.get(&url).await?;
        Ok(info.default_branch)
    }
}
