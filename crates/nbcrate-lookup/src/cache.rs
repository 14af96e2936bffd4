//! Per-run memo of page titles and default branches

use crate::source::MetadataSource;
use std::collections::HashMap;

/// Remembers lookups for the length of one run so each unique URL is
/// fetched at most once. Failed lookups are remembered too.
#[derive(Debug, Default)]
pub struct LookupCache {
    titles: HashMap<String, Option<String>>,
    branches: HashMap<String, Option<String>>,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page title for `url`, fetched on first request.
    pub async fn page_title(&mut self, source: &dyn MetadataSource, url: &str) -> Option<String> {
        if let Some(title) = self.titles.get(url) {
            return title.clone();
        }
        let title = source.page_title(url).await;
        if title.is_none() {
            tracing::debug!("No title found for {}", url);
        }
        self.titles.insert(url.to_string(), title.clone());
        title
    }

    /// Default branch of `repo_url`, fetched on first request.
    pub async fn default_branch(&mut self, source: &dyn MetadataSource, repo_url: &str) -> Option<String> {
        if let Some(branch) = self.branches.get(repo_url) {
            return branch.clone();
        }
        let branch = source.default_branch(repo_url).await;
        self.branches.insert(repo_url.to_string(), branch.clone());
        branch
    }
}
