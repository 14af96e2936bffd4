//! Deterministic source for offline runs and tests

use crate::local::{local_path, local_stats};
use crate::source::{FileStats, MetadataSource};
use std::collections::HashMap;
use std::path::Path;

/// Answers from fixed tables and never touches the network. References
/// not in the table fall back to local filesystem stats.
#[derive(Debug, Default, Clone)]
pub struct StaticSource {
    stats: HashMap<String, FileStats>,
    titles: HashMap<String, String>,
    branches: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(mut self, reference: impl Into<String>, stats: FileStats) -> Self {
        self.stats.insert(reference.into(), stats);
        self
    }

    pub fn with_title(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.titles.insert(url.into(), title.into());
        self
    }

    pub fn with_branch(mut self, repo_url: impl Into<String>, branch: impl Into<String>) -> Self {
        self.branches.insert(repo_url.into(), branch.into());
        self
    }
}

#[async_trait::async_trait]
impl MetadataSource for StaticSource {
    async fn file_stats(&self, reference: &str, local_dir: &Path) -> FileStats {
        if let Some(stats) = self.stats.get(reference) {
            return stats.clone();
        }
        local_stats(&local_path(reference, local_dir))
    }

    async fn page_title(&self, url: &str) -> Option<String> {
        self.titles.get(url).cloned()
    }

    async fn default_branch(&self, repo_url: &str) -> Option<String> {
        self.branches.get(repo_url).cloned()
    }
}
