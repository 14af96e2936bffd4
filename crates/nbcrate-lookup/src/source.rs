//! The lookup capability the reconciler depends on

use std::path::Path;

/// What is known about a data file. Unknown fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Last modification (or last commit) date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Size in bytes.
    pub size: Option<u64>,
    /// Line count for files, child count for directories.
    pub count: Option<u64>,
}

/// Source of file stats, page titles and repository facts.
///
/// Implementations never fail: anything that cannot be determined comes
/// back as `None`.
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Stats for a file reference. `local_dir` is the directory that would
    /// hold a local copy of it.
    async fn file_stats(&self, reference: &str, local_dir: &Path) -> FileStats;

    /// Title of a web page, cut at the first `" - "`.
    async fn page_title(&self, url: &str) -> Option<String>;

    /// Default branch of a code repository.
    async fn default_branch(&self, repo_url: &str) -> Option<String>;
}
