//! Finding the notebooks that belong in the crate

use crate::NotebookError;
use crate::NOTEBOOK_EXTENSION;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

/// File name patterns skipped by default: drafts, scratch notebooks,
/// index pages and app wrappers.
pub const DEFAULT_EXCLUDES: &[&str] = &["draft*", "untitled*", "index.*", "App-*"];

/// Case-insensitive file name filter.
#[derive(Debug, Clone)]
pub struct NotebookFilter {
    excludes: GlobSet,
}

impl NotebookFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, NotebookError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern.as_ref())
                .case_insensitive(true)
                .literal_separator(true)
                .build()?;
            builder.add(glob);
        }
        Ok(NotebookFilter {
            excludes: builder.build()?,
        })
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excludes.is_match(file_name)
    }
}

impl Default for NotebookFilter {
    fn default() -> Self {
        // The built-in patterns are known to be valid
        Self::new(DEFAULT_EXCLUDES).unwrap_or(NotebookFilter {
            excludes: GlobSet::empty(),
        })
    }
}

/// Notebooks directly inside `dir` (not recursive), sorted by file name.
pub fn find_notebooks(dir: &Path, filter: &NotebookFilter) -> Result<Vec<PathBuf>, NotebookError> {
    let entries = std::fs::read_dir(dir).map_err(|source| NotebookError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut notebooks = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cannot read entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if !path.is_file() || !file_name.ends_with(NOTEBOOK_EXTENSION) {
            continue;
        }
        if filter.is_excluded(&file_name) {
            tracing::debug!("Skipping excluded notebook {}", file_name);
            continue;
        }
        notebooks.push(path);
    }

    notebooks.sort();
    Ok(notebooks)
}
