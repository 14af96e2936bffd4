//! Notebook discovery, annotation extraction, and annotation authoring

pub mod notebook;
pub mod extractor;
pub mod discovery;
pub mod annotate;

#[cfg(test)]
pub mod tests;

use std::path::PathBuf;

pub use notebook::{Notebook, ANNOTATION_KEY};
pub use extractor::{extract_metadata, ActionRecord, AuthorRecord, DataFileRecord, ExampleLink, NotebookMetadata, OneOrMany};
pub use discovery::{find_notebooks, NotebookFilter, DEFAULT_EXCLUDES};
pub use annotate::{annotate, extract_title};

/// Notebook file extension.
pub const NOTEBOOK_EXTENSION: &str = ".ipynb";

#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid notebook JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid notebook pattern: {0}")]
    Pattern(#[from] globset::Error),
}
