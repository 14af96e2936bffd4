//! Reading and writing Jupyter notebook files

use crate::NotebookError;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

/// Key under the notebook-level `metadata` that holds the crate annotation.
pub const ANNOTATION_KEY: &str = "rocrate";

/// A notebook loaded as raw JSON. Key order is preserved on write.
#[derive(Debug, Clone)]
pub struct Notebook {
    pub path: PathBuf,
    pub content: serde_json::Value,
}

impl Notebook {
    pub fn read(path: impl AsRef<Path>) -> Result<Self, NotebookError> {
        let path = path.as_ref().to_path_buf();
        let json = std::fs::read_to_string(&path).map_err(|source| NotebookError::Io {
            path: path.clone(),
            source,
        })?;
        let content = serde_json::from_str(&json).map_err(|source| NotebookError::Json {
            path: path.clone(),
            source,
        })?;
        Ok(Notebook { path, content })
    }

    /// File name, e.g. `harvest.ipynb`.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The embedded annotation block, if the notebook carries one.
    pub fn annotation(&self) -> Option<&serde_json::Value> {
        self.content.get("metadata")?.get(ANNOTATION_KEY)
    }

    /// Replace the annotation block.
    pub fn set_annotation(&mut self, annotation: serde_json::Value) {
        let Some(root) = self.content.as_object_mut() else {
            return;
        };
        let metadata = root
            .entry("metadata")
            .or_insert_with(|| serde_json::Value::Object(Default::default()));
        if let Some(metadata) = metadata.as_object_mut() {
            metadata.insert(ANNOTATION_KEY.to_string(), annotation);
        }
    }

    /// Source text of each markdown cell, in order. Multi-line sources
    /// stored as a list of strings are joined.
    pub fn markdown_sources(&self) -> Vec<String> {
        let Some(cells) = self.content.get("cells").and_then(|c| c.as_array()) else {
            return Vec::new();
        };
        cells
            .iter()
            .filter(|cell| cell.get("cell_type").and_then(|t| t.as_str()) == Some("markdown"))
            .filter_map(|cell| match cell.get("source")? {
                serde_json::Value::String(s) => Some(s.clone()),
                serde_json::Value::Array(lines) => {
                    Some(lines.iter().filter_map(|l| l.as_str()).collect::<String>())
                }
                _ => None,
            })
            .collect()
    }

    /// Write back in the layout Jupyter uses: one-space indent, trailing newline.
    pub fn write(&self) -> Result<(), NotebookError> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
        self.content
            .serialize(&mut serializer)
            .map_err(|source| NotebookError::Json {
                path: self.path.clone(),
                source,
            })?;
        buf.push(b'\n');
        std::fs::write(&self.path, buf).map_err(|source| NotebookError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
