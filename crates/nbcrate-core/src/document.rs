//! Reading and writing the crate document

use crate::graph::{DEFAULT_CONTEXT, EntityGraph};
use crate::model::Entity;
use std::path::{Path, PathBuf};

/// Metadata document file name.
pub const METADATA_FILE: &str = "ro-crate-metadata.json";

const CONTEXT_KEY: &str = "@context";
const GRAPH_KEY: &str = "@graph";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document has no @graph array")]
    MissingGraph,

    #[error("graph entry {0} is not an object with an @id")]
    InvalidEntity(usize),
}

/// Get the metadata document path inside a crate directory
pub fn metadata_path(dir: &Path) -> PathBuf {
    dir.join(METADATA_FILE)
}

/// Parse a crate document.
pub fn from_json_str(json: &str) -> Result<EntityGraph, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Object(mut doc) = value else {
        return Err(DocumentError::MissingGraph);
    };

    let context = doc
        .remove(CONTEXT_KEY)
        .unwrap_or_else(|| serde_json::Value::String(DEFAULT_CONTEXT.to_string()));
    let Some(serde_json::Value::Array(items)) = doc.remove(GRAPH_KEY) else {
        return Err(DocumentError::MissingGraph);
    };

    let mut graph = EntityGraph::with_context(context);
    for (index, item) in items.into_iter().enumerate() {
        let serde_json::Value::Object(map) = item else {
            return Err(DocumentError::InvalidEntity(index));
        };
        let entity = Entity::from_json(map).ok_or(DocumentError::InvalidEntity(index))?;
        graph.insert(entity);
    }
    Ok(graph)
}

/// Serialize a graph to a pretty-printed crate document.
pub fn to_json_string(graph: &EntityGraph) -> Result<String, DocumentError> {
    let items: Vec<serde_json::Value> = graph.entities().map(Entity::to_json).collect();
    let doc = serde_json::json!({
        CONTEXT_KEY: graph.context().clone(),
        GRAPH_KEY: items,
    });
    let mut json = serde_json::to_string_pretty(&doc)?;
    json.push('\n');
    Ok(json)
}

/// Load the crate document from a directory. Returns `Ok(None)` when there
/// is no document yet.
pub fn load_document(dir: &Path) -> Result<Option<EntityGraph>, DocumentError> {
    let path = metadata_path(dir);
    if !path.exists() {
        return Ok(None);
    }

    let json = std::fs::read_to_string(&path).map_err(io_err(&path))?;
    let graph = from_json_str(&json)?;

    tracing::debug!("Loaded {} entities from {}", graph.len(), path.display());
    Ok(Some(graph))
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> DocumentError {
    let path = path.to_path_buf();
    move |source| DocumentError::Io { path, source }
}

/// Write the crate document into a directory.
///
/// The document is written to a sibling temporary file first and renamed
/// into place, so an interrupted write leaves the previous document intact.
pub fn save_document(graph: &EntityGraph, dir: &Path) -> Result<PathBuf, DocumentError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    }

    let path = metadata_path(dir);
    let tmp = dir.join(format!("{METADATA_FILE}.tmp"));
    let json = to_json_string(graph)?;
    std::fs::write(&tmp, json).map_err(io_err(&tmp))?;
    std::fs::rename(&tmp, &path).map_err(io_err(&path))?;

    tracing::debug!("Crate document saved: {}", path.display());
    Ok(path)
}
