//! nbcrate core: crate entity model, entity store and document I/O

pub mod graph;
pub mod model;
pub mod ids;
pub mod document;
pub mod summary;

#[cfg(test)]
pub mod tests;

#[cfg(test)]
pub mod test_utils;

pub use model::{Entity, Properties, Value, ID_KEY, TYPE_KEY};
pub use graph::{EntityGraph, ROOT_ID, METADATA_ID, DEFAULT_CONTEXT};
pub use document::{METADATA_FILE, DocumentError, metadata_path, load_document, save_document, from_json_str, to_json_string};
pub use summary::{SummaryOptions, render_readme, associated_datasets};
