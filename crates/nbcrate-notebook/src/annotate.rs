//! Seeding notebooks with a minimal crate annotation

use crate::extractor::AuthorRecord;
use crate::notebook::Notebook;
use regex::Regex;
use std::sync::LazyLock;

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^# (.+)(\n|$)").unwrap_or_else(|e| unreachable!("invalid title pattern: {e}"))
});

/// Text of the first level-1 heading that opens a markdown cell.
pub fn extract_title(notebook: &Notebook) -> Option<String> {
    notebook
        .markdown_sources()
        .iter()
        .find_map(|source| TITLE.captures(source))
        .map(|caps| caps[1].trim().to_string())
}

/// Write `{name, author}` into the notebook's annotation block.
///
/// Notebooks that already carry an annotation are left alone unless
/// `force` is set. Returns whether the notebook was changed.
pub fn annotate(notebook: &mut Notebook, authors: &[AuthorRecord], force: bool) -> bool {
    if notebook.annotation().is_some() && !force {
        return false;
    }

    // Without a title the name is left out and defaults to the file name
    let mut block = serde_json::Map::new();
    if let Some(title) = extract_title(notebook) {
        block.insert("name".to_string(), serde_json::Value::String(title));
    }
    block.insert(
        "author".to_string(),
        serde_json::to_value(authors).unwrap_or(serde_json::Value::Array(Vec::new())),
    );

    notebook.set_annotation(serde_json::Value::Object(block));
    true
}
