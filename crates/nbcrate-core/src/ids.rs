//! Identifier derivation
//!
//! These rules decide whether a later run finds the entity an earlier run
//! created, so they must stay stable.

/// File extension that marks an entity as a notebook.
pub const NOTEBOOK_EXTENSION: &str = ".ipynb";

const ORCID_PREFIX: &str = "https://orcid.org/";

/// Whether a reference is an absolute web URL.
pub fn is_url(reference: &str) -> bool {
    reference.starts_with("http")
}

/// Last non-empty path segment, ignoring a trailing slash.
pub fn trailing_segment(reference: &str) -> &str {
    let trimmed = reference.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Person identifier: the ORCID URI when known, otherwise `#` plus the
/// name with `", "` replaced by `_`.
pub fn person_id(name: &str, orcid: Option<&str>) -> String {
    match orcid.filter(|o| !o.is_empty()) {
        Some(orcid) if is_url(orcid) => orcid.to_string(),
        Some(orcid) => format!("{ORCID_PREFIX}{orcid}"),
        None => format!("#{}", name.replace(", ", "_")),
    }
}

/// File identifier. Files that live in the data repository are keyed by
/// their bare file name; everything else by the literal reference.
pub fn file_id(reference: &str, data_repo: Option<&str>) -> String {
    match data_repo {
        Some(repo) if !repo.is_empty() && reference.contains(repo) => {
            trailing_segment(reference).to_string()
        }
        _ => reference.to_string(),
    }
}

/// CreateAction identifier for the `index`th declared run of a notebook.
pub fn action_id(notebook_id: &str, index: usize) -> String {
    let stem = trailing_segment(notebook_id).replace(NOTEBOOK_EXTENSION, "");
    format!("{stem}_run_{index}")
}

/// UpdateAction identifier for a version label.
pub fn update_action_id(version: &str) -> String {
    format!("create_version_{}", version.replace('.', "_"))
}

pub fn is_notebook(id: &str) -> bool {
    id.ends_with(NOTEBOOK_EXTENSION)
}
