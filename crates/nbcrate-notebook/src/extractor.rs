//! Extraction of the crate annotation embedded in a notebook

use crate::notebook::Notebook;
use crate::NotebookError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// A declared author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    /// Any other properties (`mainEntityOfPage`, affiliations, ...).
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl AuthorRecord {
    pub fn new(name: impl Into<String>) -> Self {
        AuthorRecord {
            name: name.into(),
            orcid: None,
            extra: IndexMap::new(),
        }
    }

    pub fn with_orcid(mut self, orcid: impl Into<String>) -> Self {
        self.orcid = Some(orcid.into());
        self
    }
}

/// A single string or a list of strings, kept in the shape it was declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// A data file consumed or produced by a run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataFileRecord {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<OneOrMany>,
}

/// A related page showing the notebook or dataset in use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExampleLink {
    #[serde(default)]
    pub name: String,
    pub url: String,
}

/// One declared run of the notebook.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ActionRecord {
    #[serde(deserialize_with = "listify")]
    pub object: Vec<DataFileRecord>,
    #[serde(deserialize_with = "listify")]
    pub result: Vec<DataFileRecord>,
    /// Directory (relative to the repository) holding local copies of the files.
    pub local_path: Option<String>,
    pub query: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "mainEntityOfPage")]
    pub main_entity_of_page: Option<String>,
    #[serde(rename = "workExample", deserialize_with = "listify")]
    pub work_example: Vec<ExampleLink>,
    /// Sibling repository the results are stored in.
    #[serde(rename = "isPartOf")]
    pub is_part_of: Option<String>,
}

impl ActionRecord {
    pub fn local_path(&self) -> &str {
        self.local_path.as_deref().filter(|p| !p.is_empty()).unwrap_or(".")
    }

    /// Whether the run's first result is stored in the given repository.
    pub fn writes_to(&self, repo: &str) -> bool {
        self.result.first().is_some_and(|r| r.url.contains(repo))
    }
}

/// The flat metadata record of one notebook. Every key has a default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotebookMetadata {
    pub name: String,
    #[serde(deserialize_with = "listify")]
    pub author: Vec<AuthorRecord>,
    pub description: String,
    pub action: Vec<ActionRecord>,
    #[serde(rename = "mainEntityOfPage")]
    pub main_entity_of_page: String,
    #[serde(rename = "workExample", deserialize_with = "listify")]
    pub work_example: Vec<ExampleLink>,
    pub category: String,
    pub position: i64,
}

impl NotebookMetadata {
    /// Whether any declared run stores results in the given repository.
    pub fn creates_data_in(&self, repo: &str) -> bool {
        self.action.iter().any(|a| a.writes_to(repo))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrList<T> {
    List(Vec<T>),
    One(T),
}

/// Accept either a single value or a list, always yielding a list.
fn listify<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrList::deserialize(deserializer)? {
        OneOrList::List(items) => items,
        OneOrList::One(item) => vec![item],
    })
}

/// Extract the annotation block from a notebook.
///
/// Returns `Ok(None)` when the notebook carries no annotation; callers skip
/// such notebooks. A missing `name` defaults to the notebook's file name.
pub fn extract_metadata(notebook: &Notebook) -> Result<Option<NotebookMetadata>, NotebookError> {
    let Some(block) = notebook.annotation() else {
        tracing::debug!("No crate annotation in {}", notebook.path.display());
        return Ok(None);
    };

    let mut metadata =
        NotebookMetadata::deserialize(block).map_err(|source| NotebookError::Json {
            path: notebook.path.clone(),
            source,
        })?;
    if block.get("name").is_none() {
        metadata.name = notebook.file_name();
    }
    Ok(Some(metadata))
}
