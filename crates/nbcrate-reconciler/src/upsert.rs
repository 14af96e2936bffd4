//! Creating and refreshing Person, notebook and data file entities

use crate::defaults::{NOTEBOOK_FORMAT, NOTEBOOK_PROFILE, PYTHON};
use crate::session::Reconciler;
use nbcrate_core::ids::{file_id, is_url, person_id, trailing_segment};
use nbcrate_core::{properties, Properties, Value};
use nbcrate_lookup::local::local_path;
use nbcrate_notebook::{ActionRecord, AuthorRecord, DataFileRecord, NotebookMetadata, OneOrMany};
use tracing::debug;

/// Which side of a run a data file is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Object,
    Result,
}

/// Date-shaped text becomes a `Date`, anything else stays text.
pub(crate) fn date_value(date: &str) -> Value {
    Value::from_json(serde_json::Value::String(date.to_string()))
}

impl Reconciler<'_> {
    /// Upsert a Person and return its identifier.
    pub(crate) fn upsert_person(&mut self, author: &AuthorRecord) -> String {
        let id = person_id(&author.name, author.orcid.as_deref());
        let mut props = properties! {
            "@type" => "Person",
            "name" => author.name.as_str(),
        };
        if let Some(orcid) = author.orcid.as_deref().filter(|o| !o.is_empty()) {
            props.insert("orcid".to_string(), Value::text(orcid));
        }
        for (key, value) in &author.extra {
            props.insert(key.clone(), Value::from_json(value.clone()));
        }
        self.graph.upsert(&id, props);
        id
    }

    /// Upsert a notebook entity and return its identifier.
    pub(crate) async fn upsert_notebook(&mut self, file_name: &str, metadata: &NotebookMetadata) -> String {
        let url = self.blob_url(file_name);
        let id = if self.data_repo.is_some() {
            url.clone()
        } else {
            file_name.to_string()
        };

        let author_ids: Vec<String> = if metadata.author.is_empty() {
            self.graph
                .root()
                .map(|root| root.references("author").into_iter().map(str::to_string).collect())
                .unwrap_or_default()
        } else {
            metadata.author.iter().map(|a| self.upsert_person(a)).collect()
        };

        let doc_page = match metadata.main_entity_of_page.as_str() {
            "" => None,
            page => Some(self.upsert_doc_page(page).await),
        };
        let examples = self.upsert_examples(&metadata.work_example);

        let code_repo = self.code_repo.clone();
        let notebook = self.graph.upsert_with(
            &id,
            || {
                let mut props = properties! {
                    "@type" => Value::types(&["File", "SoftwareSourceCode"]),
                    "name" => metadata.name.as_str(),
                    "description" => metadata.description.as_str(),
                    "programmingLanguage" => Value::reference(PYTHON),
                    "encodingFormat" => NOTEBOOK_FORMAT,
                    "conformsTo" => Value::reference(NOTEBOOK_PROFILE),
                    "codeRepository" => code_repo,
                    "url" => url,
                };
                if !metadata.category.is_empty() {
                    props.insert("category".to_string(), Value::text(&metadata.category));
                }
                props.insert("position".to_string(), Value::from(metadata.position));
                props
            },
            properties! {
                "name" => metadata.name.as_str(),
                "description" => metadata.description.as_str(),
            },
        );

        for author in &author_ids {
            notebook.append_reference("author", author);
        }
        if let Some(page) = doc_page {
            notebook.set("mainEntityOfPage", Value::reference(page));
        }
        if examples.is_empty() {
            notebook.remove("workExample");
        } else {
            notebook.set("workExample", Value::references(examples));
        }
        id
    }

    /// Upsert a declared data file and return its identifier. Returns
    /// `None` for files that are neither local, nor URLs, nor part of the
    /// data repository.
    pub(crate) async fn upsert_file(
        &mut self,
        record: &DataFileRecord,
        action: &ActionRecord,
        role: FileRole,
    ) -> Option<String> {
        let reference = record.url.as_str();
        let local_dir = self.root_dir.join(action.local_path());
        let local = local_path(reference, &local_dir);
        let in_data_repo = self.data_repo.as_deref().is_some_and(|repo| reference.contains(repo));

        if !local.exists() && !is_url(reference) && !in_data_repo {
            debug!("Skipping {}: not found in {}", reference, local_dir.display());
            return None;
        }
        self.data_paths.insert(local_dir.clone());

        let id = file_id(reference, self.data_repo.as_deref());
        let stats = self.source.file_stats(reference, &local_dir).await;

        let types: &[&str] = if local.is_dir() {
            &["Dataset"]
        } else if local.is_file() {
            &["File", "Dataset"]
        } else {
            &["File"]
        };
        let url = if is_url(reference) {
            reference.to_string()
        } else if action.local_path() == "." {
            self.blob_url(reference)
        } else {
            self.blob_url(&format!("{}/{}", action.local_path().trim_end_matches('/'), reference))
        };
        let name = record
            .name
            .clone()
            .unwrap_or_else(|| trailing_segment(reference).to_string());

        let mut updates = Properties::new();
        let format = if local.is_dir() {
            None
        } else {
            mime_guess::from_path(trailing_segment(reference)).first()
        };
        let is_csv = format.as_ref().is_some_and(|m| m.essence_str() == "text/csv");
        if let Some(format) = &format {
            updates.insert("encodingFormat".to_string(), Value::text(format.essence_str()));
        }
        if let Some(description) = &record.description {
            updates.insert("description".to_string(), Value::text(description));
        }
        if let Some(license) = &record.license {
            let value = match license {
                OneOrMany::One(id) => Value::reference(id),
                OneOrMany::Many(ids) => Value::references(ids.iter().cloned()),
            };
            updates.insert("license".to_string(), value);
        }
        if let Some(date) = &stats.date {
            updates.insert("dateModified".to_string(), date_value(date));
        }
        if let Some(size) = stats.size {
            updates.insert("contentSize".to_string(), Value::from(size));
        }
        // Header row is not a record
        let rows = stats.count.map(|c| if is_csv { c.saturating_sub(1) } else { c });
        if let Some(rows) = rows.filter(|&r| r > 0) {
            updates.insert("size".to_string(), Value::from(rows));
        }
        if is_url(reference) {
            updates.insert("sdDatePublished".to_string(), Value::from(self.options.run_date));
        }

        self.graph.upsert_with(
            &id,
            || {
                properties! {
                    "@type" => Value::types(types),
                    "name" => name,
                    "url" => url,
                }
            },
            updates,
        );

        if role == FileRole::Result && self.data_repo.is_none() {
            self.link_result(&id, action).await;
        }

        Some(id)
    }

    /// Root author references, creating Persons for the default authors.
    pub(crate) fn default_author_ids(&mut self) -> Vec<String> {
        let config = self.config;
        config.default_authors.iter().map(|a| self.upsert_person(a)).collect()
    }
}
