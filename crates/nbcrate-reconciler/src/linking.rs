//! Wiring entities together: root, runs, documentation pages, examples
//! and sibling datasets

use crate::defaults::{COMPLETED_STATUS, MIT_LICENSE};
use crate::repo::repo_name;
use crate::session::Reconciler;
use crate::upsert::{date_value, FileRole};
use nbcrate_core::ids::action_id;
use nbcrate_core::{properties, Properties, Value, ROOT_ID};
use nbcrate_notebook::{ActionRecord, ExampleLink};
use tracing::debug;

impl Reconciler<'_> {
    /// Create the root dataset on a fresh graph and refresh the
    /// properties every run owns.
    pub(crate) async fn setup_root(&mut self, fresh: bool) {
        let name = self.crate_name().to_string();
        let url = self.data_repo.clone().unwrap_or_else(|| self.code_repo.clone());

        if fresh {
            let kind = if self.data_repo.is_some() { "dataset" } else { "repository" };
            let authors = self.default_author_ids();
            let mut props = properties! {
                "@type" => "Dataset",
                "name" => name.as_str(),
                "description" => format!("A {} {}", self.config.workbench.name, kind),
                "url" => url.as_str(),
                "datePublished" => self.options.run_date,
            };
            if !authors.is_empty() {
                props.insert("author".to_string(), Value::references(authors));
            }
            self.graph.upsert(ROOT_ID, props);

            let config = self.config;
            let workbench = &config.workbench;
            let page_url = format!("{}{}", workbench.url, name);
            if let Some(title) = self.cache.page_title(self.source, &page_url).await {
                self.graph.upsert(
                    &workbench.url,
                    properties! {
                        "@type" => "CreativeWork",
                        "name" => workbench.name.as_str(),
                        "url" => workbench.url.as_str(),
                        "description" => workbench.description.as_str(),
                    },
                );
                self.graph.upsert(
                    &page_url,
                    properties! {
                        "@type" => "CreativeWork",
                        "name" => title,
                        "url" => page_url.as_str(),
                        "isPartOf" => Value::reference(&workbench.url),
                    },
                );
                self.graph.upsert(ROOT_ID, properties! { "mainEntityOfPage" => Value::reference(page_url) });
            }
        }

        let mut updates = properties! {
            "url" => url.as_str(),
            "license" => Value::reference(MIT_LICENSE),
        };
        if let Some(data_repo) = self.data_repo.clone() {
            let code_repo = self.code_repo.clone();
            let download = format!("{data_repo}archive/refs/heads/main.zip");
            self.graph.upsert(
                &code_repo,
                properties! {
                    "@type" => "Dataset",
                    "name" => repo_name(&code_repo),
                    "url" => code_repo.as_str(),
                },
            );
            self.graph.upsert(
                &download,
                properties! {
                    "@type" => "DataDownload",
                    "name" => "Download repository as zip",
                    "url" => download.as_str(),
                },
            );
            updates.insert("isBasedOn".to_string(), Value::reference(code_repo));
            updates.insert("distribution".to_string(), Value::reference(download));
        }
        self.graph.upsert(ROOT_ID, updates);
    }

    /// Upsert a documentation page, named after its title when the page
    /// has one. Returns its identifier.
    pub(crate) async fn upsert_doc_page(&mut self, url: &str) -> String {
        let title = self.cache.page_title(self.source, url).await;
        let mut updates = Properties::new();
        if let Some(title) = title {
            updates.insert("name".to_string(), Value::text(title));
        }
        if url.starts_with(&self.config.workbench.url) {
            updates.insert("isPartOf".to_string(), Value::reference(&self.config.workbench.url));
        }
        self.graph.upsert_with(
            url,
            || properties! { "@type" => "CreativeWork", "url" => url },
            updates,
        );
        url.to_string()
    }

    /// Upsert example pages. Returns their identifiers in declared order.
    pub(crate) fn upsert_examples(&mut self, examples: &[ExampleLink]) -> Vec<String> {
        let mut ids = Vec::new();
        for example in examples {
            let mut props = properties! { "@type" => "CreativeWork" };
            if !example.name.is_empty() {
                props.insert("name".to_string(), Value::text(&example.name));
            }
            props.insert("url".to_string(), Value::text(&example.url));
            self.graph.upsert(&example.url, props);
            if !ids.contains(&example.url) {
                ids.push(example.url.clone());
            }
        }
        ids
    }

    /// Upsert the CreateAction for the `index`th run of a notebook, with
    /// its object and result lists rebuilt from the declaration.
    pub(crate) async fn upsert_action(
        &mut self,
        notebook_id: &str,
        file_name: &str,
        index: usize,
        action: &ActionRecord,
        notebook_date: Option<&str>,
    ) {
        let mut objects = Vec::new();
        for record in &action.object {
            if let Some(file) = self.upsert_file(record, action, FileRole::Object).await {
                objects.push(file);
            }
        }
        let mut results = Vec::new();
        for record in &action.result {
            if let Some(file) = self.upsert_file(record, action, FileRole::Result).await {
                results.push(file);
            }
        }

        // Read back from the graph so a failed lookup keeps the stored date.
        // ISO dates compare correctly as strings.
        let end_date = results
            .iter()
            .filter_map(|id| self.graph.get(id)?.get("dateModified")?.as_date_string())
            .max()
            .or_else(|| notebook_date.map(str::to_string));

        let id = action_id(notebook_id, index);
        debug!("Linking {} ({} objects, {} results)", id, objects.len(), results.len());
        let entity = self.graph.upsert_with(
            &id,
            || {
                let mut props = properties! {
                    "@type" => "CreateAction",
                    "instrument" => Value::reference(notebook_id),
                    "actionStatus" => Value::reference(COMPLETED_STATUS),
                    "name" => format!("Run of notebook: {file_name}"),
                };
                if let Some(query) = action.query.as_deref().filter(|q| !q.is_empty()) {
                    props.insert("query".to_string(), Value::text(query));
                }
                props
            },
            Properties::new(),
        );

        for (key, files) in [("object", &objects), ("result", &results)] {
            if files.is_empty() {
                entity.remove(key);
                continue;
            }
            // Emptied in place so the key keeps its position
            entity.set(key, Value::List(Vec::new()));
            for file in files {
                entity.append_reference(key, file);
            }
        }
        match end_date {
            Some(date) => entity.set("endDate", date_value(&date)),
            None => {
                entity.remove("endDate");
            }
        }

        if self.data_repo.is_some() {
            self.describe_root(action).await;
        }
    }

    /// Link a result file to where it is described: its sibling data
    /// repository, or else the run's documentation and examples.
    pub(crate) async fn link_result(&mut self, file_id: &str, action: &ActionRecord) {
        if let Some(repo) = action.is_part_of.as_deref().filter(|r| !r.is_empty()) {
            self.upsert_sibling_dataset(repo, action).await;
            if let Some(file) = self.graph.get_mut(file_id) {
                file.set("isPartOf", Value::reference(repo));
            }
            return;
        }

        let page = match action.main_entity_of_page.as_deref() {
            Some(page) if !page.is_empty() => Some(self.upsert_doc_page(page).await),
            _ => None,
        };
        let examples = self.upsert_examples(&action.work_example);
        if let Some(file) = self.graph.get_mut(file_id) {
            if let Some(page) = page {
                file.set("mainEntityOfPage", Value::reference(page));
            }
            for example in &examples {
                file.append_reference("workExample", example);
            }
        }
    }

    /// Ensure a Dataset stub for a sibling data repository and carry the
    /// run's description, documentation and examples onto it.
    async fn upsert_sibling_dataset(&mut self, repo: &str, action: &ActionRecord) {
        let page = match action.main_entity_of_page.as_deref() {
            Some(page) if !page.is_empty() => Some(self.upsert_doc_page(page).await),
            _ => None,
        };
        let examples = self.upsert_examples(&action.work_example);

        let stub = self.graph.upsert_with(
            repo,
            || {
                properties! {
                    "@type" => "Dataset",
                    "name" => repo_name(repo),
                    "url" => repo,
                }
            },
            Properties::new(),
        );
        if let Some(description) = action.description.as_deref().filter(|d| !d.is_empty()) {
            stub.set("description", description);
        }
        if let Some(page) = page {
            stub.set("mainEntityOfPage", Value::reference(page));
        }
        for example in &examples {
            stub.append_reference("workExample", example);
        }
    }

    /// In data-repository mode the crate root describes the data, so the
    /// run's description, documentation and examples land on it.
    async fn describe_root(&mut self, action: &ActionRecord) {
        let page = match action.main_entity_of_page.as_deref() {
            Some(page) if !page.is_empty() => Some(self.upsert_doc_page(page).await),
            _ => None,
        };
        let examples = self.upsert_examples(&action.work_example);

        let Some(root) = self.graph.root_mut() else {
            return;
        };
        if let Some(description) = action.description.as_deref().filter(|d| !d.is_empty()) {
            root.set("description", description);
        }
        if let Some(page) = page {
            root.set("mainEntityOfPage", Value::reference(page));
        }
        for example in &examples {
            root.append_reference("workExample", example);
        }
    }
}
