//! One reconciliation run over a repository

use crate::config::{ReconcileConfig, RunOptions};
use crate::defaults::{ensure_defaults, COMPLETED_STATUS};
use crate::gc::{remove_deleted_files, remove_unreferenced_authors};
use crate::repo::{git_remote_url, normalize_repo_url, repo_name};
use anyhow::{Context, Result};
use indexmap::IndexSet;
use nbcrate_core::{ids, load_document, properties, save_document, EntityGraph, Properties, Value, ROOT_ID};
use nbcrate_lookup::{LookupCache, MetadataSource};
use nbcrate_notebook::{extract_metadata, find_notebooks, Notebook, NotebookFilter};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory holding the document in data-repository mode.
pub const DATA_CRATE_DIR: &str = "data-rocrate";

const DEFAULT_BRANCH: &str = "main";

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Path of the written document.
    pub document: PathBuf,
    /// Notebooks merged into the graph.
    pub notebooks: usize,
    /// Notebooks skipped for lack of an annotation or data in the data repository.
    pub skipped: usize,
    pub entities: usize,
}

/// Directory the document lives in for the given options.
pub fn crate_dir(root: &Path, options: &RunOptions) -> PathBuf {
    if options.data_repo.is_some() {
        root.join(DATA_CRATE_DIR)
    } else {
        root.to_path_buf()
    }
}

/// Reconciliation session. Owns the graph for the length of one run;
/// every stage mutates it through `&mut self`.
pub struct Reconciler<'a> {
    pub(crate) graph: EntityGraph,
    pub(crate) source: &'a dyn MetadataSource,
    pub(crate) cache: LookupCache,
    pub(crate) config: &'a ReconcileConfig,
    pub(crate) options: &'a RunOptions,
    pub(crate) root_dir: PathBuf,
    /// Code repository URL, ending in `/`.
    pub(crate) code_repo: String,
    /// Data repository URL in data-repository mode, ending in `/`.
    pub(crate) data_repo: Option<String>,
    pub(crate) branch: String,
    /// Local directories searched for data files during cleanup.
    pub(crate) data_paths: IndexSet<PathBuf>,
}

impl<'a> Reconciler<'a> {
    /// Create a session, resolving the code repository URL from the
    /// options or the git remote.
    pub fn new(
        root_dir: impl AsRef<Path>,
        config: &'a ReconcileConfig,
        options: &'a RunOptions,
        source: &'a dyn MetadataSource,
    ) -> Result<Self> {
        let root_dir = root_dir.as_ref().to_path_buf();
        let code_repo = options
            .repo_url
            .clone()
            .or_else(|| git_remote_url(&root_dir))
            .map(|url| normalize_repo_url(&url))
            .context("No repository URL: pass --repo-url or configure a git remote")?;
        // Notebooks live in the root, so it is always searched
        let mut data_paths = IndexSet::from([root_dir.clone()]);
        data_paths.extend(config.data_paths.iter().map(|p| root_dir.join(p)));

        Ok(Self {
            graph: EntityGraph::new(),
            source,
            cache: LookupCache::new(),
            config,
            options,
            code_repo,
            data_repo: options.data_repo.as_deref().map(normalize_repo_url),
            branch: DEFAULT_BRANCH.to_string(),
            data_paths,
            root_dir,
        })
    }

    /// Read-only view of the graph.
    pub fn graph(&self) -> &EntityGraph {
        &self.graph
    }

    /// Discover the repository's notebooks and run.
    pub async fn run(self) -> Result<RunReport> {
        let filter = NotebookFilter::new(self.config.exclude.as_slice())?;
        let notebooks = find_notebooks(&self.root_dir, &filter)?;
        self.run_notebooks(&notebooks).await
    }

    /// Merge the given notebooks, clean up, and write the document.
    ///
    /// The document is only written once everything succeeded.
    pub async fn run_notebooks(mut self, notebooks: &[PathBuf]) -> Result<RunReport> {
        let crate_dir = crate_dir(&self.root_dir, self.options);
        info!("Updating crate in {}", crate_dir.display());

        let fresh = self.load(&crate_dir);
        if let Some(branch) = self.cache.default_branch(self.source, &self.code_repo).await {
            self.branch = branch;
        }

        ensure_defaults(&mut self.graph);
        self.setup_root(fresh).await;
        if let Some(version) = self.options.version.clone() {
            self.record_version(&version);
        }

        let mut report = RunReport {
            document: PathBuf::new(),
            notebooks: 0,
            skipped: 0,
            entities: 0,
        };
        for path in notebooks {
            if self.process_notebook(path).await? {
                report.notebooks += 1;
            } else {
                report.skipped += 1;
            }
        }

        let data_paths: Vec<PathBuf> = self.data_paths.iter().cloned().collect();
        remove_deleted_files(&mut self.graph, &data_paths);
        remove_unreferenced_authors(&mut self.graph);

        report.document = save_document(&self.graph, &crate_dir)?;
        report.entities = self.graph.len();
        info!(
            "Wrote {} entities ({} notebooks, {} skipped) to {}",
            report.entities,
            report.notebooks,
            report.skipped,
            report.document.display()
        );
        Ok(report)
    }

    /// Load the existing document. Returns whether the graph starts fresh.
    fn load(&mut self, crate_dir: &Path) -> bool {
        match load_document(crate_dir) {
            Ok(Some(graph)) => {
                debug!("Loaded {} existing entities", graph.len());
                self.graph = graph;
            }
            Ok(None) => debug!("No existing document, starting fresh"),
            Err(e) => warn!("Ignoring unreadable document in {}: {}", crate_dir.display(), e),
        }
        !self.graph.contains(ROOT_ID)
    }

    /// Merge one notebook. Returns `false` when it was skipped.
    async fn process_notebook(&mut self, path: &Path) -> Result<bool> {
        let notebook = Notebook::read(path)?;
        let Some(metadata) = extract_metadata(&notebook)? else {
            return Ok(false);
        };
        if let Some(data_repo) = &self.data_repo {
            if !metadata.creates_data_in(data_repo) {
                debug!("{} creates no data in {}", notebook.file_name(), data_repo);
                return Ok(false);
            }
        }

        let file_name = notebook.file_name();
        info!("Adding notebook {}", file_name);
        let notebook_id = self.upsert_notebook(&file_name, &metadata).await;

        // Fallback date for runs whose results carry none
        let reference = if ids::is_url(&notebook_id) { notebook_id.as_str() } else { file_name.as_str() };
        let notebook_date = self.source.file_stats(reference, &self.root_dir).await.date;

        for (index, action) in metadata.action.iter().enumerate() {
            // Index counts every declared run so identifiers stay stable
            if let Some(data_repo) = &self.data_repo {
                if !action.writes_to(data_repo) {
                    debug!("Skipping run {} of {}: no results in {}", index, file_name, data_repo);
                    continue;
                }
            }
            self.upsert_action(&notebook_id, &file_name, index, action, notebook_date.as_deref())
                .await;
        }
        Ok(true)
    }

    /// Set version and publication date, and record the version bump.
    fn record_version(&mut self, version: &str) {
        let date = self.options.run_date;
        if let Some(root) = self.graph.root_mut() {
            root.set("version", version);
            root.set("datePublished", date);
        }
        self.graph.upsert_with(
            &ids::update_action_id(version),
            || {
                properties! {
                    "@type" => "UpdateAction",
                    "name" => format!("Create version {version}"),
                    "endDate" => date,
                    "actionStatus" => Value::reference(COMPLETED_STATUS),
                    "object" => Value::reference(ROOT_ID),
                }
            },
            Properties::new(),
        );
    }

    /// Repository URL of a file inside the code repository.
    pub(crate) fn blob_url(&self, path: &str) -> String {
        format!("{}blob/{}/{}", self.code_repo, self.branch, path)
    }

    /// Name of the repository the crate describes.
    pub(crate) fn crate_name(&self) -> &str {
        repo_name(self.data_repo.as_deref().unwrap_or(&self.code_repo))
    }
}

/// Update the crate for the repository at `root`.
pub async fn reconcile(
    root: &Path,
    config: &ReconcileConfig,
    options: &RunOptions,
    source: &dyn MetadataSource,
) -> Result<RunReport> {
    Reconciler::new(root, config, options, source)?.run().await
}
