//! Repository tasks outside the update run: seeding notebook annotations
//! and rendering the README summary

use crate::config::ReconcileConfig;
use crate::session::DATA_CRATE_DIR;
use anyhow::{Context, Result};
use nbcrate_core::{load_document, render_readme, SummaryOptions};
use nbcrate_notebook::{annotate, find_notebooks, Notebook, NotebookFilter};
use std::path::{Path, PathBuf};
use tracing::info;

pub const README_FILE: &str = "README.md";

/// Write a minimal annotation into each notebook that lacks one, or into
/// every notebook when `force` is set. Returns the notebooks changed.
pub fn annotate_notebooks(root: &Path, config: &ReconcileConfig, force: bool) -> Result<Vec<PathBuf>> {
    let filter = NotebookFilter::new(config.exclude.as_slice())?;
    let mut changed = Vec::new();
    for path in find_notebooks(root, &filter)? {
        let mut notebook = Notebook::read(&path)?;
        if annotate(&mut notebook, &config.default_authors, force) {
            notebook.write()?;
            info!("Annotated {}", notebook.file_name());
            changed.push(path);
        }
    }
    Ok(changed)
}

/// Render `README.md` from the document in `root` (or in its data crate
/// directory when `data` is set). The document itself is not modified.
pub fn write_readme(root: &Path, config: &ReconcileConfig, data: bool) -> Result<PathBuf> {
    let crate_dir = if data { root.join(DATA_CRATE_DIR) } else { root.to_path_buf() };
    let graph = load_document(&crate_dir)?
        .with_context(|| format!("No crate document in {}", crate_dir.display()))?;

    let options = SummaryOptions {
        workbench: Some((config.workbench.name.clone(), config.workbench.url.clone())),
        credit: config.credit.clone(),
    };
    let path = crate_dir.join(README_FILE);
    std::fs::write(&path, render_readme(&graph, &options))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(path)
}
