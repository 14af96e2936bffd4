//! CLI command implementations

use nbcrate_lookup::create_source;
use nbcrate_reconciler::{annotate_notebooks, reconcile, write_readme, ReconcileConfig, RunOptions};
use std::path::PathBuf;

pub fn run_options(
    version: Option<String>,
    data_repo: Option<String>,
    repo_url: Option<String>,
    offline: bool,
) -> RunOptions {
    RunOptions {
        version,
        data_repo,
        repo_url,
        offline,
        ..RunOptions::default()
    }
}

pub async fn update(root: PathBuf, options: RunOptions) -> anyhow::Result<()> {
    let config = ReconcileConfig::load(&root)?;

    let source_name = if options.offline { "offline" } else { "live" };
    let token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
    let source = create_source(source_name, token)?;
    tracing::debug!("Using {} metadata source", source_name);

    let report = reconcile(&root, &config, &options, &*source).await?;
    tracing::info!(
        "Updated {} ({} notebooks, {} entities)",
        report.document.display(),
        report.notebooks,
        report.entities
    );
    Ok(())
}

pub fn readme(root: PathBuf, data: bool) -> anyhow::Result<()> {
    let config = ReconcileConfig::load(&root)?;
    let path = write_readme(&root, &config, data)?;
    tracing::info!("README written to {}", path.display());
    Ok(())
}

pub fn annotate(root: PathBuf, force: bool) -> anyhow::Result<()> {
    let config = ReconcileConfig::load(&root)?;
    let changed = annotate_notebooks(&root, &config, force)?;
    tracing::info!("Annotated {} notebooks", changed.len());
    Ok(())
}
