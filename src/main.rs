//! nbcrate CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "nbcrate")]
#[command(about = "Maintain an RO-Crate describing a repository of notebooks and their data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Repository root path (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge notebook annotations into the crate document
    Update {
        /// Version label for a new release
        #[arg(long)]
        version: Option<String>,

        /// Sibling data repository URL; the crate then describes that data
        #[arg(long)]
        data_repo: Option<String>,

        /// Code repository URL (defaults to the git remote)
        #[arg(long)]
        repo_url: Option<String>,

        /// Skip all network lookups
        #[arg(long)]
        offline: bool,
    },
    /// Render README.md from the crate document
    Readme {
        /// Read the data repository crate instead
        #[arg(long)]
        data: bool,
    },
    /// Seed notebooks with a minimal annotation
    Annotate {
        /// Overwrite existing annotations
        #[arg(short, long)]
        force: bool,
    },
    /// Show version
    Version,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("nbcrate={}", log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenvy::from_path(cli.root.join(".env")) {
        Ok(()) => tracing::debug!("Loaded .env from {}", cli.root.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env: {}", e),
    }

    tracing::debug!("nbcrate v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Repository root: {}", cli.root.display());

    match cli.command {
        Commands::Update {
            version,
            data_repo,
            repo_url,
            offline,
        } => {
            let options = commands::run_options(version, data_repo, repo_url, offline);
            commands::update(cli.root, options).await
        }
        Commands::Readme { data } => commands::readme(cli.root, data),
        Commands::Annotate { force } => commands::annotate(cli.root, force),
        Commands::Version => {
            println!("nbcrate v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
