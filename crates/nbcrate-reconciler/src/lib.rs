//! Crate reconciliation for nbcrate
//!
//! Merges the annotations of a repository's notebooks into its crate
//! document: people, notebooks, data files and the runs linking them,
//! followed by cleanup of entities nothing refers to any more.

pub mod config;
pub mod defaults;
pub mod repo;
pub mod session;
pub mod upsert;
pub mod linking;
pub mod gc;
pub mod tasks;


#[cfg(test)]
pub mod test_utils;

pub use config::{ReconcileConfig, RunOptions, Workbench, CONFIG_FILE};
pub use session::{crate_dir, reconcile, Reconciler, RunReport, DATA_CRATE_DIR};
pub use gc::{remove_deleted_files, remove_unreferenced_authors};
pub use tasks::{annotate_notebooks, write_readme, README_FILE};
