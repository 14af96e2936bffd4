//! Metadata lookups for nbcrate
//!
//! This crate resolves the facts the reconciler records about files and
//! pages it does not own: dates, sizes and row counts of data files
//! (local or remote), documentation page titles, and repository default
//! branches. Every lookup degrades to "unknown" rather than failing.

pub mod source;
pub mod local;
pub mod providers;
pub mod cache;


pub use source::*;
pub use cache::LookupCache;
pub use providers::{create_source, LiveSource, StaticSource};
