//! Metadata source implementations

pub mod github;
pub mod web;
pub mod live;
pub mod fixed;

pub use fixed::StaticSource;
pub use live::LiveSource;

use super::source::MetadataSource;
use anyhow::Result;

/// Factory function to create metadata sources
pub fn create_source(source_name: &str, token: Option<String>) -> Result<Box<dyn MetadataSource>> {
    match source_name {
        "live" => Ok(Box::new(LiveSource::new(token)?)),
        "offline" => Ok(Box::new(StaticSource::new())),
        _ => anyhow::bail!("Unknown metadata source: {}", source_name),
    }
}
