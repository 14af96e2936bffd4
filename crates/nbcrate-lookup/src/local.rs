//! Stats for files present on the local filesystem

use crate::source::FileStats;
use chrono::{DateTime, Local};
use nbcrate_core::ids::{is_url, trailing_segment};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Extensions whose contents are not line oriented; no count is recorded.
pub const UNCOUNTED_EXTENSIONS: &[&str] = &["zip", "db", "gz", "sqlite", "parquet", "xlsx"];

/// Where a local copy of `reference` would live under `dir`.
///
/// URLs map to their trailing segment; relative references are joined as-is.
pub fn local_path(reference: &str, dir: &Path) -> PathBuf {
    if is_url(reference) {
        dir.join(trailing_segment(reference))
    } else {
        dir.join(reference)
    }
}

/// Stats for a local file or directory. Missing paths yield empty stats.
pub fn local_stats(path: &Path) -> FileStats {
    let Ok(meta) = std::fs::metadata(path) else {
        return FileStats::default();
    };
    let date = meta.modified().ok().map(format_date);

    if meta.is_dir() {
        return FileStats {
            date,
            size: None,
            count: count_children(path),
        };
    }

    let count = if is_countable(path) {
        count_lines(path)
    } else {
        None
    };
    FileStats {
        date,
        size: Some(meta.len()),
        count,
    }
}

fn format_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d").to_string()
}

fn is_countable(path: &Path) -> bool {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    !UNCOUNTED_EXTENSIONS.contains(&ext.as_str())
}

/// Number of lines, counting a final line without a terminator.
pub fn count_lines(path: &Path) -> Option<u64> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Cannot count lines in {}: {}", path.display(), e);
            return None;
        }
    };
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count() as u64;
    let unterminated = matches!(bytes.last(), Some(&b) if b != b'\n');
    Some(newlines + u64::from(unterminated))
}

/// Number of direct, non-hidden children.
fn count_children(dir: &Path) -> Option<u64> {
    let entries = std::fs::read_dir(dir).ok()?;
    let count = entries
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .count();
    Some(count as u64)
}
