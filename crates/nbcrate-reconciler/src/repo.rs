//! Code repository location

use nbcrate_core::ids::trailing_segment;
use std::path::Path;
use std::process::Command;

/// `remote.origin.url` of the git repository at `root`.
pub fn git_remote_url(root: &Path) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["config", "--get", "remote.origin.url"])
        .output()
        .ok()?;
    if !output.status.success() {
        tracing::debug!("No git remote configured in {}", root.display());
        return None;
    }
    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!url.is_empty()).then_some(url)
}

/// Browser URL of a repository, always ending in `/`.
///
/// SSH remotes (`git@github.com:o/r.git`) become their HTTPS form and a
/// trailing `.git` is dropped.
pub fn normalize_repo_url(url: &str) -> String {
    let url = url.trim();
    let mut url = match url.strip_prefix("git@") {
        Some(rest) => format!("https://{}", rest.replacen(':', "/", 1)),
        None => url.to_string(),
    };
    if let Some(stripped) = url.strip_suffix(".git") {
        url = stripped.to_string();
    }
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Repository name: the last segment of its URL.
pub fn repo_name(url: &str) -> &str {
    trailing_segment(url)
}
