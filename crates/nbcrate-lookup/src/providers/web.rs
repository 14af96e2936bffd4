//! Plain HTTP lookups for non-GitHub URLs

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::header::CONTENT_LENGTH;
use std::sync::LazyLock;

static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>")
        .unwrap_or_else(|e| unreachable!("invalid title pattern: {e}"))
});

/// Page title from an HTML document, entities decoded and cut at the
/// first `" - "`.
pub fn extract_page_title(html: &str) -> Option<String> {
    let raw = html_escape::decode_html_entities(TITLE.captures(html)?.get(1)?.as_str());
    let title = raw.split(" - ").next().unwrap_or(raw.as_ref()).trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// `Content-Length` reported by a HEAD request.
pub async fn content_length(client: &reqwest::Client, url: &str) -> Result<Option<u64>> {
    let response = client
        .head(url)
        .send()
        .await
        .with_context(|| format!("Failed to send HEAD request to {}", url))?;
    if !response.status().is_success() {
        anyhow::bail!("HEAD {} returned {}", url, response.status());
    }
    Ok(response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok()))
}

/// Fetch a page and extract its title.
pub async fn fetch_title(client: &reqwest::Client, url: &str) -> Result<Option<String>> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;
    if !response.status().is_success() {
        anyhow::bail!("GET {} returned {}", url, response.status());
    }
    let html = response.text().await?;
    Ok(extract_page_title(&html))
}
