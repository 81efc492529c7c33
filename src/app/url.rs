//! Ad URL validation and normalization.

use std::sync::LazyLock;

use log::warn;
use regex::Regex;

use crate::config::MAX_URL_LENGTH;

// A scheme at the very start; "://" later in the query does not count
static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://").unwrap_or_else(|e| {
        panic!("Failed to compile regex pattern in SCHEME_PREFIX: {e}. This is a programming error.")
    })
});

/// Validates and normalizes an ad destination URL.
///
/// Trims whitespace, adds an `https://` prefix when no scheme is present, and accepts only
/// syntactically valid http/https URLs no longer than `MAX_URL_LENGTH`. Logs a warning and
/// returns `None` otherwise.
pub fn validate_and_normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        warn!("Skipping empty URL");
        return None;
    }

    let normalized = if SCHEME_PREFIX.is_match(url) {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    if normalized.len() > MAX_URL_LENGTH {
        warn!(
            "Skipping URL exceeding maximum length ({} > {MAX_URL_LENGTH}): {}...",
            normalized.len(),
            preview(&normalized)
        );
        return None;
    }

    match url::Url::parse(&normalized) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some() => Some(normalized),
            "http" | "https" => {
                warn!("Skipping URL without host: {url}");
                None
            }
            scheme => {
                warn!("Skipping unsupported scheme {scheme} for URL: {url}");
                None
            }
        },
        Err(e) => {
            warn!("Skipping invalid URL {url}: {e}");
            None
        }
    }
}

/// First 50 characters, cut on a char boundary.
fn preview(url: &str) -> &str {
    match url.char_indices().nth(50) {
        Some((index, _)) => &url[..index],
        None => url,
    }
}
