//! Meta refresh tag scanning.

use regex::Regex;
use std::sync::LazyLock;

use super::compile_regex_unsafe;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(r"(?is)<meta\b([^>]*)>", "META_TAG"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r#"(?is)([a-z][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
        "ATTRIBUTE",
    )
});

// "<delay>; url=<target>", every part optional
static REFRESH_CONTENT: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"(?is)^\s*[0-9]*(?:\.[0-9]*)?\s*[;,]?\s*(?:url\s*=\s*)?(.*)$",
        "REFRESH_CONTENT",
    )
});

/// Returns the raw target of the first `<meta http-equiv="refresh">` tag.
///
/// Only the first refresh tag is considered. `Some("")` means the tag exists but carries
/// no URL (e.g. `content="5"` or `content=""`); the caller treats that as a non-match.
pub(super) fn first_refresh_target(html: &str) -> Option<String> {
    for tag in META_TAG.captures_iter(html) {
        let Some(attrs) = tag.get(1) else {
            continue;
        };

        let mut is_refresh = false;
        let mut content: Option<&str> = None;
        for attr in ATTRIBUTE.captures_iter(attrs.as_str()) {
            let Some(name) = attr.get(1) else {
                continue;
            };
            let value = attr
                .get(2)
                .or_else(|| attr.get(3))
                .or_else(|| attr.get(4))
                .map(|m| m.as_str())
                .unwrap_or("");
            if name.as_str().eq_ignore_ascii_case("http-equiv") {
                is_refresh = value.trim().eq_ignore_ascii_case("refresh");
            } else if name.as_str().eq_ignore_ascii_case("content") {
                content = Some(value);
            }
        }

        if is_refresh {
            return Some(content.map(refresh_url).unwrap_or_default());
        }
    }
    None
}

/// Extracts the URL part of a refresh `content` value.
fn refresh_url(content: &str) -> String {
    let content = content.replace("&amp;", "&");
    let target = REFRESH_CONTENT
        .captures(&content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");
    target
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}
