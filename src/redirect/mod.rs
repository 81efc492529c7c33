//! Client-side redirect detection.
//!
//! Finds the navigation target a browser would follow from an HTML document: a meta
//! refresh tag or an inline script assignment/call. This is plain text matching over the
//! first document returned; no script is executed and no DOM is built.
//!
//! Rules are evaluated in a fixed order and the first rule that yields a non-empty target
//! wins. A rule whose first match carries an empty target is skipped as a whole.

mod meta;

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Extracts a client-side navigation target from an HTML document.
///
/// Implementations must be pure text operations (no network access), so a stricter
/// parser can replace the default one without touching callers.
pub trait RedirectExtractor: Send + Sync {
    /// Returns the absolute navigation target, resolved against `base_url`.
    fn extract(&self, html: &str, base_url: &str) -> Option<String>;
}

/// Compiles a static regex pattern, panicking with a detailed error message if it is
/// invalid. Only used for compile-time constant patterns.
fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

static LOCATION_HREF: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r#"(?i)location\.href\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        "LOCATION_HREF",
    )
});

static WINDOW_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r#"(?i)window\.location\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        "WINDOW_LOCATION",
    )
});

static LOCATION_REPLACE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r#"(?i)location\.replace\s*\(\s*(?:"([^"]*)"|'([^']*)')\s*\)"#,
        "LOCATION_REPLACE",
    )
});

/// The extraction rules, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectRule {
    /// `<meta http-equiv="refresh" content="N; url=...">`
    MetaRefresh,
    /// `location.href = "..."`
    LocationHref,
    /// `window.location = "..."`
    WindowLocation,
    /// `location.replace("...")`
    LocationReplace,
}

impl RedirectRule {
    /// All rules, highest priority first.
    pub const ORDER: [RedirectRule; 4] = [
        RedirectRule::MetaRefresh,
        RedirectRule::LocationHref,
        RedirectRule::WindowLocation,
        RedirectRule::LocationReplace,
    ];

    /// Returns the raw target of this rule's first match in `html`.
    fn first_capture(self, html: &str) -> Option<String> {
        let regex = match self {
            RedirectRule::MetaRefresh => return meta::first_refresh_target(html),
            RedirectRule::LocationHref => &*LOCATION_HREF,
            RedirectRule::WindowLocation => &*WINDOW_LOCATION,
            RedirectRule::LocationReplace => &*LOCATION_REPLACE,
        };
        regex
            .captures(html)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
    }
}

/// Regex-based extractor implementing the four rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl PatternMatcher {
    /// Returns the winning rule together with the resolved target.
    pub fn extract_with_rule(&self, html: &str, base_url: &str) -> Option<(RedirectRule, String)> {
        if html.trim().is_empty() {
            return None;
        }
        RedirectRule::ORDER.iter().find_map(|&rule| {
            let raw = rule.first_capture(html)?;
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            resolve_target(raw, base_url).map(|target| (rule, target))
        })
    }
}

impl RedirectExtractor for PatternMatcher {
    fn extract(&self, html: &str, base_url: &str) -> Option<String> {
        self.extract_with_rule(html, base_url)
            .map(|(_, target)| target)
    }
}

/// Finds the client-side redirect target of `html` fetched from `base_url`.
///
/// Returns `None` for empty HTML or when no rule yields a usable target.
pub fn extract_redirect_target(html: &str, base_url: &str) -> Option<String> {
    PatternMatcher.extract(html, base_url)
}

/// Resolves a captured target against the page URL.
///
/// Targets that do not end up as http(s) URLs (`javascript:`, `mailto:`, unparsable)
/// are not navigations the engine can follow and count as a non-match.
fn resolve_target(raw: &str, base_url: &str) -> Option<String> {
    let resolved = match Url::parse(base_url) {
        Ok(base) => base.join(raw).ok()?,
        Err(_) => Url::parse(raw).ok()?,
    };
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
