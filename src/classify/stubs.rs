//! Stub destination registry.
//!
//! Partner networks answer dead offers with a healthy-looking placeholder page. A final
//! URL is a stub when its host is one of the known placeholder hosts, or when host and
//! path prefix match a partner pattern.

use std::collections::HashSet;
use std::sync::LazyLock;

use url::Url;

/// Hosts that only ever serve placeholder pages.
const STUB_HOSTS: &[&str] = &["bankpro.su", "www.bankpro.su"];

/// Partner-network placeholder locations as (host, path prefix).
const PARTNER_PATTERNS: &[(&str, &str)] = &[
    ("pxl.leads.su", "/stub"),
    ("bankiros.ru", "/offer-closed"),
];

static BUILTIN: LazyLock<StubRegistry> = LazyLock::new(|| {
    StubRegistry::new(
        STUB_HOSTS.iter().copied(),
        PARTNER_PATTERNS
            .iter()
            .map(|&(host, prefix)| PartnerPattern::new(host, prefix)),
    )
});

/// A host + path-prefix placeholder location of a partner network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerPattern {
    /// Lower-cased host
    pub host: String,
    /// Path prefix, always starting with `/`
    pub path_prefix: String,
}

impl PartnerPattern {
    /// Creates a pattern; the host is lower-cased and the prefix gets a leading `/`.
    pub fn new(host: &str, path_prefix: &str) -> Self {
        let path_prefix = if path_prefix.starts_with('/') {
            path_prefix.to_string()
        } else {
            format!("/{path_prefix}")
        };
        Self {
            host: normalize_host(host),
            path_prefix,
        }
    }
}

/// Read-only registry of stub destinations.
#[derive(Debug, Clone, Default)]
pub struct StubRegistry {
    hosts: HashSet<String>,
    partner_patterns: Vec<PartnerPattern>,
}

impl StubRegistry {
    /// Builds a registry from exact hosts and partner patterns.
    pub fn new<H, S>(hosts: H, partner_patterns: impl IntoIterator<Item = PartnerPattern>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| normalize_host(h.as_ref()))
                .collect(),
            partner_patterns: partner_patterns.into_iter().collect(),
        }
    }

    /// The registry compiled into the binary, loaded once per process.
    pub fn builtin() -> &'static StubRegistry {
        &BUILTIN
    }

    /// Returns true if `url` is a known stub destination.
    ///
    /// Unparsable URLs and URLs without a host never match.
    pub fn matches(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str().map(normalize_host) else {
            return false;
        };
        if self.hosts.contains(&host) {
            return true;
        }
        self.partner_patterns
            .iter()
            .any(|p| p.host == host && parsed.path().starts_with(&p.path_prefix))
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}
