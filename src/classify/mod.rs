//! Outcome classification.
//!
//! Maps a resolution attempt to exactly one semantic category. Stub detection runs
//! before the success check: affiliate networks answer dead offers with a 2xx page, so a
//! 2xx response landing on a stub destination is a `Stub`, never `Ok`.

mod status;
mod stubs;

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

use crate::models::ResolutionAttempt;

pub use status::status_description;
pub use stubs::{PartnerPattern, StubRegistry};

/// Fallback message for transport failures without details.
const NO_DETAILS: &str = "no details";

/// Semantic outcome of a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Classification {
    /// Healthy landing page (2xx, not a stub)
    Ok,
    /// Placeholder page of a partner network
    Stub,
    /// HTTP 404
    NotFound,
    /// Any other non-2xx status
    OtherHttpError(u16),
    /// No response at all
    TransportError(String),
}

/// Issue categories, in report order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, EnumIterMacro,
)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// Stub destinations
    Stub,
    /// 404 pages
    NotFound,
    /// Other HTTP errors
    HttpError,
    /// Unreachable destinations
    TransportError,
}

impl IssueCategory {
    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Stub => "Stub destinations",
            IssueCategory::NotFound => "Pages not found (404)",
            IssueCategory::HttpError => "HTTP errors",
            IssueCategory::TransportError => "Unreachable links",
        }
    }
}

impl Classification {
    /// True for healthy links.
    pub fn is_ok(&self) -> bool {
        matches!(self, Classification::Ok)
    }

    /// Issue category; `None` for `Ok`.
    pub fn category(&self) -> Option<IssueCategory> {
        match self {
            Classification::Ok => None,
            Classification::Stub => Some(IssueCategory::Stub),
            Classification::NotFound => Some(IssueCategory::NotFound),
            Classification::OtherHttpError(_) => Some(IssueCategory::HttpError),
            Classification::TransportError(_) => Some(IssueCategory::TransportError),
        }
    }

    /// Human description attached to issues.
    ///
    /// HTTP errors use the status table, so unknown codes have no description.
    pub fn description(&self) -> Option<String> {
        match self {
            Classification::Ok => None,
            Classification::Stub => {
                Some("placeholder page of a partner network".to_string())
            }
            Classification::NotFound => status_description(404).map(str::to_string),
            Classification::OtherHttpError(code) => status_description(*code).map(str::to_string),
            Classification::TransportError(message) => Some(message.clone()),
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Ok => f.write_str("OK"),
            Classification::Stub => f.write_str("stub destination"),
            Classification::NotFound => f.write_str("HTTP 404"),
            Classification::OtherHttpError(code) => write!(f, "HTTP {code}"),
            Classification::TransportError(message) => write!(f, "request failed: {message}"),
        }
    }
}

/// Classifies a resolution attempt. The first matching rule wins:
///
/// 1. final URL in the stub registry → `Stub`
/// 2. status in `[200, 300)` → `Ok`
/// 3. status 404 → `NotFound`
/// 4. any other status → `OtherHttpError(status)`
/// 5. no status → `TransportError(message or "no details")`
pub fn classify(attempt: &ResolutionAttempt, stubs: &StubRegistry) -> Classification {
    if attempt.final_url().is_some_and(|url| stubs.matches(url)) {
        return Classification::Stub;
    }
    match attempt.status_code() {
        Some(status) if (200..300).contains(&status) => Classification::Ok,
        Some(404) => Classification::NotFound,
        Some(status) => Classification::OtherHttpError(status),
        None => {
            let message = attempt
                .transport_error()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(NO_DETAILS);
            Classification::TransportError(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static StubRegistry {
        StubRegistry::builtin()
    }

    #[test]
    fn test_stub_precedes_success() {
        let attempt = ResolutionAttempt::response("https://ad.example/", 200, "https://bankpro.su/x");
        assert_eq!(classify(&attempt, registry()), Classification::Stub);
    }

    #[test]
    fn test_stub_precedes_error_status() {
        let attempt = ResolutionAttempt::response("https://ad.example/", 503, "https://bankpro.su/x");
        assert_eq!(classify(&attempt, registry()), Classification::Stub);
    }

    #[test]
    fn test_client_redirect_to_stub() {
        let attempt = ResolutionAttempt::response("https://ad.example/", 200, "https://ad.example/")
            .with_client_redirect("https://www.bankpro.su/offer");
        assert_eq!(classify(&attempt, registry()), Classification::Stub);
    }

    #[test]
    fn test_success_range() {
        for status in [200, 204, 299] {
            let attempt = ResolutionAttempt::response("https://a.example/", status, "https://a.example/");
            assert_eq!(classify(&attempt, registry()), Classification::Ok);
        }
    }

    #[test]
    fn test_not_found() {
        let attempt = ResolutionAttempt::response("https://a.example/", 404, "https://a.example/gone");
        let classification = classify(&attempt, registry());
        assert_eq!(classification, Classification::NotFound);
        assert_eq!(classification.description().as_deref(), Some("page not found"));
        assert_eq!(classification.category(), Some(IssueCategory::NotFound));
    }

    #[test]
    fn test_other_http_errors() {
        let attempt = ResolutionAttempt::response("https://a.example/", 503, "https://a.example/");
        let classification = classify(&attempt, registry());
        assert_eq!(classification, Classification::OtherHttpError(503));
        assert_eq!(
            classification.description().as_deref(),
            Some("service unavailable")
        );

        let attempt = ResolutionAttempt::response("https://a.example/", 418, "https://a.example/");
        let classification = classify(&attempt, registry());
        assert_eq!(classification, Classification::OtherHttpError(418));
        assert_eq!(classification.description(), None);

        // Unfollowed redirect statuses are not success
        let attempt = ResolutionAttempt::response("https://a.example/", 302, "https://a.example/");
        assert_eq!(
            classify(&attempt, registry()),
            Classification::OtherHttpError(302)
        );
    }

    #[test]
    fn test_transport_error_message() {
        let attempt = ResolutionAttempt::transport("https://a.example/", "Timeout: operation timed out");
        assert_eq!(
            classify(&attempt, registry()),
            Classification::TransportError("Timeout: operation timed out".to_string())
        );

        let attempt = ResolutionAttempt::transport("https://a.example/", "  ");
        assert_eq!(
            classify(&attempt, registry()),
            Classification::TransportError("no details".to_string())
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let attempts = [
            ResolutionAttempt::response("https://a.example/", 200, "https://a.example/"),
            ResolutionAttempt::response("https://a.example/", 200, "https://bankpro.su/"),
            ResolutionAttempt::response("https://a.example/", 404, "https://a.example/"),
            ResolutionAttempt::response("https://a.example/", 500, "https://a.example/"),
            ResolutionAttempt::transport("https://a.example/", "Connection error"),
        ];
        for attempt in &attempts {
            let first = classify(attempt, registry());
            let second = classify(attempt, registry());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_ok_has_no_category_or_description() {
        assert!(Classification::Ok.is_ok());
        assert_eq!(Classification::Ok.category(), None);
        assert_eq!(Classification::Ok.description(), None);
    }

    #[test]
    fn test_category_order() {
        assert!(IssueCategory::Stub < IssueCategory::NotFound);
        assert!(IssueCategory::HttpError < IssueCategory::TransportError);
    }

    #[test]
    fn test_display() {
        assert_eq!(Classification::OtherHttpError(502).to_string(), "HTTP 502");
        assert_eq!(Classification::NotFound.to_string(), "HTTP 404");
    }
}
