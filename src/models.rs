//! Resolution data model.
//!
//! A `ResolutionAttempt` is the result of one fetch; a `ResolvedOutcome` is the attempt
//! kept as authoritative for a link once rechecks are done.

use serde::Serialize;

/// What one fetch produced.
///
/// Either a response (status and final URL) or a transport failure (message only). A
/// status code and a transport error can never coexist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// A response was received.
    Response {
        /// Final HTTP status after all protocol redirects
        status: u16,
        /// Final URL; replaced by the client-side redirect target when one was found
        final_url: String,
        /// True when `final_url` comes from a meta refresh or script navigation
        client_redirect: bool,
    },
    /// The request failed before any response was received.
    Transport {
        /// Human-readable failure description
        error: String,
    },
}

/// Result of one single-shot resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionAttempt {
    /// URL that was requested
    pub requested_url: String,
    /// What the fetch produced
    pub outcome: AttemptOutcome,
}

impl ResolutionAttempt {
    /// An attempt that received a response.
    pub fn response(
        requested_url: impl Into<String>,
        status: u16,
        final_url: impl Into<String>,
    ) -> Self {
        Self {
            requested_url: requested_url.into(),
            outcome: AttemptOutcome::Response {
                status,
                final_url: final_url.into(),
                client_redirect: false,
            },
        }
    }

    /// An attempt that failed at the transport level.
    pub fn transport(requested_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            requested_url: requested_url.into(),
            outcome: AttemptOutcome::Transport {
                error: error.into(),
            },
        }
    }

    /// Replaces the final URL with a client-side redirect target, keeping the status.
    ///
    /// The target is not fetched: the status stays the one of the page that performed
    /// the redirect. Has no effect on transport failures.
    pub fn with_client_redirect(mut self, target: impl Into<String>) -> Self {
        if let AttemptOutcome::Response {
            final_url,
            client_redirect,
            ..
        } = &mut self.outcome
        {
            *final_url = target.into();
            *client_redirect = true;
        }
        self
    }

    /// HTTP status, `None` for transport failures.
    pub fn status_code(&self) -> Option<u16> {
        match &self.outcome {
            AttemptOutcome::Response { status, .. } => Some(*status),
            AttemptOutcome::Transport { .. } => None,
        }
    }

    /// Transport failure message, `None` when a response was received.
    pub fn transport_error(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Response { .. } => None,
            AttemptOutcome::Transport { error } => Some(error),
        }
    }

    /// Final URL, `None` for transport failures.
    pub fn final_url(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Response { final_url, .. } => Some(final_url),
            AttemptOutcome::Transport { .. } => None,
        }
    }

    /// Host of the final URL, lower-cased.
    pub fn final_host(&self) -> Option<String> {
        self.final_url().and_then(host_of)
    }

    /// True when the final URL came from a client-side redirect.
    pub fn is_client_redirect(&self) -> bool {
        matches!(
            self.outcome,
            AttemptOutcome::Response {
                client_redirect: true,
                ..
            }
        )
    }
}

/// The authoritative attempt for a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOutcome {
    /// Most recent attempt; earlier attempts are discarded
    pub attempt: ResolutionAttempt,
    /// Number of fetches made for the link (at least 1)
    pub attempt_count: u32,
    /// True when the final URL matches the stub registry
    pub is_stub: bool,
}

impl ResolvedOutcome {
    /// HTTP status of the authoritative attempt.
    pub fn status_code(&self) -> Option<u16> {
        self.attempt.status_code()
    }

    /// Transport failure of the authoritative attempt.
    pub fn transport_error(&self) -> Option<&str> {
        self.attempt.transport_error()
    }

    /// Final URL of the authoritative attempt.
    pub fn final_url(&self) -> Option<&str> {
        self.attempt.final_url()
    }
}

/// Lower-cased host of `url` without a trailing dot.
pub(crate) fn host_of(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.trim_end_matches('.').to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_of_status_or_transport_error() {
        let attempts = [
            ResolutionAttempt::response("https://a.example/", 200, "https://a.example/"),
            ResolutionAttempt::response("https://a.example/", 503, "https://b.example/"),
            ResolutionAttempt::transport("https://a.example/", "Timeout: operation timed out"),
            ResolutionAttempt::transport("https://a.example/", ""),
        ];
        for attempt in attempts {
            assert!(
                attempt.status_code().is_some() ^ attempt.transport_error().is_some(),
                "{attempt:?} must carry exactly one of status/transport error"
            );
        }
    }

    #[test]
    fn test_transport_failure_has_no_final_url() {
        let attempt = ResolutionAttempt::transport("https://a.example/", "Connection error");
        assert_eq!(attempt.final_url(), None);
        assert_eq!(attempt.final_host(), None);
    }

    #[test]
    fn test_client_redirect_keeps_status() {
        let attempt = ResolutionAttempt::response("https://a.example/", 200, "https://a.example/")
            .with_client_redirect("https://bankpro.su/x");
        assert_eq!(attempt.status_code(), Some(200));
        assert_eq!(attempt.final_url(), Some("https://bankpro.su/x"));
        assert_eq!(attempt.final_host().as_deref(), Some("bankpro.su"));
        assert!(attempt.is_client_redirect());
    }

    #[test]
    fn test_client_redirect_ignored_for_transport_failure() {
        let attempt = ResolutionAttempt::transport("https://a.example/", "Timeout")
            .with_client_redirect("https://b.example/");
        assert_eq!(attempt.final_url(), None);
        assert!(!attempt.is_client_redirect());
    }

    #[test]
    fn test_host_of_normalizes() {
        assert_eq!(
            host_of("https://WWW.Example.COM./path").as_deref(),
            Some("www.example.com")
        );
        assert_eq!(host_of("not a url"), None);
    }
}
