//! Browser-like request headers.

use crate::config::{DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE};

/// Request headers applied to every landing-page fetch.
///
/// Some destinations serve different content, or block the request, when the client does
/// not look like an ordinary browser. The User-Agent is set on the client itself.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    /// Applies the standard request headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
    ) -> reqwest::RequestBuilder {
        builder
            .header(reqwest::header::ACCEPT, DEFAULT_ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, DEFAULT_ACCEPT_LANGUAGE)
            .header(reqwest::header::UPGRADE_INSECURE_REQUESTS, "1")
    }
}

/// Returns true if the Content-Type header denotes an HTML document.
///
/// A missing header is not HTML: the body is never read without a positive signal.
pub(crate) fn is_html_content_type(headers: &reqwest::header::HeaderMap) -> bool {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml+xml")
        })
        .unwrap_or(false)
}
