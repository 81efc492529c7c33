//! Single-shot resolution.
//!
//! One GET with the transport's own redirect following. The final status and URL are
//! captured; for HTML responses the body is read (bounded) and scanned for a client-side
//! redirect.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::error_handling::{
    categorize_reqwest_error, describe_transport_error, InfoType, ProcessingStats,
};
use crate::models::ResolutionAttempt;
use crate::redirect::{PatternMatcher, RedirectExtractor};

use super::request::{is_html_content_type, RequestHeaders};

/// Performs one resolution of a URL.
///
/// Implementations never fail: transport problems are part of the returned attempt.
#[async_trait]
pub trait ResolveOnce: Send + Sync {
    /// Resolves `url` once, applying `timeout` to the whole fetch.
    async fn resolve_once(&self, url: &str, timeout: Duration) -> ResolutionAttempt;
}

/// HTTP implementation of [`ResolveOnce`].
pub struct HttpResolver {
    client: Arc<reqwest::Client>,
    extractor: Arc<dyn RedirectExtractor>,
    stats: Arc<ProcessingStats>,
}

impl HttpResolver {
    /// Creates a resolver using the regex [`PatternMatcher`].
    ///
    /// `client` must follow redirects (see `init_client`).
    pub fn new(client: Arc<reqwest::Client>, stats: Arc<ProcessingStats>) -> Self {
        Self::with_extractor(client, Arc::new(PatternMatcher), stats)
    }

    /// Creates a resolver with a custom client-side redirect extractor.
    pub fn with_extractor(
        client: Arc<reqwest::Client>,
        extractor: Arc<dyn RedirectExtractor>,
        stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            client,
            extractor,
            stats,
        }
    }

    /// Reads an HTML body, giving up past `MAX_RESPONSE_BODY_SIZE`.
    async fn read_html_body(&self, mut response: reqwest::Response) -> Option<String> {
        let final_url = response.url().to_string();
        if response
            .content_length()
            .is_some_and(|len| len > MAX_RESPONSE_BODY_SIZE as u64)
        {
            debug!("Skipping oversized body for {final_url}");
            self.stats.increment_info(InfoType::OversizedBody);
            return None;
        }

        let mut body = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    if body.len() + chunk.len() > MAX_RESPONSE_BODY_SIZE {
                        debug!("Body of {final_url} exceeds {MAX_RESPONSE_BODY_SIZE} bytes, skipping");
                        self.stats.increment_info(InfoType::OversizedBody);
                        return None;
                    }
                    body.extend_from_slice(&chunk);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read response body for {final_url}: {e}");
                    return None;
                }
            }
        }
        Some(String::from_utf8_lossy(&body).into_owned())
    }
}

#[async_trait]
impl ResolveOnce for HttpResolver {
    async fn resolve_once(&self, url: &str, timeout: Duration) -> ResolutionAttempt {
        debug!("Resolving {url}");
        let request = RequestHeaders::apply_to_request_builder(self.client.get(url)).timeout(timeout);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.stats.increment_error(categorize_reqwest_error(&e));
                let message = describe_transport_error(&e);
                debug!("Transport failure for {url}: {message}");
                return ResolutionAttempt::transport(url, message);
            }
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        if !same_url(url, &final_url) {
            debug!("{url} redirected to {final_url}");
            self.stats.increment_info(InfoType::HttpRedirect);
        }

        if !is_html_content_type(response.headers()) {
            // Dropping the response discards the body unread
            self.stats.increment_info(InfoType::NonHtmlResponse);
            return ResolutionAttempt::response(url, status, final_url);
        }

        let body = self.read_html_body(response).await;
        let attempt = ResolutionAttempt::response(url, status, final_url.as_str());
        if status != 200 {
            return attempt;
        }

        match body.and_then(|html| self.extractor.extract(&html, &final_url)) {
            Some(target) => {
                debug!("Client-side redirect on {final_url} to {target}");
                self.stats.increment_info(InfoType::ClientRedirect);
                attempt.with_client_redirect(target)
            }
            None => attempt,
        }
    }
}

/// Compares URLs after parsing, so `https://a.example` equals `https://a.example/`.
fn same_url(a: &str, b: &str) -> bool {
    match (url::Url::parse(a), url::Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
