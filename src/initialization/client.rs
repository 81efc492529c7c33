//! HTTP client initialization.
//!
//! Two clients: one for landing pages (browser User-Agent, redirects followed up to
//! `MAX_REDIRECT_HOPS`) and one for the inventory API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS, TCP_CONNECT_TIMEOUT_SECS};

/// Timeout for a single inventory API call.
const API_TIMEOUT_SECS: u64 = 60;

/// Initializes the landing-page client.
///
/// Configured with:
/// - User-Agent from config
/// - Redirect following (up to `MAX_REDIRECT_HOPS`)
/// - Connect timeout capped by the per-request timeout
///
/// The overall request timeout is applied per request by the resolver.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let connect_timeout = TCP_CONNECT_TIMEOUT_SECS.min(config.timeout_seconds.max(1));
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .connect_timeout(Duration::from_secs(connect_timeout))
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the inventory API client.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_api_client() -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(Duration::from_secs(API_TIMEOUT_SECS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(Arc::new(client))
}
