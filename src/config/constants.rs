//! Configuration constants.
//!
//! This module defines the defaults and limits used throughout the application:
//! timeouts, recheck policy, body size limits and the browser-like request headers.

/// Progress logging interval in seconds
pub const LOGGING_INTERVAL: u64 = 5;

/// Default maximum number of links resolved concurrently
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

/// Default per-fetch timeout in seconds.
///
/// Applied independently to every attempt (initial fetch and each recheck), covering
/// connect, TLS, every redirect hop and the body read.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default pause before a recheck attempt, in seconds
pub const DEFAULT_RECHECK_DELAY_SECS: u64 = 5;

/// Default number of recheck attempts (0 = recheck disabled)
pub const DEFAULT_RECHECK_ATTEMPTS: u32 = 0;

/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for HTTP requests.
///
/// Some landing pages serve a different page (or block the request) when the client does
/// not look like a browser. Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Accept header sent with every landing-page request
pub const DEFAULT_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Accept-Language header sent with every landing-page request
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

// Response and body size limits
/// Maximum HTML body size in bytes (2MB).
/// Larger bodies are dropped and client-side redirect detection is skipped.
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

// Redirect handling
/// Maximum number of HTTP redirect hops the transport follows before giving up
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Maximum URL length accepted by normalization
pub const MAX_URL_LENGTH: usize = 2048;

// Inventory source
/// Yandex Direct API v5 JSON endpoint
pub const DEFAULT_API_URL: &str = "https://api.direct.yandex.com/json/v5";
/// Language for API error messages
pub const DEFAULT_API_LANGUAGE: &str = "ru";
/// Page size used when listing ads
pub const ADS_PAGE_LIMIT: u64 = 10_000;

// Reporting
/// Default text report path
pub const DEFAULT_OUTPUT_FILE: &str = "results.txt";

// Inventory API retry strategy
/// Initial delay before the first API retry, in milliseconds
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Backoff multiplier
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between API retries, in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 15;
/// Maximum number of API retries after the initial call
pub const RETRY_MAX_ATTEMPTS: usize = 3;
