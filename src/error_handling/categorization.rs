//! Error categorization and recheck scheduling.

use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};

use super::types::{ErrorType, InventoryError};

/// Creates the retry strategy for inventory API calls.
///
/// Exponential backoff starting at `RETRY_INITIAL_DELAY_MS`, capped at
/// `RETRY_MAX_DELAY_SECS`, at most `RETRY_MAX_ATTEMPTS` retries.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(crate::config::RETRY_MAX_ATTEMPTS)
}

/// Returns true if an inventory call may succeed when repeated.
///
/// Transport failures, 429 and 5xx are transient; API payload errors, decode errors and
/// other statuses are not.
pub fn is_retriable_inventory_error(error: &InventoryError) -> bool {
    match error {
        InventoryError::Transport(e) => !e.is_builder() && !e.is_decode(),
        InventoryError::HttpStatus { status } => *status == 429 || (500..600).contains(status),
        InventoryError::Api { .. } | InventoryError::Decode(_) | InventoryError::Io(_) => false,
    }
}

/// Creates the pause schedule for recheck attempts.
///
/// One fixed `delay` per additional attempt; the iterator yields exactly `attempts`
/// items, so a zero count disables recheck.
pub fn recheck_schedule(delay: Duration, attempts: u32) -> impl Iterator<Item = Duration> {
    FixedInterval::new(delay).take(attempts as usize)
}

/// Categorizes a transport-level `reqwest::Error` into an `ErrorType`.
///
/// The resolver never turns statuses into errors, so only the error kind matters here.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> ErrorType {
    if error.is_builder() {
        ErrorType::HttpRequestBuilderError
    } else if error.is_redirect() {
        ErrorType::HttpRequestRedirectError
    } else if error.is_timeout() {
        ErrorType::HttpRequestTimeoutError
    } else if error.is_connect() {
        ErrorType::HttpRequestConnectError
    } else if error.is_request() {
        ErrorType::HttpRequestRequestError
    } else if error.is_body() {
        ErrorType::HttpRequestBodyError
    } else if error.is_decode() {
        ErrorType::HttpRequestDecodeError
    } else {
        ErrorType::HttpRequestOtherError
    }
}

/// Maps a non-success HTTP status to its `ErrorType`. Returns `None` for 2xx.
pub fn categorize_status(status: u16) -> Option<ErrorType> {
    match status {
        200..=299 => None,
        400 => Some(ErrorType::HttpStatusBadRequest),
        401 => Some(ErrorType::HttpStatusUnauthorized),
        403 => Some(ErrorType::HttpStatusForbidden),
        404 => Some(ErrorType::HttpStatusNotFound),
        429 => Some(ErrorType::HttpStatusTooManyRequests),
        500 => Some(ErrorType::HttpStatusInternalServerError),
        502 => Some(ErrorType::HttpStatusBadGateway),
        503 => Some(ErrorType::HttpStatusServiceUnavailable),
        504 => Some(ErrorType::HttpStatusGatewayTimeout),
        _ => Some(ErrorType::HttpStatusOther),
    }
}

/// Builds a human-readable message for a transport failure.
///
/// Prefixes the category label and appends the source chain (resolver, connector and TLS
/// errors are usually only visible there), skipping causes already contained in the text.
pub fn describe_transport_error(error: &reqwest::Error) -> String {
    let mut message = format!("{}: {}", categorize_reqwest_error(error).as_str(), error);
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
