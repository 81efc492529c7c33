//! Error type definitions.
//!
//! This module defines the typed errors of the application boundaries (initialization,
//! configuration, inventory listing) and the error/info categories counted during a run.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Invalid or incomplete configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The Direct API source was selected without credentials.
    #[error("An API token and a client login are required (--token/--client-login or YANDEX_API_TOKEN/YANDEX_CLIENT_LOGIN) unless --input is given")]
    MissingCredentials,

    /// A setting has a value the engine cannot work with.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Failures of the inventory source while listing campaigns or links.
///
/// A failure while listing one campaign's links is recorded as a campaign-level issue;
/// it never aborts the run.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// The request to the inventory API could not be completed.
    #[error("Inventory request failed: {0}")]
    Transport(#[from] ReqwestError),

    /// The inventory API answered with a non-success HTTP status.
    #[error("Inventory API returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
    },

    /// The inventory API reported an error in its payload.
    #[error("API error {code}: {detail}")]
    Api {
        /// API error code
        code: i64,
        /// API error detail
        detail: String,
    },

    /// The inventory payload could not be decoded.
    #[error("Failed to decode inventory payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The inventory file could not be read.
    #[error("Failed to read inventory file: {0}")]
    Io(#[from] std::io::Error),
}

/// Categories of problems counted during a run.
///
/// Transport categories come from `reqwest::Error` kinds; status categories mirror the
/// codes of the status description table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // Transport errors
    HttpRequestBuilderError,
    HttpRequestRedirectError,
    HttpRequestTimeoutError,
    HttpRequestConnectError,
    HttpRequestRequestError,
    HttpRequestBodyError,
    HttpRequestDecodeError,
    HttpRequestOtherError,
    // HTTP status errors
    HttpStatusBadRequest,          // 400
    HttpStatusUnauthorized,        // 401
    HttpStatusForbidden,           // 403
    HttpStatusNotFound,            // 404
    HttpStatusTooManyRequests,     // 429
    HttpStatusInternalServerError, // 500
    HttpStatusBadGateway,          // 502
    HttpStatusServiceUnavailable,  // 503
    HttpStatusGatewayTimeout,      // 504
    HttpStatusOther,
    // Semantic outcomes
    StubDestination,
    // Inventory
    InventoryListingError,
}

/// Informational metrics that are neither errors nor issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// The final URL differs from the requested one after HTTP redirects
    HttpRedirect,
    /// A meta refresh or script navigation target replaced the final URL
    ClientRedirect,
    /// The response was not HTML, so no body was captured
    NonHtmlResponse,
    /// The HTML body exceeded the capture limit
    OversizedBody,
    /// A recheck attempt was performed
    RecheckPerformed,
    /// The recheck produced a different category than the first attempt
    RecheckChangedOutcome,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::HttpRequestBuilderError => "Invalid request URL",
            ErrorType::HttpRequestRedirectError => "Redirect error",
            ErrorType::HttpRequestTimeoutError => "Timeout",
            ErrorType::HttpRequestConnectError => "Connection error",
            ErrorType::HttpRequestRequestError => "Request error",
            ErrorType::HttpRequestBodyError => "Body error",
            ErrorType::HttpRequestDecodeError => "Decode error",
            ErrorType::HttpRequestOtherError => "Transport error",
            ErrorType::HttpStatusBadRequest => "Bad Request (400)",
            ErrorType::HttpStatusUnauthorized => "Unauthorized (401)",
            ErrorType::HttpStatusForbidden => "Forbidden (403)",
            ErrorType::HttpStatusNotFound => "Not Found (404)",
            ErrorType::HttpStatusTooManyRequests => "Too Many Requests (429)",
            ErrorType::HttpStatusInternalServerError => "Internal Server Error (500)",
            ErrorType::HttpStatusBadGateway => "Bad Gateway (502)",
            ErrorType::HttpStatusServiceUnavailable => "Service Unavailable (503)",
            ErrorType::HttpStatusGatewayTimeout => "Gateway Timeout (504)",
            ErrorType::HttpStatusOther => "Other HTTP status",
            ErrorType::StubDestination => "Stub destination",
            ErrorType::InventoryListingError => "Inventory listing error",
        }
    }
}

impl InfoType {
    /// Returns a human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::HttpRedirect => "HTTP redirect",
            InfoType::ClientRedirect => "Client-side redirect",
            InfoType::NonHtmlResponse => "Non-HTML response",
            InfoType::OversizedBody => "Oversized HTML body",
            InfoType::RecheckPerformed => "Recheck attempt",
            InfoType::RecheckChangedOutcome => "Recheck changed outcome",
        }
    }
}
