//! HTTP status descriptions used in issue reports.

/// Human description of common failure statuses; unknown codes have none.
pub fn status_description(status: u16) -> Option<&'static str> {
    match status {
        400 => Some("bad request"),
        401 => Some("authorization required"),
        403 => Some("access forbidden"),
        404 => Some("page not found"),
        429 => Some("too many requests"),
        500 => Some("internal server error"),
        502 => Some("bad gateway"),
        503 => Some("service unavailable"),
        504 => Some("gateway timeout"),
        _ => None,
    }
}
