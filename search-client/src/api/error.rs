//! Request error taxonomy and user-facing message mapping.

use crate::validate::ValidationError;

/// Fixed message shown when the station autocomplete request fails with a
/// non-success status.
pub const FETCH_STATIONS_FAILED: &str = "Failed to fetch stations";

/// Fixed message shown when the connection search request fails with a
/// non-success status.
pub const FETCH_CONNECTIONS_FAILED: &str = "Failed to fetch connections";

/// Message shown when a response body does not match the expected shape.
pub const INVALID_RESPONSE_FORMAT: &str = "Invalid response format";

/// Message shown when a connection response is not a JSON array.
pub const INVALID_RESPONSE_ARRAY: &str = "Invalid response format: expected array";

/// Fallback message for failures that carry no message of their own.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Errors from issuing a search request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: connection refused, timeout, or an
    /// undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("request failed with status {status}")]
    Status { status: u16 },

    /// The response decoded but did not match the endpoint's schema.
    #[error("invalid response format: {0}")]
    Validation(#[from] ValidationError),

    /// The request was aborted because a newer one superseded it.
    #[error("request cancelled")]
    Cancelled,
}

/// Map a failure to the message shown to the user.
///
/// Returns `None` when the failure must be suppressed entirely: a cancelled
/// request is not an error from the user's point of view. Status failures
/// collapse to the endpoint's fixed `fetch_failed` text, validation failures
/// to the fixed format messages, and anything else passes the underlying
/// message through.
pub fn user_message(error: &ApiError, fetch_failed: &str) -> Option<String> {
    match error {
        ApiError::Cancelled => None,
        ApiError::Status { .. } => Some(fetch_failed.to_string()),
        ApiError::Validation(ValidationError::ExpectedArray) => {
            Some(INVALID_RESPONSE_ARRAY.to_string())
        }
        ApiError::Validation(_) => Some(INVALID_RESPONSE_FORMAT.to_string()),
        ApiError::Http(source) => {
            let message = source.to_string();
            if message.is_empty() {
                Some(UNKNOWN_ERROR.to_string())
            } else {
                Some(message)
            }
        }
    }
}
