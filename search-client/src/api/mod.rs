//! HTTP plumbing shared by both search flows.
//!
//! The transport wraps `reqwest` with a cancellation capability: every
//! suspension point races against a [`CancelToken`], and an aborted call
//! resolves to [`ApiError::Cancelled`] rather than settling on its own.

mod cancel;
mod client;
mod error;
mod executor;

pub use cancel::{CancelHandle, CancelToken, cancel_pair};
pub use client::{ApiClient, ApiConfig, check_status};
pub use error::{
    ApiError, FETCH_CONNECTIONS_FAILED, FETCH_STATIONS_FAILED, INVALID_RESPONSE_ARRAY,
    INVALID_RESPONSE_FORMAT, UNKNOWN_ERROR, user_message,
};
pub use executor::{RequestExecutor, RequestPhase};

/// Path of the station autocomplete endpoint.
pub const AUTOCOMPLETE_PATH: &str = "/api/autocomplete";

/// Path of the connection search endpoint.
pub const CONNECTIONS_PATH: &str = "/api/connections";
