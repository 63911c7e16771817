//! Connection search between two stations.
//!
//! Unlike autocomplete, a connection search is triggered once per explicit
//! form submission, so no per-request token is needed; a new search still
//! invalidates the previous one by cancelling it.

mod coordinator;
mod types;

pub use coordinator::ConnectionSearch;
pub use types::{ConnectionRecord, Fare, SearchCriteria, parse_connections_response};
