//! Transit connection search client.
//!
//! A client library for a travel-connection search service: autocomplete
//! station names and search for connections between two stations at a given
//! departure time. The interesting part is the request coordination: every
//! keystroke may supersede an in-flight autocomplete request, so the search
//! types track an authoritative request token, cancel superseded calls, and
//! discard stale responses instead of letting them clobber newer state.

pub mod api;
pub mod connections;
pub mod mock;
pub mod query;
pub mod stations;
pub mod validate;
