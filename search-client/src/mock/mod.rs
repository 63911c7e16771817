//! Mock search API for development and testing.
//!
//! Serves the two endpoints the client depends on from fixture data, so the
//! full search flow can be exercised without a real upstream.

mod server;

pub use server::{MockApi, MockDataError};
