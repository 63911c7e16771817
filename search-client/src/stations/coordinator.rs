//! Station autocomplete coordination.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::api::{
    ApiClient, ApiError, AUTOCOMPLETE_PATH, CancelHandle, CancelToken, FETCH_STATIONS_FAILED,
    RequestExecutor, RequestPhase, cancel_pair, check_status, user_message,
};
use crate::query::SearchQuery;

use super::types::{StationRecord, parse_station_response};

/// The authoritative in-flight request, if any.
struct InFlight {
    token: u64,
    cancel: CancelHandle,
}

#[derive(Default)]
struct SearchState {
    results: Vec<StationRecord>,
    in_flight: Option<InFlight>,
    next_token: u64,
}

/// Coordinates station autocomplete requests.
///
/// Exactly one request is authoritative at a time. Issuing a new query
/// cancels any in-flight request unconditionally, even for an identical
/// query, and tags the new request with a fresh token. A response only
/// mutates the result list while its token is still the current one;
/// responses and failures of superseded requests are discarded silently.
/// The most recently *issued* request therefore always wins, regardless of
/// the order in which responses arrive.
#[derive(Clone)]
pub struct StationSearch {
    client: ApiClient,
    executor: RequestExecutor,
    state: Arc<RwLock<SearchState>>,
}

impl StationSearch {
    /// Create a new coordinator over the given transport.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            executor: RequestExecutor::new(),
            state: Arc::new(RwLock::new(SearchState::default())),
        }
    }

    /// Fetch station suggestions for raw user input.
    ///
    /// Input that sanitizes to nothing clears the results and cancels any
    /// in-flight request without touching the network. Failures of the
    /// authoritative request surface through [`error`](Self::error);
    /// cancelled or superseded requests surface nothing and return `Ok`.
    pub async fn fetch_stations(&self, raw_query: &str) -> Result<(), ApiError> {
        let Some(query) = SearchQuery::sanitize(raw_query) else {
            {
                let mut state = self.state.write().await;
                state.results.clear();
                if let Some(flight) = state.in_flight.take() {
                    flight.cancel.cancel();
                }
            }
            self.executor.reset().await;
            return Ok(());
        };

        // Supersede whatever is in flight, identical query or not, and
        // record the new request as the authoritative one.
        let (token, cancel_token) = {
            let mut state = self.state.write().await;
            if let Some(previous) = state.in_flight.take() {
                previous.cancel.cancel();
            }
            state.next_token += 1;
            let token = state.next_token;
            let (handle, cancel_token) = cancel_pair();
            state.in_flight = Some(InFlight {
                token,
                cancel: handle,
            });
            (token, cancel_token)
        };

        let outcome = self
            .executor
            .execute(self.request_stations(&query, token, cancel_token))
            .await;

        match outcome {
            Ok(stations) => {
                let mut state = self.state.write().await;
                if current(&state, token) {
                    state.in_flight = None;
                    state.results = stations;
                } else {
                    debug!(token, query = query.as_str(), "discarding stale station response");
                }
                Ok(())
            }
            Err(error) => {
                let was_current = {
                    let mut state = self.state.write().await;
                    let was_current = current(&state, token);
                    if was_current {
                        state.in_flight = None;
                    }
                    was_current
                };

                match was_current.then(|| user_message(&error, FETCH_STATIONS_FAILED)).flatten() {
                    Some(message) => {
                        self.executor.set_error(message).await;
                        Err(error)
                    }
                    None => {
                        // Cancelled, or a stale failure that must not clobber
                        // the state of a newer request.
                        debug!(token, "suppressing superseded station request failure");
                        self.executor.clear_error().await;
                        Ok(())
                    }
                }
            }
        }
    }

    async fn request_stations(
        &self,
        query: &SearchQuery,
        token: u64,
        cancel: CancelToken,
    ) -> Result<Vec<StationRecord>, ApiError> {
        let response = self
            .client
            .get(AUTOCOMPLETE_PATH, &[("q", query.as_str())], &cancel)
            .await?;
        let response = check_status(response)?;

        // A newer request may have been issued while the transport call was
        // suspended; don't pay for the body decode on its behalf.
        if !self.is_current(token).await {
            return Err(ApiError::Cancelled);
        }

        let body = self.client.read_json(response, &cancel).await?;
        let stations = parse_station_response(body)?;
        Ok(stations)
    }

    async fn is_current(&self, token: u64) -> bool {
        current(&*self.state.read().await, token)
    }

    /// The current result list.
    pub async fn results(&self) -> Vec<StationRecord> {
        self.state.read().await.results.clone()
    }

    /// Whether a request is currently loading.
    pub async fn is_loading(&self) -> bool {
        self.executor.is_loading().await
    }

    /// The visible error message, if any.
    pub async fn error(&self) -> Option<String> {
        self.executor.error().await
    }

    /// Lifecycle phase of the most recent request.
    pub async fn phase(&self) -> RequestPhase {
        self.executor.phase().await
    }
}

fn current(state: &SearchState, token: u64) -> bool {
    matches!(&state.in_flight, Some(flight) if flight.token == token)
}
