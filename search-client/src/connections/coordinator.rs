//! Connection search coordination.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::api::{
    ApiClient, ApiError, CONNECTIONS_PATH, CancelHandle, CancelToken, FETCH_CONNECTIONS_FAILED,
    RequestExecutor, RequestPhase, cancel_pair, check_status, user_message,
};

use super::types::{ConnectionRecord, SearchCriteria, parse_connections_response};

#[derive(Default)]
struct ConnectionState {
    connections: Vec<ConnectionRecord>,
    has_searched: bool,
    in_flight: Option<CancelHandle>,
}

/// Coordinates connection searches.
///
/// A search is triggered once per explicit submission, so unlike
/// autocomplete there is no per-request token: a new search invalidates the
/// previous one by cancelling it, and the cancellation flag is re-checked
/// before any state mutation. On a valid response the result list is
/// replaced wholesale, never merged.
#[derive(Clone)]
pub struct ConnectionSearch {
    client: ApiClient,
    executor: RequestExecutor,
    state: Arc<RwLock<ConnectionState>>,
}

impl ConnectionSearch {
    /// Create a new coordinator over the given transport.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            executor: RequestExecutor::new(),
            state: Arc::new(RwLock::new(ConnectionState::default())),
        }
    }

    /// Search for connections matching the criteria.
    ///
    /// Failures surface through [`error`](Self::error) and leave the
    /// existing result list untouched; a search superseded by a newer one
    /// surfaces nothing and returns `Ok`.
    pub async fn search_connections(&self, criteria: &SearchCriteria) -> Result<(), ApiError> {
        let cancel_token = {
            let mut state = self.state.write().await;
            if let Some(previous) = state.in_flight.take() {
                previous.cancel();
            }
            let (handle, cancel_token) = cancel_pair();
            state.in_flight = Some(handle);
            cancel_token
        };

        let outcome = self
            .executor
            .execute(self.request_connections(criteria, cancel_token.clone()))
            .await;

        match outcome {
            Ok(connections) => {
                let mut state = self.state.write().await;
                if cancel_token.is_cancelled() {
                    debug!("discarding superseded connection response");
                } else {
                    state.connections = connections;
                    state.has_searched = true;
                    state.in_flight = None;
                }
                Ok(())
            }
            Err(error) => {
                let superseded = cancel_token.is_cancelled();
                if !superseded {
                    self.state.write().await.in_flight = None;
                }

                match (!superseded)
                    .then(|| user_message(&error, FETCH_CONNECTIONS_FAILED))
                    .flatten()
                {
                    Some(message) => {
                        self.executor.set_error(message).await;
                        Err(error)
                    }
                    None => {
                        debug!("suppressing superseded connection search failure");
                        self.executor.clear_error().await;
                        Ok(())
                    }
                }
            }
        }
    }

    async fn request_connections(
        &self,
        criteria: &SearchCriteria,
        cancel: CancelToken,
    ) -> Result<Vec<ConnectionRecord>, ApiError> {
        let response = self
            .client
            .post_json(CONNECTIONS_PATH, criteria, &cancel)
            .await?;
        let response = check_status(response)?;
        let body = self.client.read_json(response, &cancel).await?;

        // Cancellation may have arrived while the body decode was suspended.
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let connections = parse_connections_response(body)?;
        Ok(connections)
    }

    /// The current result list.
    pub async fn connections(&self) -> Vec<ConnectionRecord> {
        self.state.read().await.connections.clone()
    }

    /// Whether at least one search has completed successfully.
    pub async fn has_searched(&self) -> bool {
        self.state.read().await.has_searched
    }

    /// Whether a search is currently loading.
    pub async fn is_loading(&self) -> bool {
        self.executor.is_loading().await
    }

    /// The visible error message, if any.
    pub async fn error(&self) -> Option<String> {
        self.executor.error().await
    }

    /// Lifecycle phase of the most recent search.
    pub async fn phase(&self) -> RequestPhase {
        self.executor.phase().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::{Value, json};
    use tokio::time::sleep;

    use crate::api::{ApiConfig, INVALID_RESPONSE_ARRAY, INVALID_RESPONSE_FORMAT};

    use super::*;

    fn connection_json(from: &str, to: &str) -> Value {
        json!({
            "departure_station": from,
            "departure_at": "2026-06-15T08:00:00",
            "arrival_station": to,
            "arrival_at": "2026-06-15T12:30:00",
            "duration_in_minutes": 270,
            "changeovers": 1,
            "products": ["train"],
            "fares": [
                {"name": "Standard", "price_in_cents": 4999, "currency": "EUR", "comfort_class": 2}
            ]
        })
    }

    fn departure() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 6, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn criteria(from: &str, to: &str) -> SearchCriteria {
        SearchCriteria::new(from, to, departure())
    }

    /// Connection endpoint keyed on the `from` field: "Slowville" answers
    /// after a delay, "Boom" answers 502, "Malformed" answers an object,
    /// "BadFare" answers a record with an empty fare list, anything else
    /// echoes one matching connection.
    fn test_router() -> Router {
        Router::new().route(
            "/api/connections",
            post(move |Json(criteria): Json<SearchCriteria>| {
                async move {
                    match criteria.from.as_str() {
                        "Slowville" => {
                            sleep(Duration::from_millis(150)).await;
                            Json(json!([connection_json("Slowville", &criteria.to)]))
                                .into_response()
                        }
                        "Boom" => StatusCode::BAD_GATEWAY.into_response(),
                        "Malformed" => Json(json!({"error": "nope"})).into_response(),
                        "BadFare" => {
                            let mut record = connection_json("BadFare", &criteria.to);
                            record["fares"] = json!([]);
                            Json(json!([record])).into_response()
                        }
                        _ => Json(json!([connection_json(&criteria.from, &criteria.to)]))
                            .into_response(),
                    }
                }
            }),
        )
    }

    async fn spawn_search() -> ConnectionSearch {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = test_router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = ApiClient::new(ApiConfig::new(format!("http://{addr}"))).unwrap();
        ConnectionSearch::new(client)
    }

    #[tokio::test]
    async fn initializes_empty_and_idle() {
        let search = spawn_search().await;
        assert!(search.connections().await.is_empty());
        assert!(!search.has_searched().await);
        assert!(!search.is_loading().await);
        assert_eq!(search.error().await, None);
        assert_eq!(search.phase().await, RequestPhase::Idle);
    }

    #[tokio::test]
    async fn search_replaces_results_and_marks_searched() {
        let search = spawn_search().await;
        search
            .search_connections(&criteria("Vienna", "Berlin"))
            .await
            .unwrap();

        let connections = search.connections().await;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].departure_station, "Vienna");
        assert_eq!(connections[0].arrival_station, "Berlin");
        assert!(search.has_searched().await);
        assert_eq!(search.error().await, None);

        search
            .search_connections(&criteria("Munich", "Paris"))
            .await
            .unwrap();
        let connections = search.connections().await;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].departure_station, "Munich");
    }

    #[tokio::test]
    async fn empty_result_list_is_a_valid_search() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new().route("/api/connections", post(|| async { Json(json!([])) }));
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let client = ApiClient::new(ApiConfig::new(format!("http://{addr}"))).unwrap();
        let search = ConnectionSearch::new(client);

        search
            .search_connections(&criteria("Vienna", "Nowhere"))
            .await
            .unwrap();
        assert!(search.connections().await.is_empty());
        assert!(search.has_searched().await);
        assert_eq!(search.error().await, None);
    }

    #[tokio::test]
    async fn http_error_sets_fixed_message_and_keeps_results() {
        let search = spawn_search().await;
        search
            .search_connections(&criteria("Vienna", "Berlin"))
            .await
            .unwrap();

        let err = search
            .search_connections(&criteria("Boom", "Berlin"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 502 }));
        assert_eq!(
            search.error().await,
            Some(FETCH_CONNECTIONS_FAILED.to_string())
        );

        // Previous results are retained.
        let connections = search.connections().await;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].departure_station, "Vienna");
    }

    #[tokio::test]
    async fn non_array_body_sets_expected_array_message() {
        let search = spawn_search().await;
        search
            .search_connections(&criteria("Vienna", "Berlin"))
            .await
            .unwrap();

        let err = search
            .search_connections(&criteria("Malformed", "Berlin"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(
            search.error().await,
            Some(INVALID_RESPONSE_ARRAY.to_string())
        );

        let connections = search.connections().await;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].departure_station, "Vienna");
    }

    #[tokio::test]
    async fn bounds_violation_sets_format_message() {
        let search = spawn_search().await;
        let err = search
            .search_connections(&criteria("BadFare", "Berlin"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(
            search.error().await,
            Some(INVALID_RESPONSE_FORMAT.to_string())
        );
        assert!(search.connections().await.is_empty());
        assert!(!search.has_searched().await);
    }

    #[tokio::test]
    async fn transport_failure_passes_message_through() {
        let client = ApiClient::new(ApiConfig::new("http://127.0.0.1:1")).unwrap();
        let search = ConnectionSearch::new(client);

        let err = search
            .search_connections(&criteria("Vienna", "Berlin"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Http(_)));

        let message = search.error().await.expect("transport failure surfaces");
        assert!(!message.is_empty());
        assert!(!search.has_searched().await);
    }

    #[tokio::test]
    async fn newer_search_supersedes_older() {
        let search = spawn_search().await;

        let first_criteria = criteria("Slowville", "Berlin");
        let second_criteria = criteria("Vienna", "Berlin");
        let (first, second) = tokio::join!(
            search.search_connections(&first_criteria),
            search.search_connections(&second_criteria),
        );
        first.unwrap();
        second.unwrap();

        let connections = search.connections().await;
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].departure_station, "Vienna");
        assert_eq!(search.error().await, None);
    }
}
