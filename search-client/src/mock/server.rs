//! Mock API server.
//!
//! Serves station and connection fixtures over the same wire contracts as
//! the real service: `GET /api/autocomplete?q=` answering
//! `{ searchLocations: [...] }` and `POST /api/connections` answering an
//! array of connection records filtered by the submitted criteria.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::connections::{ConnectionRecord, SearchCriteria};
use crate::stations::{StationRecord, StationResponse};

/// Errors loading mock fixture data.
#[derive(Debug, thiserror::Error)]
pub enum MockDataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Mock search API backed by in-memory fixtures.
#[derive(Debug, Clone)]
pub struct MockApi {
    stations: Vec<StationRecord>,
    connections: Vec<ConnectionRecord>,
}

impl MockApi {
    /// Create a mock API over the given fixtures.
    pub fn new(stations: Vec<StationRecord>, connections: Vec<ConnectionRecord>) -> Self {
        Self {
            stations,
            connections,
        }
    }

    /// Load fixtures from a directory containing `autocomplete.json`
    /// (shaped like the autocomplete response) and `connections.json`
    /// (an array of connection records).
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, MockDataError> {
        let data_dir = data_dir.as_ref();

        let stations: StationResponse = load_json(&data_dir.join("autocomplete.json"))?;
        let connections: Vec<ConnectionRecord> = load_json(&data_dir.join("connections.json"))?;

        Ok(Self::new(stations.search_locations, connections))
    }

    /// Mock API over the fixtures bundled with the crate.
    pub fn sample() -> Self {
        let stations: StationResponse =
            serde_json::from_str(include_str!("../../data/mock/autocomplete.json"))
                .expect("bundled autocomplete fixtures are valid");
        let connections: Vec<ConnectionRecord> =
            serde_json::from_str(include_str!("../../data/mock/connections.json"))
                .expect("bundled connection fixtures are valid");

        Self::new(stations.search_locations, connections)
    }

    /// Build the axum router serving the mock endpoints.
    pub fn router(self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/api/autocomplete", get(autocomplete))
            .route("/api/connections", post(connections))
            .with_state(Arc::new(self))
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, MockDataError> {
    let text = std::fs::read_to_string(path).map_err(|source| MockDataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| MockDataError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct AutocompleteParams {
    q: Option<String>,
}

/// Case-insensitive substring match over station and translated names.
/// An empty or missing query matches nothing.
async fn autocomplete(
    State(api): State<Arc<MockApi>>,
    Query(params): Query<AutocompleteParams>,
) -> Json<StationResponse> {
    let query = normalize(params.q.as_deref().unwrap_or(""));

    let matches = if query.is_empty() {
        Vec::new()
    } else {
        api.stations
            .iter()
            .filter(|station| {
                normalize(&station.name).contains(&query)
                    || normalize(&station.translated_name).contains(&query)
            })
            .cloned()
            .collect()
    };

    Json(StationResponse {
        search_locations: matches,
    })
}

/// Filter fixture connections by the submitted criteria.
async fn connections(
    State(api): State<Arc<MockApi>>,
    Json(criteria): Json<SearchCriteria>,
) -> Json<Vec<ConnectionRecord>> {
    let from = normalize(&criteria.from);
    let to = normalize(&criteria.to);

    let matches = api
        .connections
        .iter()
        .filter(|connection| {
            normalize(&connection.departure_station) == from
                && normalize(&connection.arrival_station) == to
                && connection.departure_at >= criteria.departure_at
                && criteria
                    .max_changeovers
                    .is_none_or(|max| connection.changeovers <= max)
                && (!criteria.only_direct.unwrap_or(false) || connection.changeovers == 0)
        })
        .cloned()
        .collect();

    Json(matches)
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
