use std::net::SocketAddr;

use search_client::mock::MockApi;
use tracing_subscriber::EnvFilter;

/// Default port for the mock API server.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Serve fixtures from MOCK_DATA_DIR if set, otherwise the bundled ones.
    let api = match std::env::var("MOCK_DATA_DIR") {
        Ok(dir) => MockApi::from_dir(&dir)
            .unwrap_or_else(|e| panic!("Failed to load mock data from {dir}: {e}")),
        Err(_) => MockApi::sample(),
    };

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("Mock search API listening on http://{addr}");
    tracing::info!("  GET  /health           - Health check");
    tracing::info!("  GET  /api/autocomplete - Station autocomplete (?q=...)");
    tracing::info!("  POST /api/connections  - Connection search");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    axum::serve(listener, api.router())
        .await
        .expect("Server error");
}
