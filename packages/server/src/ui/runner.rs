//! Server runner: router assembly, bind and serve.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::domain::RoomRepository;
use crate::infrastructure::repository::InMemoryRoomRepository;

use super::{
    handler::{create_room, get_room_detail, health_check, join_room, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Errors that can bring the server down
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// I/O failure while serving
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Listen address configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Build the application router over the given state
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/rooms/create", post(create_room))
        .route("/api/rooms/join", post(join_room))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server with the default in-memory repository
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    run_with_repository(config, Arc::new(InMemoryRoomRepository::new())).await
}

/// Run the server over an externally provided repository implementation
pub async fn run_with_repository(
    config: ServerConfig,
    repository: Arc<dyn RoomRepository>,
) -> Result<(), ServerError> {
    let state = Arc::new(AppState::new(repository));
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
