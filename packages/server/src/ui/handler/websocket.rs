//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use terakoya_shared::time::get_jst_timestamp;

use crate::{
    domain::ConnectionIdFactory,
    infrastructure::dto::websocket::ClientEvent,
    ui::{dispatcher::EventDispatcher, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to assign connection id: {}", e);
            return;
        }
    };

    // Create a channel for this connection to receive serialized frames
    let (tx, mut rx) = mpsc::unbounded_channel();
    state
        .registry
        .register(connection_id.clone(), tx, get_jst_timestamp())
        .await;
    tracing::info!("User connected: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let mut dispatcher = EventDispatcher::new(state.clone(), connection_id.clone());

    // Pump inbound events through the dispatcher and outbound frames to
    // the socket from the same loop, so the dispatcher (and its rate
    // limiter) stays owned by this connection's task.
    loop {
        tokio::select! {
            inbound = receiver.next() => {
                let Some(msg) = inbound else { break };
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => dispatcher.dispatch(event).await,
                            Err(e) => {
                                tracing::warn!("Failed to parse client event: {}", e);
                            }
                        }
                    }
                    Message::Close(_) => {
                        tracing::info!("Connection '{}' requested close", connection_id);
                        break;
                    }
                    Message::Ping(_) => {
                        tracing::debug!("Received ping");
                        // Ping/pong is handled automatically by the WebSocket protocol
                    }
                    _ => {}
                }
            }
            outbound = rx.recv() => {
                let Some(payload) = outbound else { break };
                if sender.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    dispatcher.handle_disconnect().await;
    tracing::info!("User disconnected: {}", connection_id);
}
