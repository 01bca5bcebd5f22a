//! Room broadcaster.
//!
//! Fans a server event out to every connection grouped into a room,
//! optionally excluding the originator. Sends are fire-and-forget: a
//! closed channel (peer already disconnecting) is logged and skipped,
//! never retried.

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::session::SessionRegistry;

/// Fan-out of serialized events to a room's live connections
#[derive(Clone)]
pub struct RoomBroadcaster {
    registry: Arc<SessionRegistry>,
}

impl RoomBroadcaster {
    /// Create a broadcaster over the given registry
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Send an event to every connection in the room.
    ///
    /// With `exclude` set, the originator is skipped (it already applied
    /// the change locally).
    pub async fn broadcast(
        &self,
        room_id: &RoomId,
        event: &ServerEvent,
        exclude: Option<&ConnectionId>,
    ) {
        let payload = serde_json::to_string(event).unwrap();
        for (connection_id, sender) in self.registry.senders_in_room(room_id).await {
            if Some(&connection_id) == exclude {
                continue;
            }
            if sender.send(payload.clone()).is_err() {
                tracing::warn!(
                    "Failed to send '{}' to connection '{}'",
                    event.name(),
                    connection_id
                );
            }
        }
    }

    /// Send an event to a single connection
    pub async fn send_to(&self, connection_id: &ConnectionId, event: &ServerEvent) {
        let payload = serde_json::to_string(event).unwrap();
        if !self.registry.send_to(connection_id, payload).await {
            tracing::warn!(
                "Failed to send '{}' to connection '{}'",
                event.name(),
                connection_id
            );
        }
    }
}
