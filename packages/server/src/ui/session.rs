//! In-memory session registry.
//!
//! Source of truth for "who is connected right now", independent of the
//! persisted `Room.participants` roster (which can lag or go stale if
//! the process dies without running disconnect cleanup). Also owns the
//! transport-level room grouping used by the broadcaster and the
//! per-room typing set.

use std::collections::{HashMap, HashSet};

use tokio::sync::{Mutex, mpsc};

use crate::domain::{ConnectionId, RoomId, Username};

/// Room membership of a joined session
#[derive(Debug, Clone)]
pub struct RoomMembership {
    pub room_id: RoomId,
    pub username: Username,
    pub avatar_color: String,
}

/// One live connection
pub struct SessionInfo {
    /// Message sender channel (serialized outbound frames)
    pub sender: mpsc::UnboundedSender<String>,
    /// Unix timestamp when connected (in JST, milliseconds)
    pub connected_at: i64,
    /// Set on join-room, cleared on leave-room; `None` means UNJOINED
    pub membership: Option<RoomMembership>,
}

#[derive(Default)]
struct RegistryInner {
    sessions: HashMap<ConnectionId, SessionInfo>,
    /// Room grouping for broadcast fan-out (the transport's "rooms")
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
    /// Typing state as a set keyed by connection id, per room
    typing: HashMap<RoomId, HashSet<ConnectionId>>,
}

/// Process-wide table of live sessions, explicitly owned by the
/// application state and injected into the dispatcher.
pub struct SessionRegistry {
    inner: Mutex<RegistryInner>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Register a fresh, unjoined session for a connection
    pub async fn register(
        &self,
        connection_id: ConnectionId,
        sender: mpsc::UnboundedSender<String>,
        connected_at: i64,
    ) {
        let mut inner = self.inner.lock().await;
        inner.sessions.insert(
            connection_id,
            SessionInfo {
                sender,
                connected_at,
                membership: None,
            },
        );
    }

    /// Remove a session entirely, returning its membership if it had one.
    ///
    /// Cleans the room grouping and the typing set as well.
    pub async fn unregister(&self, connection_id: &ConnectionId) -> Option<RoomMembership> {
        let mut inner = self.inner.lock().await;
        let session = inner.sessions.remove(connection_id)?;
        let membership = session.membership;
        if let Some(membership) = &membership {
            Self::detach_from_room(&mut inner, connection_id, &membership.room_id);
        }
        membership
    }

    /// Attach a session to a room, overwriting any previous membership
    /// (a stale membership in another room is detached first).
    pub async fn join_room(&self, connection_id: &ConnectionId, membership: RoomMembership) {
        let mut inner = self.inner.lock().await;
        let previous_room = inner
            .sessions
            .get(connection_id)
            .and_then(|session| session.membership.as_ref().map(|m| m.room_id.clone()));
        if let Some(previous_room) = previous_room {
            Self::detach_from_room(&mut inner, connection_id, &previous_room);
        }
        let room_id = membership.room_id.clone();
        if let Some(session) = inner.sessions.get_mut(connection_id) {
            session.membership = Some(membership);
            inner
                .rooms
                .entry(room_id)
                .or_default()
                .insert(connection_id.clone());
        }
    }

    /// Clear a session's membership, returning what it was
    pub async fn leave_room(&self, connection_id: &ConnectionId) -> Option<RoomMembership> {
        let mut inner = self.inner.lock().await;
        let membership = inner
            .sessions
            .get_mut(connection_id)
            .and_then(|session| session.membership.take())?;
        Self::detach_from_room(&mut inner, connection_id, &membership.room_id);
        Some(membership)
    }

    /// Current membership of a connection, if joined
    pub async fn membership(&self, connection_id: &ConnectionId) -> Option<RoomMembership> {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .get(connection_id)
            .and_then(|session| session.membership.clone())
    }

    /// All connections currently grouped into a room, with their senders
    pub async fn senders_in_room(
        &self,
        room_id: &RoomId,
    ) -> Vec<(ConnectionId, mpsc::UnboundedSender<String>)> {
        let inner = self.inner.lock().await;
        let Some(members) = inner.rooms.get(room_id) else {
            return Vec::new();
        };
        members
            .iter()
            .filter_map(|id| {
                inner
                    .sessions
                    .get(id)
                    .map(|session| (id.clone(), session.sender.clone()))
            })
            .collect()
    }

    /// Send a serialized frame to one connection.
    ///
    /// Returns `false` if the connection is unknown or its channel closed.
    pub async fn send_to(&self, connection_id: &ConnectionId, payload: String) -> bool {
        let inner = self.inner.lock().await;
        match inner.sessions.get(connection_id) {
            Some(session) => session.sender.send(payload).is_ok(),
            None => false,
        }
    }

    /// Mark a connection as typing in a room.
    ///
    /// Returns `true` only when the state changed (repeated starts
    /// without a stop are deduplicated by the set).
    pub async fn start_typing(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        let mut inner = self.inner.lock().await;
        inner
            .typing
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id.clone())
    }

    /// Clear a connection's typing mark in a room.
    ///
    /// Returns `true` only when the connection was actually typing.
    pub async fn stop_typing(&self, connection_id: &ConnectionId, room_id: &RoomId) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.typing.get_mut(room_id) {
            Some(set) => set.remove(connection_id),
            None => false,
        }
    }

    /// Connections currently typing in a room
    pub async fn typing_connections(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        let inner = self.inner.lock().await;
        inner
            .typing
            .get(room_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of live sessions
    pub async fn count_sessions(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.sessions.len()
    }

    fn detach_from_room(
        inner: &mut RegistryInner,
        connection_id: &ConnectionId,
        room_id: &RoomId,
    ) {
        if let Some(members) = inner.rooms.get_mut(room_id) {
            members.remove(connection_id);
            if members.is_empty() {
                inner.rooms.remove(room_id);
            }
        }
        if let Some(typing) = inner.typing.get_mut(room_id) {
            typing.remove(connection_id);
            if typing.is_empty() {
                inner.typing.remove(room_id);
            }
        }
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
