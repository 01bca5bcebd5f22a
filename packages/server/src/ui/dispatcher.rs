//! Event dispatcher: the per-connection protocol state machine.
//!
//! Receives parsed client events, validates them against the session's
//! registry state, invokes the matching use case and fans the result
//! out through the broadcaster. One dispatcher exists per connection
//! and owns that connection's rate limiter, so the whole state machine
//! can be driven in tests without a live transport.
//!
//! Session states per connection: UNJOINED -> JOINED -> (LEFT | DISCONNECTED).
//! Only join-room is accepted while UNJOINED; every other event requires
//! a joined room whose id matches the event's — mismatches are silently
//! ignored (a stale client emitting after a completed leave).

use std::sync::Arc;

use terakoya_shared::time::get_jst_timestamp;

use crate::domain::{ConnectionId, Participant, RoomId, Timestamp, Username};
use crate::infrastructure::dto::websocket::{
    ClientEvent, CursorPosition, CursorSelection, ParticipantInfo, ServerEvent,
};
use crate::usecase::{
    ChangeLanguageUseCase, JoinRoomUseCase, LeaveRoomUseCase, SaveSnapshotUseCase,
    UpdateCodeUseCase, error::JoinRoomError,
};

use super::{
    rate_limit::{RateLimitAction, RateLimiter},
    session::RoomMembership,
    state::AppState,
};

/// Protocol state machine for one connection
pub struct EventDispatcher {
    state: Arc<AppState>,
    connection_id: ConnectionId,
    limiter: RateLimiter,
}

impl EventDispatcher {
    /// Create a dispatcher for a registered connection
    pub fn new(state: Arc<AppState>, connection_id: ConnectionId) -> Self {
        Self {
            state,
            connection_id,
            limiter: RateLimiter::new(),
        }
    }

    /// Handle one inbound event to completion.
    ///
    /// Failures never escape a single event: persistence errors are
    /// logged (and for code-change the broadcast still proceeds), and
    /// protocol violations are answered with an error frame or ignored.
    pub async fn dispatch(&mut self, event: ClientEvent) {
        match event {
            ClientEvent::JoinRoom {
                room_id,
                username,
                avatar_color,
            } => self.handle_join(room_id, username, avatar_color).await,
            ClientEvent::LeaveRoom => self.handle_leave().await,
            ClientEvent::CodeChange {
                room_id,
                language,
                code,
            } => self.handle_code_change(room_id, language, code).await,
            ClientEvent::LanguageChange { room_id, language } => {
                self.handle_language_change(room_id, language).await;
            }
            ClientEvent::CursorUpdate {
                room_id,
                position,
                selection,
            } => self.handle_cursor_update(room_id, position, selection).await,
            ClientEvent::TypingStart { room_id } => self.handle_typing_start(room_id).await,
            ClientEvent::TypingStop { room_id } => self.handle_typing_stop(room_id).await,
            ClientEvent::ChatMessage { room_id, message } => {
                self.handle_chat_message(room_id, message).await;
            }
            ClientEvent::SaveSnapshot { room_id, code } => {
                self.handle_save_snapshot(room_id, code).await;
            }
        }
    }

    /// Transport-level disconnect: unregister the session and, if it was
    /// joined, notify the remaining peers and clean the persisted roster.
    ///
    /// Unlike explicit leave-room, this path does broadcast `user-left`.
    pub async fn handle_disconnect(&self) {
        let Some(membership) = self.state.registry.unregister(&self.connection_id).await else {
            return;
        };

        let usecase = LeaveRoomUseCase::new(self.state.repository.clone());
        if let Err(e) = usecase
            .execute(&membership.room_id, &self.connection_id)
            .await
        {
            tracing::warn!(
                "Failed to remove '{}' from room '{}' roster on disconnect: {}",
                self.connection_id,
                membership.room_id,
                e
            );
        }

        let left = ServerEvent::UserLeft {
            connection_id: self.connection_id.as_str().to_string(),
        };
        // Session is already unregistered, so this reaches only the peers
        self.state
            .broadcaster
            .broadcast(&membership.room_id, &left, None)
            .await;
    }

    async fn handle_join(&mut self, room_id: String, username: String, avatar_color: String) {
        let Ok(room_id) = RoomId::new(room_id) else {
            self.send_error("Room not found").await;
            return;
        };
        let Ok(username) = Username::new(username) else {
            self.send_error("Failed to join room").await;
            return;
        };

        let usecase = JoinRoomUseCase::new(self.state.repository.clone());
        let participant = Participant::new(
            self.connection_id.clone(),
            username.clone(),
            avatar_color.clone(),
        );

        match usecase.execute(&room_id, participant).await {
            Ok(room) => {
                self.state
                    .registry
                    .join_room(
                        &self.connection_id,
                        RoomMembership {
                            room_id: room_id.clone(),
                            username: username.clone(),
                            avatar_color: avatar_color.clone(),
                        },
                    )
                    .await;

                // Full snapshot to everyone in the room, joiner included
                let snapshot = ServerEvent::RoomJoined {
                    room_id: room_id.as_str().to_string(),
                    participants: room.participants.iter().map(ParticipantInfo::from).collect(),
                    codes: room.codes.clone(),
                    language: room.active_language.clone(),
                };
                self.state
                    .broadcaster
                    .broadcast(&room_id, &snapshot, None)
                    .await;

                // Presence-only notification to the others
                let joined = ServerEvent::UserJoined {
                    connection_id: self.connection_id.as_str().to_string(),
                    username: username.as_str().to_string(),
                    avatar_color,
                };
                self.state
                    .broadcaster
                    .broadcast(&room_id, &joined, Some(&self.connection_id))
                    .await;

                tracing::info!(
                    "Connection '{}' joined room '{}' as '{}'",
                    self.connection_id,
                    room_id,
                    username
                );
            }
            Err(JoinRoomError::RoomNotFound(_)) => {
                self.send_error("Room not found").await;
            }
            Err(JoinRoomError::Persistence(e)) => {
                tracing::error!("Failed to load room '{}': {}", room_id, e);
                self.send_error("Failed to join room").await;
            }
        }
    }

    async fn handle_leave(&self) {
        let Some(membership) = self.state.registry.leave_room(&self.connection_id).await else {
            return;
        };

        let usecase = LeaveRoomUseCase::new(self.state.repository.clone());
        if let Err(e) = usecase
            .execute(&membership.room_id, &self.connection_id)
            .await
        {
            tracing::warn!(
                "Failed to remove '{}' from room '{}' roster on leave: {}",
                self.connection_id,
                membership.room_id,
                e
            );
        }
        // 明示的な leave はピアに通知しない（通知は切断経路のみ）
    }

    async fn handle_code_change(&mut self, room_id: String, language: String, code: String) {
        let Some(membership) = self.joined_room(&room_id).await else {
            return;
        };
        if !self.check_rate_limit(RateLimitAction::CodeChange).await {
            return;
        }

        let usecase = UpdateCodeUseCase::new(self.state.repository.clone());
        if let Err(e) = usecase
            .execute(&membership.room_id, &language, code.clone())
            .await
        {
            tracing::error!("Error saving code change for room '{}': {}", room_id, e);
        }

        // Live responsiveness over durability: the broadcast is not
        // gated on persistence success
        let updated = ServerEvent::CodeUpdated { language, code };
        self.state
            .broadcaster
            .broadcast(&membership.room_id, &updated, Some(&self.connection_id))
            .await;
    }

    async fn handle_language_change(&self, room_id: String, language: String) {
        let Some(membership) = self.joined_room(&room_id).await else {
            return;
        };

        let usecase = ChangeLanguageUseCase::new(self.state.repository.clone());
        match usecase.execute(&membership.room_id, &language).await {
            Ok(code) => {
                // Each peer tracks its own viewed language; reply to the
                // requester only
                let updated = ServerEvent::LanguageUpdated { language, code };
                self.state
                    .broadcaster
                    .send_to(&self.connection_id, &updated)
                    .await;
            }
            Err(e) => {
                tracing::error!("Error handling language change for room '{}': {}", room_id, e);
            }
        }
    }

    async fn handle_cursor_update(
        &mut self,
        room_id: String,
        position: CursorPosition,
        selection: Option<CursorSelection>,
    ) {
        let Some(membership) = self.joined_room(&room_id).await else {
            return;
        };
        if !self.check_rate_limit(RateLimitAction::CursorUpdate).await {
            return;
        }

        let moved = ServerEvent::CursorMoved {
            connection_id: self.connection_id.as_str().to_string(),
            position,
            selection,
        };
        self.state
            .broadcaster
            .broadcast(&membership.room_id, &moved, Some(&self.connection_id))
            .await;
    }

    async fn handle_typing_start(&self, room_id: String) {
        let Some(membership) = self.joined_room(&room_id).await else {
            return;
        };

        // Only a set transition is worth notifying; repeated starts
        // without a stop are absorbed here
        if !self
            .state
            .registry
            .start_typing(&self.connection_id, &membership.room_id)
            .await
        {
            return;
        }

        let typing = ServerEvent::UserTyping {
            connection_id: self.connection_id.as_str().to_string(),
        };
        self.state
            .broadcaster
            .broadcast(&membership.room_id, &typing, Some(&self.connection_id))
            .await;
    }

    async fn handle_typing_stop(&self, room_id: String) {
        let Some(membership) = self.joined_room(&room_id).await else {
            return;
        };

        if !self
            .state
            .registry
            .stop_typing(&self.connection_id, &membership.room_id)
            .await
        {
            return;
        }

        let stopped = ServerEvent::UserStoppedTyping {
            connection_id: self.connection_id.as_str().to_string(),
        };
        self.state
            .broadcaster
            .broadcast(&membership.room_id, &stopped, Some(&self.connection_id))
            .await;
    }

    async fn handle_chat_message(&mut self, room_id: String, message: String) {
        let Some(membership) = self.joined_room(&room_id).await else {
            return;
        };
        if !self.check_rate_limit(RateLimitAction::ChatMessage).await {
            return;
        }

        // Not persisted; the sender receives its own message back so all
        // clients render the same server-authoritative timestamp
        let chat = ServerEvent::ChatMessage {
            connection_id: self.connection_id.as_str().to_string(),
            username: membership.username.as_str().to_string(),
            message,
            timestamp: get_jst_timestamp(),
        };
        self.state
            .broadcaster
            .broadcast(&membership.room_id, &chat, None)
            .await;
    }

    async fn handle_save_snapshot(&self, room_id: String, code: String) {
        let Some(membership) = self.joined_room(&room_id).await else {
            return;
        };

        let usecase = SaveSnapshotUseCase::new(self.state.repository.clone());
        if let Err(e) = usecase
            .execute(&membership.room_id, code, Timestamp::new(get_jst_timestamp()))
            .await
        {
            tracing::error!("Save error for room '{}': {}", room_id, e);
        }
    }

    /// Resolve the session's membership if it matches the event's room.
    ///
    /// Returns `None` (event silently ignored) when the session is
    /// UNJOINED or the room ids differ.
    async fn joined_room(&self, room_id: &str) -> Option<RoomMembership> {
        let membership = self.state.registry.membership(&self.connection_id).await?;
        if membership.room_id.as_str() != room_id {
            return None;
        }
        Some(membership)
    }

    async fn check_rate_limit(&mut self, action: RateLimitAction) -> bool {
        if self.limiter.check(action, get_jst_timestamp()) {
            return true;
        }
        self.send_error("Rate limit exceeded").await;
        false
    }

    async fn send_error(&self, message: &str) {
        let event = ServerEvent::Error {
            message: message.to_string(),
        };
        self.state
            .broadcaster
            .send_to(&self.connection_id, &event)
            .await;
    }
}
