//! WebSocket message DTOs for the collaboration protocol.
//!
//! Inbound ([`ClientEvent`]) and outbound ([`ServerEvent`]) frames are
//! JSON objects tagged with a kebab-case `type` field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::Participant;

/// Cursor position inside a buffer (1-based editor coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub line: u32,
    pub column: u32,
}

/// A selected range inside a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorSelection {
    pub start: CursorPosition,
    pub end: CursorPosition,
}

/// Roster entry as sent over the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub connection_id: String,
    pub username: String,
    pub avatar_color: String,
}

impl From<&Participant> for ParticipantInfo {
    fn from(participant: &Participant) -> Self {
        Self {
            connection_id: participant.connection_id.as_str().to_string(),
            username: participant.username.as_str().to_string(),
            avatar_color: participant.avatar_color.clone(),
        }
    }
}

/// Events sent by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join a room; the only event accepted before a session has a room
    JoinRoom {
        room_id: String,
        username: String,
        avatar_color: String,
    },
    /// Leave the current room without disconnecting
    LeaveRoom,
    /// Overwrite one language's buffer (last-write-wins)
    CodeChange {
        room_id: String,
        language: String,
        code: String,
    },
    /// Switch the advisory active language
    LanguageChange { room_id: String, language: String },
    /// High-frequency cursor presence signal
    CursorUpdate {
        room_id: String,
        position: CursorPosition,
        #[serde(default)]
        selection: Option<CursorSelection>,
    },
    /// Typing indicator on
    TypingStart { room_id: String },
    /// Typing indicator off
    TypingStop { room_id: String },
    /// Chat message (not persisted)
    ChatMessage { room_id: String, message: String },
    /// Periodic durable copy of the submitted buffer
    SaveSnapshot { room_id: String, code: String },
}

/// Events sent to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Full room snapshot, sent to every connection in the room on join
    RoomJoined {
        room_id: String,
        participants: Vec<ParticipantInfo>,
        codes: HashMap<String, String>,
        language: String,
    },
    /// Presence notification for everyone except the joiner
    UserJoined {
        connection_id: String,
        username: String,
        avatar_color: String,
    },
    /// A connection dropped out of the room
    UserLeft { connection_id: String },
    /// A peer overwrote one language's buffer
    CodeUpdated { language: String, code: String },
    /// Reply to language-change, requester only
    LanguageUpdated { language: String, code: String },
    /// A peer moved their cursor
    CursorMoved {
        connection_id: String,
        position: CursorPosition,
        selection: Option<CursorSelection>,
    },
    /// A peer started typing
    UserTyping { connection_id: String },
    /// A peer stopped typing
    UserStoppedTyping { connection_id: String },
    /// Chat message, echoed to the sender as well with the server's timestamp
    ChatMessage {
        connection_id: String,
        username: String,
        message: String,
        timestamp: i64,
    },
    /// Human-readable error, requester only
    Error { message: String },
}

impl ServerEvent {
    /// Wire name of the event, for logging
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RoomJoined { .. } => "room-joined",
            ServerEvent::UserJoined { .. } => "user-joined",
            ServerEvent::UserLeft { .. } => "user-left",
            ServerEvent::CodeUpdated { .. } => "code-updated",
            ServerEvent::LanguageUpdated { .. } => "language-updated",
            ServerEvent::CursorMoved { .. } => "cursor-moved",
            ServerEvent::UserTyping { .. } => "user-typing",
            ServerEvent::UserStoppedTyping { .. } => "user-stopped-typing",
            ServerEvent::ChatMessage { .. } => "chat-message",
            ServerEvent::Error { .. } => "error",
        }
    }
}
