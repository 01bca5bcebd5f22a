//! Domain factories for creating domain entities and value objects.

use super::{
    ConnectionId, RoomId, Timestamp,
    entity::Room,
    error::ValueObjectError,
};

/// Length of generated room id tokens (short enough to share by hand)
const ROOM_ID_TOKEN_LENGTH: usize = 12;

/// Factory for generating RoomId instances.
///
/// This factory encapsulates the logic for generating new room identifiers,
/// separating the generation concern from the validation logic in RoomId.
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Generate a new RoomId as a short random token.
    ///
    /// The token is the first [`ROOM_ID_TOKEN_LENGTH`] characters of a
    /// UUID v4 in simple (non-hyphenated) form.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        let token: String = uuid
            .simple()
            .to_string()
            .chars()
            .take(ROOM_ID_TOKEN_LENGTH)
            .collect();
        RoomId::new(token)
    }
}

/// Factory for generating ConnectionId instances.
///
/// The server assigns one id per WebSocket connection at upgrade time;
/// the id stays fixed for the connection's whole lifetime.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId with a random UUID v4.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for consistency
    /// with the domain error handling pattern.
    pub fn generate() -> Result<ConnectionId, ValueObjectError> {
        let uuid = uuid::Uuid::new_v4();
        ConnectionId::new(uuid.to_string())
    }
}

/// Factory for creating fresh rooms with a generated id and defaults.
pub struct RoomFactory;

impl RoomFactory {
    /// Create a new room.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name; `None` keeps the default
    /// * `language` - Initial active language; `None` keeps the default
    /// * `created_at` - Creation timestamp
    pub fn create(
        name: Option<String>,
        language: Option<String>,
        created_at: Timestamp,
    ) -> Result<Room, ValueObjectError> {
        let id = RoomIdFactory::generate()?;
        let mut room = Room::new(id, created_at);
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            room.name = name;
        }
        if let Some(language) = language.filter(|l| !l.is_empty()) {
            room.set_active_language(language);
        }
        Ok(room)
    }
}
