//! Room persistence contract.
//!
//! The engine only ever talks to the document store through this trait:
//! load a room by id, write a room back. There is no compare-and-swap —
//! callers must treat the last write observed by storage as authoritative.

use async_trait::async_trait;

use super::{entity::Room, error::RepositoryError, value_object::RoomId};

/// Load/save contract for durable room documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Load a room by id. `Ok(None)` means the room does not exist.
    async fn find_by_room_id(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// Insert or overwrite the room document, returning the stored value.
    async fn upsert(&self, room: Room) -> Result<Room, RepositoryError>;
}
