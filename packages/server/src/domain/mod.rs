//! Domain layer for the collaboration server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, Room, Snapshot};
pub use error::{RepositoryError, ValueObjectError};
pub use factory::{ConnectionIdFactory, RoomFactory, RoomIdFactory};
pub use repository::RoomRepository;
pub use value_object::{ConnectionId, RoomId, Timestamp, Username};
