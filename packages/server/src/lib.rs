//! Room session synchronization server for collaborative code editing.
//!
//! Multiple clients join a room over WebSocket, edit per-language code
//! buffers, and see each other's presence, typing state and chat in real
//! time. Conflict policy is last-write-wins per language buffer; room
//! state is periodically snapshotted through the room repository.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use ui::{ServerConfig, run};
