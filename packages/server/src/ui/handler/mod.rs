//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{create_room, get_room_detail, health_check, join_room};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
