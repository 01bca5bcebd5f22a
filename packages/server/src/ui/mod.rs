//! HTTP / WebSocket surface of the collaboration server.

pub mod broadcast;
pub mod dispatcher;
mod handler;
pub mod rate_limit;
mod runner;
pub mod session; // Event Dispatcher と統合テストからアクセスするため public
mod signal;
pub mod state;

pub use runner::{ServerConfig, ServerError, router, run, run_with_repository};
