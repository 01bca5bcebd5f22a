//! Server state and connection management.

use std::sync::Arc;

use crate::domain::RoomRepository;

use super::{broadcast::RoomBroadcaster, session::SessionRegistry};

/// Shared application state
pub struct AppState {
    /// Repository（データアクセス層の抽象化）
    pub repository: Arc<dyn RoomRepository>,
    /// Live session table, injected into every dispatcher
    pub registry: Arc<SessionRegistry>,
    /// Fan-out over the registry's room grouping
    pub broadcaster: RoomBroadcaster,
}

impl AppState {
    /// Create the application state around a repository implementation
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let broadcaster = RoomBroadcaster::new(registry.clone());
        Self {
            repository,
            registry,
            broadcaster,
        }
    }
}
