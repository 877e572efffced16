use std::sync::Arc;

use crate::assistant::ChatModel;
use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: electo_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing domain events.
    pub event_bus: Arc<electo_events::EventBus>,
    /// Chat backend for the electoral assistant. `None` when no API key is
    /// configured; behind a trait so tests can substitute a stub.
    pub chat_model: Option<Arc<dyn ChatModel>>,
}
