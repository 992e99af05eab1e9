use std::sync::Arc;

use crate::config::ServerConfig;
use crate::pos::PosSessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: alfirdaws_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Open point-of-sale carts, keyed by session id.
    pub pos_sessions: Arc<PosSessionStore>,
}
