use std::sync::Arc;

use vidcat_core::catalog::VideoCatalog;
use vidcat_core::store::{UserStore, VideoStore};
use vidcat_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Video operations over the configured store.
    pub catalog: VideoCatalog,
    /// Account lookups for signup and login.
    pub users: Arc<dyn UserStore>,
    /// Server configuration (JWT settings, page cap).
    pub config: Arc<ServerConfig>,
    /// Database connection pool; `None` for the in-memory backend.
    pub pool: Option<DbPool>,
}

impl AppState {
    /// Wire the catalog over `videos` using the configured owner-less policy.
    pub fn new(
        videos: Arc<dyn VideoStore>,
        users: Arc<dyn UserStore>,
        config: Arc<ServerConfig>,
        pool: Option<DbPool>,
    ) -> Self {
        let catalog = VideoCatalog::new(videos, config.ownerless_policy);
        Self {
            catalog,
            users,
            config,
            pool,
        }
    }
}
