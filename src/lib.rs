pub mod auth;
pub mod config;
pub mod error;
pub mod rest;
pub mod storage;
pub mod tasks;
pub mod users;

use std::sync::Arc;

use config::ServerConfig;
use storage::Storage;
use tasks::TaskStorage;
use users::UserStorage;

/// Shared application state passed to every route handler.
///
/// The storage handle is constructed once at startup and injected here —
/// handlers never reach for ambient global state.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub storage: Arc<Storage>,
    /// Task table operations (shares the storage pool).
    pub tasks: Arc<TaskStorage>,
    /// User table operations (shares the storage pool).
    pub users: Arc<UserStorage>,
    /// Key for minting and verifying bearer tokens. Resolved at startup:
    /// configured secret, or an ephemeral one (tokens die with the process).
    pub auth_secret: String,
    pub started_at: std::time::Instant,
}

impl AppContext {
    pub fn new(config: Arc<ServerConfig>, storage: Arc<Storage>, auth_secret: String) -> Self {
        let pool = storage.pool();
        Self {
            config,
            storage,
            tasks: Arc::new(TaskStorage::new(pool.clone())),
            users: Arc::new(UserStorage::new(pool)),
            auth_secret,
            started_at: std::time::Instant::now(),
        }
    }
}
