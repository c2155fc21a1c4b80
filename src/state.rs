use std::sync::Arc;
use std::time::Instant;

use crate::auth::{LoginRateLimiter, SessionManager};
use crate::config::ServerConfig;
use crate::storage::UserStore;

/// Main server state shared across all handlers
pub struct ServerState {
    pub config: ServerConfig,
    pub user_store: Arc<dyn UserStore>,
    pub sessions: SessionManager,
    pub rate_limiter: LoginRateLimiter,
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(config: ServerConfig, user_store: Arc<dyn UserStore>) -> Self {
        let sessions = SessionManager::new(config.session_timeout_seconds);
        Self {
            config,
            user_store,
            sessions,
            rate_limiter: LoginRateLimiter::default(),
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
