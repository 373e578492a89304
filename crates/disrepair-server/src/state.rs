use std::sync::Arc;

use crate::auth::ApiKeyRegistry;
use crate::config::ServerConfig;
use crate::rate_limit::RateLimiter;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything lives behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub api_keys: Arc<ApiKeyRegistry>,
    /// Per-client request counters.
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let api_keys = ApiKeyRegistry::from_config(&config);
        let rate_limiter = RateLimiter::new(config.rate_limit_max, config.rate_limit_window);
        Self {
            config: Arc::new(config),
            api_keys: Arc::new(api_keys),
            rate_limiter: Arc::new(rate_limiter),
        }
    }
}
