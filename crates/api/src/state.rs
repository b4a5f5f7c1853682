use std::sync::Arc;

use crate::config::ServerConfig;
use crate::relay::TaskRelay;
use crate::site_api::{SiteApiClient, TokenStore};
use crate::ws::ConnectionRegistry;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// The single executor connection.
    pub registry: Arc<ConnectionRegistry>,
    pub relay: Arc<TaskRelay>,
    pub site_api: Arc<SiteApiClient>,
    /// Bearer token for site API calls.
    pub tokens: Arc<TokenStore>,
}

impl AppState {
    /// Wire up the state for `config` with a fresh, empty registry.
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let relay = Arc::new(TaskRelay::new(Arc::clone(&registry), config.relay_timeout));
        let site_api = Arc::new(SiteApiClient::new(config.site_api.clone()));
        let tokens = Arc::new(TokenStore::new(config.site_api.api_token.clone()));

        Self {
            config: Arc::new(config),
            registry,
            relay,
            site_api,
            tokens,
        }
    }
}
