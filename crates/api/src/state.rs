use std::sync::Arc;
use std::time::Duration;

use onboard_core::flow::Forwarder;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (intake endpoint, CORS, timeouts).
    pub config: Arc<ServerConfig>,
    /// One form session per visitor, keyed by the session cookie.
    pub sessions: SessionStore,
    /// Sends accepted submissions to the intake endpoint.
    pub forwarder: Arc<dyn Forwarder>,
}

impl AppState {
    pub fn new(config: ServerConfig, forwarder: Arc<dyn Forwarder>) -> Self {
        let sessions = SessionStore::new(
            config.session_capacity,
            Duration::from_secs(config.session_idle_secs),
        );
        Self {
            config: Arc::new(config),
            sessions,
            forwarder,
        }
    }
}
