//! Shared state for axum handlers.

use std::sync::Arc;

use brainhost_domain::server::ServerConfiguration;

/// State shared across all handlers of one running server.
///
/// The configuration is fixed for the server's lifetime, so handlers only
/// ever read it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfiguration>,
}

impl AppState {
    /// Wrap a configuration for sharing between handlers.
    #[must_use]
    pub fn new(config: ServerConfiguration) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}
