//! Server summary endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use brainhost_domain::brain::BrainDescriptor;

use crate::state::AppState;

/// Response body for `GET /api/server`.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub port: u16,
    pub brain: BrainDescriptor,
    pub device_count: usize,
}

/// `GET /api/server`
pub async fn show(State(state): State<AppState>) -> Json<ServerInfo> {
    let config = &state.config;
    Json(ServerInfo {
        name: config.name.clone(),
        port: config.port,
        brain: config.brain.clone(),
        device_count: config.devices.len(),
    })
}
