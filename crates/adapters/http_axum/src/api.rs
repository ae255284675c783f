//! JSON API handlers.
//!
//! - `GET /api/server`       : server name, port, brain, device count
//! - `GET /api/devices`      : list exposed devices
//! - `GET /api/devices/{id}` : single device

pub mod devices;
pub mod server;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;

/// Routes mounted under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/server", get(server::show))
        .route("/devices", get(devices::list))
        .route("/devices/{id}", get(devices::get))
}
