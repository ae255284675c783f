//! Device endpoints.

use axum::Json;
use axum::extract::{Path, State};

use brainhost_domain::device::DeviceDescriptor;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/devices`
pub async fn list(State(state): State<AppState>) -> Json<Vec<DeviceDescriptor>> {
    Json(state.config.devices.clone())
}

/// `GET /api/devices/{id}`
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when no device has `id`.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeviceDescriptor>, ApiError> {
    state
        .config
        .devices
        .iter()
        .find(|device| device.id == id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::NotFound {
            entity: "Device",
            id,
        })
}
