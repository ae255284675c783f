//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors a handler can answer with.
#[derive(Debug)]
pub enum ApiError {
    /// The requested resource does not exist.
    NotFound { entity: &'static str, id: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound { entity, id } => {
                (StatusCode::NOT_FOUND, format!("{entity} not found: {id}"))
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
