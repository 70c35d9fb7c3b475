use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Error types for the third-party proxy endpoints
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("{0} API key not configured")]
    MissingApiKey(&'static str),

    #[error("No se pudo obtener la ubicación")]
    NoResult,

    #[error("Error al conectar con Google API: {0}")]
    GeocodingUpstream(String),

    /// Text-generation upstream failure with a human-readable hint
    #[error("{0}")]
    GenerationUpstream(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl IntoResponse for LocationError {
    fn into_response(self) -> Response {
        let status = match self {
            LocationError::NoResult => StatusCode::NOT_FOUND,
            LocationError::ValidationError(_) => StatusCode::BAD_REQUEST,
            LocationError::MissingApiKey(_)
            | LocationError::GeocodingUpstream(_)
            | LocationError::GenerationUpstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            LocationError::MissingApiKey(which) => error!("{} API key not configured", which),
            LocationError::GeocodingUpstream(msg) | LocationError::GenerationUpstream(msg) => {
                warn!("Upstream API failure: {}", msg)
            }
            _ => {}
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
