//! API error handling
//!
//! `InvalidUsage` becomes a JSON body with its own status code. Anything else
//! is logged and answered with a bare 500.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};
use weather_core::{InvalidUsage, WeatherError};

/// API error type
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] WeatherError);

impl From<InvalidUsage> for ApiError {
    fn from(usage: InvalidUsage) -> Self {
        Self(WeatherError::Usage(usage))
    }
}

/// Malformed bodies are reported the same way as failed validation.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        InvalidUsage::new(rejection.body_text(), rejection.status().as_u16()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            WeatherError::Usage(usage) => {
                let status = StatusCode::from_u16(usage.status_code)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                warn!(status = status.as_u16(), reason = %usage.message, "Request rejected");

                (status, Json(usage.to_body())).into_response()
            }
            WeatherError::Internal(err) => {
                error!(error = ?err, "Unhandled error while serving request");

                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
