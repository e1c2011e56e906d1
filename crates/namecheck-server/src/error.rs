//! Application error types and Axum response conversion.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use namecheck_core::{ErrorBody, PredictionError};
use tracing::{error, warn};

/// Application-level errors with HTTP status code mapping.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
    BadGateway(String),
    GatewayTimeout(String),
}

impl From<PredictionError> for AppError {
    fn from(err: PredictionError) -> Self {
        let message = err.to_string();
        match err {
            PredictionError::Validation(_) | PredictionError::Configuration(_) => {
                warn!("Rejected request: {}", message);
                AppError::BadRequest(message)
            }
            PredictionError::Classification(_) => {
                error!("Prediction validation error: {}", message);
                AppError::Internal(message)
            }
            PredictionError::Upstream(_) => {
                error!("Model API call failed: {}", message);
                AppError::BadGateway(message)
            }
            PredictionError::Timeout(_) => {
                error!("Model API call timed out: {}", message);
                AppError::GatewayTimeout(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
