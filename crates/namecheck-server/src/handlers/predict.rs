//! `POST /predict` handler.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use namecheck_core::PredictionResponse;

use crate::dto::PredictBody;
use crate::error::AppError;
use crate::services;
use crate::ServerState;

/// Classifies one name with the requested model.
///
/// Any body that does not deserialize (bad JSON, wrong content type, wrong
/// field types) is a 400 and never reaches the provider.
pub async fn predict(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<PredictBody>, JsonRejection>,
) -> Result<Json<PredictionResponse>, AppError> {
    let Json(body) = payload
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON payload: {}", e.body_text())))?;

    let response = services::predict::predict(&state, body).await?;
    Ok(Json(response))
}
