//! Prediction service: validate, optionally pre-check, ask the model,
//! classify the reply.

use namecheck_core::{
    normalize_name, precheck, title_case, Label, ModelId, PredictionError, PredictionResponse,
};
use namecheck_llm::{build_prompt, classify_reply, SYSTEM_PROMPT};
use tracing::info;

use crate::dto::PredictBody;
use crate::ServerState;

const MISSING_REASON: &str = "Reason not provided by model.";

/// Runs one prediction. The provider is called at most once.
pub async fn predict(
    state: &ServerState,
    body: PredictBody,
) -> Result<PredictionResponse, PredictionError> {
    let mut name = normalize_name(body.name.as_deref().unwrap_or_default());
    if name.is_empty() {
        return Err(PredictionError::Validation("No name provided".into()));
    }

    let model: ModelId = body
        .model
        .as_deref()
        .ok_or_else(|| PredictionError::Validation("No model provided".into()))?
        .parse()?;

    if state.precheck {
        name = title_case(&name);
        if let Err(failure) = precheck(&name) {
            info!("'{}' rejected by pre-check: {}", name, failure);
            return Ok(PredictionResponse {
                name,
                prediction: Label::NotRealistic,
                reason: Some(failure.reason().to_string()),
            });
        }
        info!("'{}' passed local checks", name);
    }

    info!("Calling model '{}' for name '{}'", model, name);
    let reply = state
        .completion
        .complete(model, SYSTEM_PROMPT, &build_prompt(&name))
        .await?;

    let classification = classify_reply(&reply.content)?;
    let reason = match classification.label {
        Label::Realistic => None,
        Label::NotRealistic => Some(
            classification
                .reason
                .unwrap_or_else(|| MISSING_REASON.to_string()),
        ),
    };

    info!("'{}' classified as {} by {}", name, classification.label, model);
    Ok(PredictionResponse {
        name,
        prediction: classification.label,
        reason,
    })
}
