//! Prediction backends for the harness.

use std::time::Duration;

use async_trait::async_trait;
use namecheck_core::{ErrorBody, Label, ModelId, PredictionError, PredictionRequest, PredictionResponse};
use reqwest::StatusCode;
use tracing::debug;

/// Produces one label for one name with one model.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, name: &str, model: ModelId) -> Result<Label, PredictionError>;
}

/// Calls a running prediction service over HTTP.
///
/// One client (and so one connection pool) is shared by every worker.
pub struct HttpPredictor {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpPredictor {
    /// Creates a predictor for `url` with a per-request timeout ceiling.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PredictionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictionError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn send_err(&self, e: reqwest::Error) -> PredictionError {
        if e.is_timeout() {
            PredictionError::Timeout(self.timeout)
        } else {
            PredictionError::Upstream(e.to_string())
        }
    }
}

/// Maps a non-2xx reply of the service back onto the error taxonomy.
fn status_error(status: StatusCode, body: &str) -> PredictionError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());
    let message = format!("{}: {}", status, message);

    match status {
        StatusCode::BAD_REQUEST => PredictionError::Validation(message),
        StatusCode::INTERNAL_SERVER_ERROR => PredictionError::Classification(message),
        _ => PredictionError::Upstream(message),
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, name: &str, model: ModelId) -> Result<Label, PredictionError> {
        let payload = PredictionRequest::new(name, model);
        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.send_err(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let body: PredictionResponse = response.json().await.map_err(|e| self.send_err(e))?;
        debug!("'{}' -> {} ({})", name, body.prediction, model);
        Ok(body.prediction)
    }
}
