//! Core domain types and error definitions for namecheck.
//!
//! This crate provides the types shared by the prediction service and the
//! evaluation harness:
//!
//! - [`Label`] — Binary classification outcome
//! - [`ModelId`] — Enumerated set of supported external models
//! - [`NameRecord`] — One labeled row of an evaluation dataset
//! - [`PredictionRequest`] / [`PredictionResponse`] — Wire types for `POST /predict`
//! - [`PredictionError`] — Error taxonomy for prediction calls
//!
//! # Example
//!
//! ```rust
//! use namecheck_core::{Label, ModelId, PredictionRequest};
//!
//! let model: ModelId = "gpt-4o-mini".parse().unwrap();
//! let req = PredictionRequest::new("Aisha Khan", model);
//! assert_eq!(req.model.as_str(), "gpt-4o-mini");
//! assert_eq!(Label::from_bit(1), Some(Label::Realistic));
//! ```

mod name;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use name::{normalize_name, precheck, title_case, PrecheckFailure};

/// Errors that can occur while producing a prediction.
///
/// Only [`PredictionError::Upstream`] and [`PredictionError::Timeout`] are
/// transient; everything else is terminal for the request that produced it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    /// The request was malformed (missing fields, empty name, bad JSON).
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Bad setup: missing credential, unsupported model, empty dataset.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The external provider (or the prediction service) failed.
    #[error("Upstream model call failed: {0}")]
    Upstream(String),

    /// The external call exceeded its timeout ceiling.
    #[error("Upstream model call timed out after {0:?}")]
    Timeout(Duration),

    /// The provider reply could not be mapped to a label.
    #[error("Ambiguous model output: {0}")]
    Classification(String),
}

impl PredictionError {
    /// Returns `true` if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream(_) | Self::Timeout(_))
    }

    /// Short stable name of the error kind, used in logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Upstream(_) => "upstream",
            Self::Timeout(_) => "timeout",
            Self::Classification(_) => "classification",
        }
    }
}

/// Binary classification outcome for a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// A plausible human full name (bit `1`).
    #[serde(rename = "Realistic")]
    Realistic,
    /// Not a plausible human full name (bit `0`).
    #[serde(rename = "Not Realistic")]
    NotRealistic,
}

impl Label {
    /// Wire text of this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Realistic => "Realistic",
            Self::NotRealistic => "Not Realistic",
        }
    }

    /// Dataset encoding: `1` for realistic, `0` otherwise.
    pub fn as_bit(&self) -> u8 {
        match self {
            Self::Realistic => 1,
            Self::NotRealistic => 0,
        }
    }

    /// Decodes a dataset bit. Anything other than `0`/`1` is rejected.
    pub fn from_bit(bit: u8) -> Option<Self> {
        match bit {
            1 => Some(Self::Realistic),
            0 => Some(Self::NotRealistic),
            _ => None,
        }
    }
}

impl From<bool> for Label {
    fn from(realistic: bool) -> Self {
        if realistic {
            Self::Realistic
        } else {
            Self::NotRealistic
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = PredictionError;

    /// Parses an exact label, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "realistic" => Ok(Self::Realistic),
            "not realistic" => Ok(Self::NotRealistic),
            other => Err(PredictionError::Classification(format!(
                "'{}' is not a known label",
                other
            ))),
        }
    }
}

/// Supported external language models.
///
/// Model identifiers outside this set are a configuration error; there is
/// no fallback model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "gpt-4.1")]
    Gpt41,
    #[serde(rename = "gpt-4.1-mini")]
    Gpt41Mini,
    #[serde(rename = "gpt-4.1-nano")]
    Gpt41Nano,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl ModelId {
    /// Every supported model, in declaration order.
    pub const ALL: [ModelId; 4] = [
        ModelId::Gpt41,
        ModelId::Gpt41Mini,
        ModelId::Gpt41Nano,
        ModelId::Gpt4oMini,
    ];

    /// Provider-side model name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt41 => "gpt-4.1",
            Self::Gpt41Mini => "gpt-4.1-mini",
            Self::Gpt41Nano => "gpt-4.1-nano",
            Self::Gpt4oMini => "gpt-4o-mini",
        }
    }

    /// Comma separated list of supported identifiers, for error messages.
    pub fn supported_list() -> String {
        Self::ALL.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| {
                PredictionError::Configuration(format!(
                    "Unsupported model '{}'. Choose from [{}]",
                    s,
                    Self::supported_list()
                ))
            })
    }
}

/// One labeled row of an evaluation dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub name: String,
    pub expected: Label,
}

impl NameRecord {
    pub fn new(name: impl Into<String>, expected: Label) -> Self {
        Self { name: name.into(), expected }
    }
}

/// Body of a `POST /predict` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub name: String,
    pub model: ModelId,
}

impl PredictionRequest {
    pub fn new(name: impl Into<String>, model: ModelId) -> Self {
        Self { name: name.into(), model }
    }
}

/// Successful reply of a `POST /predict` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// The name after normalization.
    pub name: String,
    pub prediction: Label,
    /// Why the name was judged unrealistic, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error body returned by the prediction service for non-2xx replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
