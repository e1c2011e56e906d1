//! Data transfer objects for HTTP message serialization.

use serde::Deserialize;

/// Raw `POST /predict` body.
///
/// Fields are optional here so that a missing field is reported as a
/// validation error with a specific message instead of a generic rejection.
#[derive(Debug, Deserialize)]
pub struct PredictBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}
