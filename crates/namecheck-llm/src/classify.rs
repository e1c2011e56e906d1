//! Maps a model's free-text reply to a label.
//!
//! A JSON object (bare, or inside a ```` ```json ```` fence) is authoritative
//! when present. Otherwise the raw text is scanned case-insensitively:
//! a negative phrase wins over a bare `realistic`. Replies containing
//! neither are rejected; the label is never guessed.

use namecheck_core::{Label, PredictionError};
use serde::Deserialize;

const NEGATIVE_TERMS: [&str; 2] = ["not realistic", "unrealistic"];
const POSITIVE_TERM: &str = "realistic";

/// A label recovered from a reply, with the model's reason when it gave one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub label: Label,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonReply {
    prediction: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Returns the JSON object embedded in a reply, if any.
fn extract_json(text: &str) -> Option<&str> {
    let lower = text.to_ascii_lowercase();
    if let Some(fence) = lower.find("```json") {
        let body_start = fence + "```json".len();
        let body_end = lower[body_start..].find("```").map(|i| body_start + i)?;
        let body = text[body_start..body_end].trim();
        if body.starts_with('{') && body.ends_with('}') {
            return Some(body);
        }
    }

    let trimmed = text.trim();
    (trimmed.starts_with('{') && trimmed.ends_with('}')).then_some(trimmed)
}

fn classify_json(raw: &str) -> Option<Result<Classification, PredictionError>> {
    let reply: JsonReply = serde_json::from_str(raw).ok()?;
    let Some(prediction) = reply.prediction else {
        return Some(Err(PredictionError::Classification(format!(
            "reply JSON has no prediction field: {}",
            raw
        ))));
    };

    let result = prediction.parse::<Label>().map(|label| Classification {
        label,
        reason: reply.reason.filter(|r| !r.trim().is_empty()),
    });
    Some(result.map_err(|_| {
        PredictionError::Classification(format!("invalid prediction value from model: {}", prediction))
    }))
}

fn classify_text(text: &str) -> Result<Classification, PredictionError> {
    let lower = text.to_lowercase();
    let label = if NEGATIVE_TERMS.iter().any(|t| lower.contains(t)) {
        Label::NotRealistic
    } else if lower.contains(POSITIVE_TERM) {
        Label::Realistic
    } else {
        return Err(PredictionError::Classification(format!(
            "reply mentions neither label: {}",
            text
        )));
    };
    Ok(Classification { label, reason: None })
}

/// Classifies a model reply as `Realistic` or `Not Realistic`.
pub fn classify_reply(text: &str) -> Result<Classification, PredictionError> {
    if let Some(result) = extract_json(text).and_then(classify_json) {
        return result;
    }
    classify_text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_reply() {
        let c = classify_reply(r#"{"prediction": "Realistic"}"#).unwrap();
        assert_eq!(c, Classification { label: Label::Realistic, reason: None });
    }

    #[test]
    fn fenced_json_with_reason() {
        let reply = "```json\n{\"prediction\": \"Not Realistic\", \"reason\": \"single word\"}\n```";
        let c = classify_reply(reply).unwrap();
        assert_eq!(c.label, Label::NotRealistic);
        assert_eq!(c.reason.as_deref(), Some("single word"));
    }

    #[test]
    fn json_prediction_is_case_insensitive() {
        let c = classify_reply(r#"{"prediction": "not realistic"}"#).unwrap();
        assert_eq!(c.label, Label::NotRealistic);
    }

    #[test]
    fn json_with_unknown_prediction_is_rejected() {
        let err = classify_reply(r#"{"prediction": "Unrealistic-ish"}"#).unwrap_err();
        assert!(matches!(err, PredictionError::Classification(_)));
    }

    #[test]
    fn free_text_falls_back_to_substring_match() {
        assert_eq!(classify_reply("This name is REALISTIC.").unwrap().label, Label::Realistic);
        assert_eq!(
            classify_reply("I'd say it is not realistic at all").unwrap().label,
            Label::NotRealistic
        );
        assert_eq!(classify_reply("Unrealistic.").unwrap().label, Label::NotRealistic);
    }

    #[test]
    fn negative_wins_when_both_terms_appear() {
        let c = classify_reply("Realistic? No: Not Realistic.").unwrap();
        assert_eq!(c.label, Label::NotRealistic);
    }

    #[test]
    fn ambiguous_reply_is_an_error() {
        for reply in ["I cannot tell.", "", "```json\n{}\n```"] {
            let err = classify_reply(reply).unwrap_err();
            assert!(matches!(err, PredictionError::Classification(_)), "{reply:?}");
        }
    }

    #[test]
    fn broken_json_uses_text_scan() {
        let c = classify_reply(r#"{"prediction": "Realistic""#).unwrap();
        assert_eq!(c.label, Label::Realistic);
    }
}
