//! Result artifact and console summary.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use namecheck_core::ModelId;
use serde::Serialize;
use tracing::info;

use crate::error::EvalError;
use crate::harness::{FailurePolicy, ModelRunResult, RecordOutcome};

#[derive(Debug, Serialize)]
struct PredictionEntry<'a> {
    name: &'a str,
    actual: u8,
    predicted: Option<u8>,
    attempts: u32,
    error: Option<String>,
}

impl<'a> From<&'a RecordOutcome> for PredictionEntry<'a> {
    fn from(outcome: &'a RecordOutcome) -> Self {
        Self {
            name: &outcome.name,
            actual: outcome.expected.as_bit(),
            predicted: outcome.predicted.map(|l| l.as_bit()),
            attempts: outcome.attempts,
            error: outcome.error.as_ref().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ModelReport<'a> {
    accuracy: f64,
    elapsed_seconds: f64,
    total: usize,
    correct: usize,
    failed: usize,
    total_failure: bool,
    failure_policy: FailurePolicy,
    predictions: Vec<PredictionEntry<'a>>,
}

impl<'a> From<&'a ModelRunResult> for ModelReport<'a> {
    fn from(result: &'a ModelRunResult) -> Self {
        Self {
            accuracy: result.accuracy,
            elapsed_seconds: result.elapsed_seconds(),
            total: result.total,
            correct: result.correct,
            failed: result.failed,
            total_failure: result.total_failure,
            failure_policy: result.failure_policy,
            predictions: result.predictions.iter().map(PredictionEntry::from).collect(),
        }
    }
}

fn to_report(results: &BTreeMap<ModelId, ModelRunResult>) -> BTreeMap<&'static str, ModelReport<'_>> {
    results
        .iter()
        .map(|(model, result)| (model.as_str(), ModelReport::from(result)))
        .collect()
}

/// Writes the per-model results as pretty JSON, keyed by model identifier.
pub fn write_report(
    path: impl AsRef<Path>,
    results: &BTreeMap<ModelId, ModelRunResult>,
) -> Result<(), EvalError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let file = File::create(path).map_err(|e| EvalError::io(&shown, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &to_report(results))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| EvalError::io(&shown, e))?;

    info!("Detailed results saved to {}", shown);
    Ok(())
}

/// Renders the accuracy comparison table printed after a run.
pub fn format_summary(results: &BTreeMap<ModelId, ModelRunResult>) -> String {
    let mut out = String::from("\n=== Accuracy Comparison ===\n");
    for (model, r) in results {
        let _ = write!(
            out,
            "{:<14} {:.4} ({:>6.2}%)  {:>8.2}s  {}/{} failed",
            model.as_str(),
            r.accuracy,
            r.accuracy * 100.0,
            r.elapsed_seconds(),
            r.failed,
            r.total
        );
        if r.total_failure {
            out.push_str("  TOTAL FAILURE");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use namecheck_core::{Label, PredictionError};

    fn sample() -> BTreeMap<ModelId, ModelRunResult> {
        let outcomes = vec![
            RecordOutcome {
                name: "John".into(),
                expected: Label::Realistic,
                predicted: Some(Label::Realistic),
                attempts: 1,
                error: None,
            },
            RecordOutcome {
                name: "Xyzzy9!!".into(),
                expected: Label::NotRealistic,
                predicted: None,
                attempts: 3,
                error: Some(PredictionError::Upstream("502".into())),
            },
        ];
        let result = ModelRunResult::from_outcomes(
            ModelId::Gpt4oMini,
            outcomes,
            Duration::from_millis(1500),
            FailurePolicy::CountAsIncorrect,
        );
        BTreeMap::from([(ModelId::Gpt4oMini, result)])
    }

    #[test]
    fn report_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        write_report(&path, &sample()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let model = &value["gpt-4o-mini"];
        assert_eq!(model["accuracy"], 0.5);
        assert_eq!(model["elapsed_seconds"], 1.5);
        assert_eq!(model["failed"], 1);
        assert_eq!(model["total_failure"], false);
        assert_eq!(model["failure_policy"], "incorrect");
        assert_eq!(
            model["predictions"][0],
            serde_json::json!({"name": "John", "actual": 1, "predicted": 1, "attempts": 1, "error": null})
        );
        assert_eq!(model["predictions"][1]["predicted"], serde_json::Value::Null);
        assert_eq!(model["predictions"][1]["attempts"], 3);
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let err = write_report("/nonexistent/dir/results.json", &sample()).unwrap_err();
        assert!(matches!(err, EvalError::Io { .. }));
    }

    #[test]
    fn summary_lists_each_model() {
        let summary = format_summary(&sample());
        assert!(summary.contains("=== Accuracy Comparison ==="));
        assert!(summary.contains("gpt-4o-mini"));
        assert!(summary.contains("0.5000"));
        assert!(!summary.contains("TOTAL FAILURE"));
    }

    #[test]
    fn summary_marks_total_failure() {
        let outcomes = vec![RecordOutcome {
            name: "John".into(),
            expected: Label::Realistic,
            predicted: None,
            attempts: 3,
            error: Some(PredictionError::Timeout(Duration::from_secs(10))),
        }];
        let failed = ModelRunResult::from_outcomes(
            ModelId::Gpt41Nano,
            outcomes,
            Duration::from_secs(2),
            FailurePolicy::CountAsIncorrect,
        );
        let mut results = sample();
        results.insert(ModelId::Gpt41Nano, failed);

        let summary = format_summary(&results);
        let nano = summary.lines().find(|l| l.starts_with("gpt-4.1-nano")).unwrap();
        assert!(nano.ends_with("TOTAL FAILURE"));
        assert!(nano.contains("1/1 failed"));
        let mini = summary.lines().find(|l| l.starts_with("gpt-4o-mini")).unwrap();
        assert!(!mini.contains("TOTAL FAILURE"));
    }
}
