//! Model sweeps and accuracy aggregation.
//!
//! A sweep sends every dataset record to the predictor once (plus retries)
//! through the worker pool. Each worker returns its own [`RecordOutcome`];
//! the sweep merges them by input position after the pool drains, so there
//! are no interleaved writes and exactly one outcome per record.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use namecheck_core::{Label, ModelId, NameRecord, PredictionError};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::EvalError;
use crate::pool::WorkerPool;
use crate::predictor::Predictor;
use crate::retry::RetryPolicy;

/// How records whose prediction ultimately failed enter the accuracy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum FailurePolicy {
    /// Failed records stay in the denominator and count as mismatches.
    #[default]
    #[serde(rename = "incorrect")]
    CountAsIncorrect,
    /// Failed records are left out of the denominator.
    #[serde(rename = "exclude")]
    Exclude,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CountAsIncorrect => f.write_str("incorrect"),
            Self::Exclude => f.write_str("exclude"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incorrect" => Ok(Self::CountAsIncorrect),
            "exclude" => Ok(Self::Exclude),
            other => Err(format!("unknown failure policy '{}' (expected incorrect or exclude)", other)),
        }
    }
}

/// Final outcome for one record in one sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordOutcome {
    pub name: String,
    pub expected: Label,
    /// `None` when every attempt failed.
    pub predicted: Option<Label>,
    pub attempts: u32,
    pub error: Option<PredictionError>,
}

impl RecordOutcome {
    fn failed(record: NameRecord, attempts: u32, error: PredictionError) -> Self {
        Self {
            name: record.name,
            expected: record.expected,
            predicted: None,
            attempts,
            error: Some(error),
        }
    }

    pub fn is_correct(&self) -> bool {
        self.predicted == Some(self.expected)
    }

    pub fn is_failed(&self) -> bool {
        self.predicted.is_none()
    }
}

/// Aggregated result of one model's sweep.
#[derive(Debug, Clone)]
pub struct ModelRunResult {
    pub model: ModelId,
    /// In `[0, 1]`; see [`FailurePolicy`] for the denominator.
    pub accuracy: f64,
    pub elapsed: Duration,
    pub total: usize,
    pub correct: usize,
    pub failed: usize,
    /// Every record failed; the accuracy is not a measurement.
    pub total_failure: bool,
    pub failure_policy: FailurePolicy,
    /// One entry per dataset record, in dataset order.
    pub predictions: Vec<RecordOutcome>,
}

impl ModelRunResult {
    /// Aggregates per-record outcomes into a run result.
    pub fn from_outcomes(
        model: ModelId,
        predictions: Vec<RecordOutcome>,
        elapsed: Duration,
        failure_policy: FailurePolicy,
    ) -> Self {
        let total = predictions.len();
        let correct = predictions.iter().filter(|o| o.is_correct()).count();
        let failed = predictions.iter().filter(|o| o.is_failed()).count();

        let denominator = match failure_policy {
            FailurePolicy::CountAsIncorrect => total,
            FailurePolicy::Exclude => total - failed,
        };
        let accuracy = if denominator == 0 {
            0.0
        } else {
            correct as f64 / denominator as f64
        };

        Self {
            model,
            accuracy,
            elapsed,
            total,
            correct,
            failed,
            total_failure: total > 0 && failed == total,
            failure_policy,
            predictions,
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Parses and de-duplicates model identifiers, keeping first-seen order.
pub fn parse_models<S: AsRef<str>>(raw: &[S]) -> Result<Vec<ModelId>, EvalError> {
    let mut models = Vec::new();
    for id in raw {
        let model: ModelId = id.as_ref().trim().parse()?;
        if !models.contains(&model) {
            models.push(model);
        }
    }
    if models.is_empty() {
        return Err(EvalError::Configuration("no models to evaluate".into()));
    }
    Ok(models)
}

/// Runs sweeps over a dataset for a set of models.
pub struct Evaluator {
    predictor: Arc<dyn Predictor>,
    pool: WorkerPool,
    retry: RetryPolicy,
    failure_policy: FailurePolicy,
    concurrent_models: bool,
}

impl Evaluator {
    pub fn new(predictor: Arc<dyn Predictor>, pool: WorkerPool, retry: RetryPolicy) -> Self {
        Self {
            predictor,
            pool,
            retry,
            failure_policy: FailurePolicy::default(),
            concurrent_models: false,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Runs the sweeps for different models at the same time, each with
    /// its own pool.
    pub fn with_concurrent_models(mut self, concurrent: bool) -> Self {
        self.concurrent_models = concurrent;
        self
    }

    /// Evaluates every model over the dataset.
    ///
    /// Setup problems fail before any prediction is attempted. Per-record
    /// failures are recorded in the results and never abort a sweep.
    pub async fn evaluate(
        &self,
        dataset: &[NameRecord],
        models: &[ModelId],
    ) -> Result<BTreeMap<ModelId, ModelRunResult>, EvalError> {
        if dataset.is_empty() {
            return Err(EvalError::Configuration("dataset is empty".into()));
        }
        if models.is_empty() {
            return Err(EvalError::Configuration("no models to evaluate".into()));
        }

        let results = if self.concurrent_models {
            join_all(models.iter().map(|&model| self.sweep(model, dataset))).await
        } else {
            let mut results = Vec::with_capacity(models.len());
            for &model in models {
                results.push(self.sweep(model, dataset).await);
            }
            results
        };

        Ok(results.into_iter().map(|r| (r.model, r)).collect())
    }

    /// One full pass over the dataset for a single model.
    pub async fn sweep(&self, model: ModelId, dataset: &[NameRecord]) -> ModelRunResult {
        info!(
            "Evaluating model {} on {} names ({} workers, {} attempts max)",
            model,
            dataset.len(),
            self.pool.concurrency(),
            self.retry.max_attempts()
        );
        let start = Instant::now();

        let predictor = Arc::clone(&self.predictor);
        let retry = self.retry;
        let outputs = self
            .pool
            .run(dataset.to_vec(), move |record: NameRecord| {
                let predictor = Arc::clone(&predictor);
                async move {
                    let attempted = retry
                        .run(
                            || predictor.predict(&record.name, model),
                            PredictionError::is_retryable,
                        )
                        .await;

                    match attempted.result {
                        Ok(label) => RecordOutcome {
                            name: record.name,
                            expected: record.expected,
                            predicted: Some(label),
                            attempts: attempted.attempts,
                            error: None,
                        },
                        Err(e) => {
                            error!(
                                "Error for name '{}' with model '{}' after {} attempt(s): {}",
                                record.name, model, attempted.attempts, e
                            );
                            RecordOutcome::failed(record, attempted.attempts, e)
                        }
                    }
                }
            })
            .await;

        let predictions: Vec<RecordOutcome> = outputs
            .into_iter()
            .zip(dataset.iter().cloned())
            .map(|(output, record)| {
                output.unwrap_or_else(|e| {
                    RecordOutcome::failed(record, 0, PredictionError::Upstream(e.to_string()))
                })
            })
            .collect();

        let result =
            ModelRunResult::from_outcomes(model, predictions, start.elapsed(), self.failure_policy);

        if result.total_failure {
            warn!("Model {}: every prediction failed ({} records)", model, result.total);
        }
        info!(
            "Model {} completed in {:.2}s with accuracy {:.4} ({} failed)",
            model,
            result.elapsed_seconds(),
            result.accuracy,
            result.failed
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(expected: Label, predicted: Option<Label>) -> RecordOutcome {
        RecordOutcome {
            name: "n".into(),
            expected,
            predicted,
            attempts: 1,
            error: predicted.is_none().then(|| PredictionError::Upstream("x".into())),
        }
    }

    #[test]
    fn failures_count_as_incorrect_by_default() {
        let outcomes = vec![
            outcome(Label::Realistic, Some(Label::Realistic)),
            outcome(Label::NotRealistic, None),
        ];
        let r = ModelRunResult::from_outcomes(
            ModelId::Gpt41,
            outcomes,
            Duration::ZERO,
            FailurePolicy::default(),
        );
        assert_eq!(r.accuracy, 0.5);
        assert_eq!((r.total, r.correct, r.failed), (2, 1, 1));
        assert!(!r.total_failure);
    }

    #[test]
    fn exclude_policy_drops_failures_from_denominator() {
        let outcomes = vec![
            outcome(Label::Realistic, Some(Label::Realistic)),
            outcome(Label::NotRealistic, None),
        ];
        let r = ModelRunResult::from_outcomes(
            ModelId::Gpt41,
            outcomes,
            Duration::ZERO,
            FailurePolicy::Exclude,
        );
        assert_eq!(r.accuracy, 1.0);
    }

    #[test]
    fn all_failed_is_flagged_with_zero_accuracy() {
        for policy in [FailurePolicy::CountAsIncorrect, FailurePolicy::Exclude] {
            let outcomes = vec![
                outcome(Label::Realistic, None),
                outcome(Label::NotRealistic, None),
            ];
            let r = ModelRunResult::from_outcomes(ModelId::Gpt41, outcomes, Duration::ZERO, policy);
            assert_eq!(r.accuracy, 0.0);
            assert!(r.total_failure);
        }
    }

    #[test]
    fn failure_policy_parses() {
        assert_eq!("incorrect".parse::<FailurePolicy>(), Ok(FailurePolicy::CountAsIncorrect));
        assert_eq!("exclude".parse::<FailurePolicy>(), Ok(FailurePolicy::Exclude));
        assert!("drop".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn parse_models_dedupes_and_rejects_unknown() {
        let models = parse_models(&["gpt-4o-mini", "gpt-4.1", "gpt-4o-mini"]).unwrap();
        assert_eq!(models, vec![ModelId::Gpt4oMini, ModelId::Gpt41]);

        let err = parse_models(&["gpt-4o-mini", "llama"]).unwrap_err();
        assert!(matches!(err, EvalError::Configuration(msg) if msg.contains("llama")));

        assert!(parse_models::<&str>(&[]).is_err());
    }
}
