//! Evaluation harness for the namecheck prediction service.
//!
//! Reads a labeled dataset, sweeps it once per model through a bounded
//! worker pool, and reports accuracy and wall-clock time per model.
//!
//! - [`load_dataset`] — `Name,Is_Valid` CSV into [`NameRecord`](namecheck_core::NameRecord)s
//! - [`Predictor`] / [`HttpPredictor`] — One prediction per call
//! - [`RetryPolicy`] — Bounded attempts with fixed or exponential backoff
//! - [`WorkerPool`] — Bounded concurrency, outputs in input order
//! - [`Evaluator`] — Runs sweeps and aggregates [`ModelRunResult`]s
//! - [`write_report`] / [`format_summary`] — JSON artifact and console table
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use namecheck_core::ModelId;
//! use namecheck_eval::{load_dataset, Evaluator, HttpPredictor, RetryPolicy, WorkerPool};
//!
//! let dataset = load_dataset("test_names.csv")?;
//! let predictor = HttpPredictor::new("http://localhost:5000/predict", Duration::from_secs(10))?;
//! let evaluator = Evaluator::new(Arc::new(predictor), WorkerPool::new(20), RetryPolicy::default());
//! let results = evaluator.evaluate(&dataset, &[ModelId::Gpt4oMini]).await?;
//! ```

mod dataset;
mod error;
mod harness;
mod pool;
mod predictor;
mod report;
mod retry;

pub use dataset::{load_dataset, load_dataset_from_reader};
pub use error::EvalError;
pub use harness::{parse_models, Evaluator, FailurePolicy, ModelRunResult, RecordOutcome};
pub use pool::{PoolError, WorkerPool};
pub use predictor::{HttpPredictor, Predictor};
pub use report::{format_summary, write_report};
pub use retry::{Attempted, Backoff, RetryPolicy};
