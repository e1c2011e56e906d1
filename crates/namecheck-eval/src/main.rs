//! Evaluation harness entry point.
//!
//! Sweeps a labeled dataset through a running prediction service once per
//! model, prints an accuracy table, and writes the detailed JSON report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use namecheck_eval::{
    format_summary, load_dataset, parse_models, write_report, Backoff, Evaluator, FailurePolicy,
    HttpPredictor, RetryPolicy, WorkerPool,
};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum BackoffKind {
    Fixed,
    Exponential,
}

#[derive(Debug, Parser)]
#[command(name = "namecheck-eval", version, about = "Measure name classification accuracy per model")]
struct Args {
    /// CSV dataset with a `Name,Is_Valid` header.
    #[arg(long, env = "NAMECHECK_DATASET", default_value = "test_names.csv")]
    dataset: PathBuf,

    /// Prediction endpoint.
    #[arg(long, env = "NAMECHECK_API_URL", default_value = "http://localhost:5000/predict")]
    api_url: String,

    /// Model to evaluate; repeat for several.
    #[arg(long = "model", default_values_t = vec!["gpt-4.1-mini".to_string(), "gpt-4o-mini".to_string()])]
    models: Vec<String>,

    /// Concurrent requests per model sweep.
    #[arg(long, env = "NAMECHECK_WORKERS", default_value_t = 20)]
    workers: usize,

    /// Attempts per record, including the first.
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Delay after a failed attempt (initial delay for exponential backoff).
    #[arg(long, default_value_t = 2000)]
    backoff_ms: u64,

    #[arg(long, value_enum, default_value_t = BackoffKind::Fixed)]
    backoff: BackoffKind,

    /// Timeout ceiling for each prediction request.
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,

    /// `incorrect` keeps failed records in the denominator, `exclude` drops them.
    #[arg(long, default_value_t = FailurePolicy::CountAsIncorrect)]
    failure_policy: FailurePolicy,

    /// JSON report path.
    #[arg(long, default_value = "model_comparison_results.json")]
    output: PathBuf,

    /// Sweep all models at the same time instead of one after another.
    #[arg(long)]
    concurrent_models: bool,
}

impl Args {
    fn retry_policy(&self) -> RetryPolicy {
        let delay = Duration::from_millis(self.backoff_ms);
        let backoff = match self.backoff {
            BackoffKind::Fixed => Backoff::Fixed(delay),
            BackoffKind::Exponential => Backoff::exponential(delay),
        };
        RetryPolicy::new(self.max_attempts, backoff)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let args = Args::parse();

    let models = parse_models(&args.models).context("invalid model selection")?;
    let dataset = load_dataset(&args.dataset)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?;

    let predictor = HttpPredictor::new(&args.api_url, Duration::from_secs(args.request_timeout_secs))?;
    info!("Using prediction service at {}", predictor.url());

    let evaluator = Evaluator::new(Arc::new(predictor), WorkerPool::new(args.workers), args.retry_policy())
        .with_failure_policy(args.failure_policy)
        .with_concurrent_models(args.concurrent_models);

    let results = tokio::select! {
        results = evaluator.evaluate(&dataset, &models) => results?,
        _ = tokio::signal::ctrl_c() => {
            warn!("Evaluation cancelled; in-flight requests aborted");
            anyhow::bail!("evaluation cancelled before completion, no report written");
        }
    };

    println!("{}", format_summary(&results));
    write_report(&args.output, &results)?;

    Ok(())
}
