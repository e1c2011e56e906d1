//! Bounded retry with backoff.
//!
//! The policy is composed explicitly around a call site: the caller passes
//! the operation and a predicate deciding which errors are worth another
//! attempt. Exactly one final result comes back regardless of how many
//! attempts were made.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(2000);
const EXPONENTIAL_CAP: Duration = Duration::from_secs(30);

/// Delay schedule between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay after every failed attempt.
    Fixed(Duration),
    /// `initial`, then doubling after each failure, never above `max`.
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Exponential backoff from `initial` with the default 30 s cap.
    pub fn exponential(initial: Duration) -> Self {
        Self::Exponential { initial, max: EXPONENTIAL_CAP }
    }

    /// Delay to wait after the `failed_attempt`-th failure (1-based).
    pub fn delay(&self, failed_attempt: u32) -> Duration {
        match *self {
            Self::Fixed(delay) => delay,
            Self::Exponential { initial, max } => {
                let shift = failed_attempt.saturating_sub(1).min(31);
                initial.saturating_mul(1u32 << shift).min(max)
            }
        }
    }
}

/// Final outcome of a retried operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempted<T, E> {
    pub result: Result<T, E>,
    /// Number of attempts made, at least 1.
    pub attempts: u32,
}

/// Retry policy: attempt ceiling plus backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    /// Three attempts two seconds apart.
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Backoff::Fixed(DEFAULT_BACKOFF))
    }
}

impl RetryPolicy {
    /// Creates a policy. `max_attempts` below 1 is raised to 1.
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Backoff::Fixed(Duration::ZERO))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt ceiling is reached.
    pub async fn run<T, E, F, Fut, P>(&self, mut op: F, retryable: P) -> Attempted<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = op().await;

            let retry = match &result {
                Ok(_) => false,
                Err(e) => attempts < self.max_attempts && retryable(e),
            };
            if !retry {
                return Attempted { result, attempts };
            }

            let delay = self.backoff.delay(attempts);
            debug!("Attempt {} failed, retrying in {:?}", attempts, delay);
            tokio::time::sleep(delay).await;
        }
    }
}
