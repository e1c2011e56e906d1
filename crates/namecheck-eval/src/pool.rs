//! Bounded worker pool.
//!
//! Every input becomes one task; at most `concurrency` tasks run at once.
//! Outputs are returned in input order no matter which task finishes
//! first. Dropping the future returned by [`WorkerPool::run`] aborts all
//! tasks still in flight.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

/// A task that never produced an output.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("worker task failed: {0}")]
pub struct PoolError(pub String);

/// Fixed-size pool of concurrent async workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool. A concurrency of 0 is raised to 1.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs `task` once per input and returns one outcome per input, in
    /// input order.
    pub async fn run<I, T, F, Fut>(&self, inputs: Vec<I>, task: F) -> Vec<Result<T, PoolError>>
    where
        I: Send + 'static,
        T: Send + 'static,
        F: Fn(I) -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let total = inputs.len();
        let sem = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set = JoinSet::new();

        for (index, input) in inputs.into_iter().enumerate() {
            let fut = task(input);
            let sem = Arc::clone(&sem);
            join_set.spawn(async move {
                // The semaphore is never closed, so acquire cannot fail.
                let _permit = sem.acquire_owned().await.ok();
                (index, fut.await)
            });
        }

        let mut slots: Vec<Option<Result<T, PoolError>>> = (0..total).map(|_| None).collect();
        let mut failures = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, output)) => slots[index] = Some(Ok(output)),
                Err(e) => {
                    error!("Worker task failed: {}", e);
                    failures.push(e.to_string());
                }
            }
        }

        // A panicked task loses its index; it is whichever slot stayed empty.
        let mut failures = failures.into_iter();
        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(PoolError(
                        failures.next().unwrap_or_else(|| "task did not complete".into()),
                    ))
                })
            })
            .collect()
    }
}
