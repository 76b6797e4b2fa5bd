//! Off-loop execution of blocking collaborator calls
//!
//! Transcription and synthesis block their calling thread. They run on tokio's
//! blocking pool, gated by a process-wide semaphore so one slow session cannot
//! starve the others of worker threads.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Blocking task '{task}' panicked")]
    Panicked { task: &'static str },
    #[error("Blocking task '{task}' was cancelled")]
    Cancelled { task: &'static str },
    #[error("Dispatcher is shutting down")]
    Closed,
}

/// Runs blocking closures without stalling the async executor
#[derive(Clone)]
pub struct BlockingDispatcher {
    permits: Arc<Semaphore>,
}

impl BlockingDispatcher {
    /// `workers` is the maximum number of blocking calls in flight at once
    pub fn new(workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Run `f` on the blocking pool and await its result
    ///
    /// The permit is held by the blocking thread until `f` returns, so the cap
    /// holds even if the awaiting future is dropped.
    pub async fn run<F, T>(&self, task: &'static str, f: F) -> Result<T, DispatchError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| DispatchError::Closed)?;

        let started = std::time::Instant::now();
        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            f()
        })
        .await;

        match result {
            Ok(value) => {
                tracing::debug!(task, duration_ms = %started.elapsed().as_millis(), "Blocking task finished");
                Ok(value)
            }
            Err(e) if e.is_panic() => Err(DispatchError::Panicked { task }),
            Err(_) => Err(DispatchError::Cancelled { task }),
        }
    }

    #[cfg(test)]
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}
