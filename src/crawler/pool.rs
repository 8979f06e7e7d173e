//! Bounded task pool
//!
//! Runs futures on the tokio runtime with at most `size` running at once.
//! The orchestrator, the link checker and the asset checker each own one.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Decrements the in-flight counter when a task ends, even by panic
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A set of tasks bounded by a semaphore
pub struct TaskPool<T> {
    slots: Arc<Semaphore>,
    tasks: JoinSet<T>,
    in_flight: Arc<AtomicUsize>,
}

impl<T: Send + 'static> TaskPool<T> {
    /// Creates a pool running at most `size` tasks at once (minimum 1)
    pub fn new(size: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(size.max(1))),
            tasks: JoinSet::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Starts `task` once a slot is free
    ///
    /// Blocks the caller while the pool is full. Returns `false` without
    /// starting the task if `cancel` fires first.
    pub async fn submit<F>(&mut self, task: F, cancel: &CancellationToken) -> bool
    where
        F: Future<Output = T> + Send + 'static,
    {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return false,
            permit = Arc::clone(&self.slots).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return false,
            },
        };

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        self.tasks.spawn(async move {
            let _guard = guard;
            let _permit = permit;
            task.await
        });
        true
    }

    /// Waits for every submitted task and returns their outputs
    ///
    /// Output order follows completion order. Panicked tasks are logged and
    /// skipped.
    pub async fn join(&mut self) -> Vec<T> {
        let mut outputs = Vec::with_capacity(self.tasks.len());
        while let Some(result) = self.join_next().await {
            outputs.extend(result);
        }
        outputs
    }

    /// Waits for the next task to finish
    ///
    /// Returns `None` once no tasks remain. A panicked task yields
    /// `Some(None)` after being logged.
    pub async fn join_next(&mut self) -> Option<Option<T>> {
        let result = self.tasks.join_next().await?;
        match result {
            Ok(output) => Some(Some(output)),
            Err(e) => {
                tracing::error!("Worker task failed: {}", e);
                Some(None)
            }
        }
    }

    /// Collects tasks that have already finished without waiting
    ///
    /// Long-lived pools call this between submissions so finished tasks do
    /// not pile up in the set. Returns the outputs collected.
    pub fn reap(&mut self) -> Vec<T> {
        let mut outputs = Vec::new();
        while let Some(result) = self.tasks.try_join_next() {
            match result {
                Ok(output) => outputs.push(output),
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }
        outputs
    }

    /// Returns true if every submitted task has been collected
    pub fn is_drained(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the number of submitted tasks not yet collected
    pub fn retained(&self) -> usize {
        self.tasks.len()
    }

    /// Returns the number of tasks currently running
    ///
    /// A task counts once it holds a slot, so submissions still waiting
    /// for a slot are not included.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
