//! Bounded fan-out for per-repository work.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinError;

/// Runs independent keyed units with at most `limit` in flight
#[derive(Debug, Clone)]
pub struct WorkerPool {
    limit: usize,
}

impl WorkerPool {
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Spawn one task per unit and wait for every one of them.
    ///
    /// Results come back in submission order. A unit that panics yields a
    /// `JoinError` for its own key and does not affect its siblings.
    pub async fn run<T, F, Fut, R>(
        &self,
        units: Vec<(String, T)>,
        work: F,
    ) -> Vec<(String, Result<R, JoinError>)>
    where
        T: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let work = Arc::new(work);
        let sem = Arc::new(Semaphore::new(self.limit));

        let mut tasks = Vec::with_capacity(units.len());
        for (key, unit) in units {
            let work = Arc::clone(&work);
            let sem = Arc::clone(&sem);
            let handle = tokio::spawn(async move {
                // The semaphore is never closed
                let _permit = sem.acquire_owned().await.ok();
                work(unit).await
            });
            tasks.push((key, handle));
        }

        let mut results = Vec::with_capacity(tasks.len());
        for (key, handle) in tasks {
            results.push((key, handle.await));
        }
        results
    }
}
