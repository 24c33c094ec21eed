//! Render worker pool
//!
//! Rasterization and composition are CPU-bound. They run on tokio's
//! blocking threads, never on the executor that accepts inbound events, and
//! a semaphore caps how many run at once so one sender's rendering cannot
//! starve everyone else.
//!
//! ```text
//!  run(job) ──► acquire permit ──► spawn_blocking(job) ──► release permit
//!                 [queued]            [active++]            [active--, completed++]
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;

use crate::document::DocumentError;

/// Worker pool failures
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("Render pool is shut down")]
    Closed,

    #[error("Render job panicked: {0}")]
    Panicked(String),
}

impl From<PoolError> for DocumentError {
    fn from(err: PoolError) -> Self {
        DocumentError::ThreadPoolError(err.to_string())
    }
}

/// Bounded pool for CPU-bound render jobs
#[derive(Clone)]
pub struct RenderPool {
    inner: Arc<RenderPoolInner>,
}

struct RenderPoolInner {
    permits: Arc<Semaphore>,
    max_workers: usize,
    /// Jobs currently executing
    active: AtomicUsize,
    /// Jobs finished (successfully or not)
    completed: AtomicUsize,
}

impl RenderPool {
    /// Create a pool running at most `max_workers` jobs concurrently
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            inner: Arc::new(RenderPoolInner {
                permits: Arc::new(Semaphore::new(max_workers)),
                max_workers,
                active: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
            }),
        }
    }

    /// Run `job` on a blocking thread once a worker slot is free
    pub async fn run<F, T>(&self, job: F) -> Result<T, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;

        let inner = Arc::clone(&self.inner);
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let _active = ActiveJob::start(&inner);
            job()
        });

        handle.await.map_err(|e| {
            tracing::error!(error = %e, "Render job failed to complete");
            PoolError::Panicked(e.to_string())
        })
    }

    /// Stop accepting new jobs; queued callers receive `PoolError::Closed`
    pub fn close(&self) {
        self.inner.permits.close();
    }

    /// Get pool statistics
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            max_workers: self.inner.max_workers,
            active: self.inner.active.load(Ordering::Relaxed),
            completed: self.inner.completed.load(Ordering::Relaxed),
            available: self.inner.permits.available_permits(),
        }
    }
}

impl Default for RenderPool {
    fn default() -> Self {
        Self::new(default_workers())
    }
}

/// Worker count matching the machine's available parallelism
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// RAII guard tracking an executing job
struct ActiveJob<'a> {
    inner: &'a RenderPoolInner,
}

impl<'a> ActiveJob<'a> {
    fn start(inner: &'a RenderPoolInner) -> Self {
        inner.active.fetch_add(1, Ordering::Relaxed);
        Self { inner }
    }
}

impl Drop for ActiveJob<'_> {
    fn drop(&mut self) {
        self.inner.active.fetch_sub(1, Ordering::Relaxed);
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Pool statistics
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    /// Maximum concurrent jobs
    pub max_workers: usize,
    /// Jobs currently executing
    pub active: usize,
    /// Jobs finished since start
    pub completed: usize,
    /// Free worker slots
    pub available: usize,
}
