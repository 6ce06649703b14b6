//! Fixed-size worker pool draining one shared queue.
//!
//! Workers pop from the back of a mutex-guarded `Vec`, so the pending
//! queue is last-in-first-out. Popping under the lock is what guarantees
//! each instance is handed to exactly one worker.

use crate::error::CrawlError;
use fedigraph_core::{FetchOrigin, Instance, InstanceMeta};
use fedigraph_fetch::ModerationFetcher;
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// How one instance's moderation list was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Downloaded,
    Cached,
    Failed,
}

impl FetchStatus {
    fn of(origin: Option<FetchOrigin>) -> Self {
        match origin {
            Some(FetchOrigin::Downloaded) => Self::Downloaded,
            Some(FetchOrigin::Cached) => Self::Cached,
            None => Self::Failed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::Cached => "cached",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Emitted once per processed instance.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEvent<'a> {
    /// Worker id, right-aligned to the width of the pool size.
    pub worker: &'a str,
    pub instance: &'a str,
    pub status: FetchStatus,
}

impl std::fmt::Display for ProgressEvent<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "worker {}: {}", self.worker, self.instance)
    }
}

/// Receives progress from every worker, possibly at the same time.
pub trait Progress: Send + Sync {
    /// Called once, before any worker starts.
    fn started(&self, _total: usize) {}

    fn processed(&self, event: &ProgressEvent<'_>);
}

/// A pool of `size` workers sharing one pending queue.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Creates a pool. A size of zero is treated as one.
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Processes every instance exactly once and returns the metadata.
    ///
    /// The result is the concatenation of each worker's output; there is no
    /// ordering across workers. Per-instance failures come back as hidden
    /// metadata. The only error is a worker task that panicked.
    pub async fn run(
        &self,
        fetcher: ModerationFetcher,
        instances: Vec<Instance>,
        progress: Arc<dyn Progress>,
    ) -> Result<Vec<InstanceMeta>, CrawlError> {
        progress.started(instances.len());

        let total = instances.len();
        let queue = Arc::new(Mutex::new(instances));
        let width = self.size.to_string().len();

        let handles = (1..=self.size).map(|id| {
            let label = format!("{:>width$}", id, width = width);
            tokio::spawn(worker(label, queue.clone(), fetcher.clone(), progress.clone()))
        });

        let mut processed = Vec::with_capacity(total);
        for handle in join_all(handles).await {
            processed.extend(handle?);
        }

        Ok(processed)
    }
}

async fn worker(
    label: String,
    queue: Arc<Mutex<Vec<Instance>>>,
    fetcher: ModerationFetcher,
    progress: Arc<dyn Progress>,
) -> Vec<InstanceMeta> {
    let mut processed = Vec::new();

    loop {
        let next = queue.lock().await.pop();
        let Some(instance) = next else {
            break;
        };

        let (meta, origin) = fetcher.build_info(&instance).await;
        let status = FetchStatus::of(origin);

        progress.processed(&ProgressEvent {
            worker: &label,
            instance: &instance.name,
            status,
        });
        processed.push(meta);
    }

    debug!("worker {} done after {} instances", label.trim(), processed.len());
    processed
}
