//! Crawl orchestration: registry → worker pool → graph → artifact.

use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::pool::{FetchStatus, Progress, ProgressEvent, WorkerPool};
use chrono::Utc;
use fedigraph_core::{Instance, InstanceList, InstanceSet};
use fedigraph_fetch::{
    bearer_headers, CacheGate, CacheOutcome, HeaderMap, JsonSource, ModerationFetcher, TimedFetch,
};
use fedigraph_graph::{aggregate, ArtifactStore, GraphArtifact, GraphStats};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Summary of a finished crawl.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub instances: usize,
    pub public: usize,
    pub hidden: usize,
    pub downloaded: usize,
    pub cached: usize,
    pub graph: GraphStats,
    pub artifact: PathBuf,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u128(d.as_millis())
}

/// Runs one crawl from a [`CrawlConfig`].
pub struct Crawler {
    config: CrawlConfig,
    gate: CacheGate,
}

impl Crawler {
    /// Creates a crawler that talks to the network with [`TimedFetch`].
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        let source = TimedFetch::new(config.fetch_timeout)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Creates a crawler over an arbitrary [`JsonSource`].
    pub fn with_source(config: CrawlConfig, source: Arc<dyn JsonSource>) -> Result<Self, CrawlError> {
        config.validate()?;
        Ok(Self {
            config,
            gate: CacheGate::new(source),
        })
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Loads the registry listing, from cache when present.
    pub async fn fetch_registry(&self) -> Result<Vec<Instance>, CrawlError> {
        let headers = match &self.config.api_token {
            Some(token) => bearer_headers(token)?,
            None => HeaderMap::new(),
        };

        let outcome = self
            .gate
            .fetch::<InstanceList>(
                &self.config.registry_list_url(),
                &self.config.registry_cache_path(),
                &headers,
            )
            .await;

        match outcome {
            CacheOutcome::Downloaded(list) => {
                debug!("registry downloaded");
                Ok(list.instances)
            }
            CacheOutcome::Cached(list) => {
                debug!("registry read from {}", self.config.registry_cache_path().display());
                Ok(list.instances)
            }
            CacheOutcome::Error(message) => Err(CrawlError::Registry(message)),
        }
    }

    /// Performs a full crawl and writes the graph artifact.
    ///
    /// Fails before any per-instance work if the registry is unavailable,
    /// in which case no artifact is written.
    pub async fn run(&self, progress: Arc<dyn Progress>) -> Result<CrawlReport, CrawlError> {
        let started = Instant::now();

        let instances = self.fetch_registry().await?;
        info!("got {} instances", instances.len());

        let known = Arc::new(InstanceSet::from_names(
            instances.iter().map(|instance| instance.name.clone()),
        ));
        let fetcher = ModerationFetcher::new(
            self.gate.clone(),
            known,
            self.config.moderation_cache_dir(),
        );

        let tally = Arc::new(Tally::new(progress));
        let total = instances.len();
        let metas = WorkerPool::new(self.config.pool_size)
            .run(fetcher, instances, tally.clone())
            .await?;
        info!("done getting instance info");

        let graph = aggregate(&metas);
        let stats = graph.stats();
        info!(
            "converted to graph: {} nodes and {} links",
            stats.node_count, stats.link_count
        );

        let store = ArtifactStore::new(self.config.artifact_path.clone());
        store.save(&GraphArtifact::new(graph, Utc::now())).await?;
        info!("wrote graph file {}", store.path().display());

        let public = metas.iter().filter(|meta| meta.is_public()).count();
        Ok(CrawlReport {
            instances: total,
            public,
            hidden: metas.len() - public,
            downloaded: tally.downloaded.load(Ordering::Relaxed),
            cached: tally.cached.load(Ordering::Relaxed),
            graph: stats,
            artifact: store.path().to_path_buf(),
            duration: started.elapsed(),
        })
    }
}

/// Counts fetch statuses on the way through to the caller's progress sink.
struct Tally {
    inner: Arc<dyn Progress>,
    downloaded: AtomicUsize,
    cached: AtomicUsize,
}

impl Tally {
    fn new(inner: Arc<dyn Progress>) -> Self {
        Self {
            inner,
            downloaded: AtomicUsize::new(0),
            cached: AtomicUsize::new(0),
        }
    }
}

impl Progress for Tally {
    fn started(&self, total: usize) {
        self.inner.started(total);
    }

    fn processed(&self, event: &ProgressEvent<'_>) {
        match event.status {
            FetchStatus::Downloaded => {
                self.downloaded.fetch_add(1, Ordering::Relaxed);
            }
            FetchStatus::Cached => {
                self.cached.fetch_add(1, Ordering::Relaxed);
            }
            FetchStatus::Failed => {}
        }
        self.inner.processed(event);
    }
}
