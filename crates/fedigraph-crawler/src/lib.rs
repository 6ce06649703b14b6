//! Fedigraph Crawler - one full crawl, start to finish
//!
//! The [`Crawler`] loads the instance registry, fans moderation lookups out
//! over a fixed-size [`WorkerPool`], aggregates the results into the
//! moderation graph and writes the artifact.
//!
//! Only a missing registry stops a run. Every per-instance failure is
//! absorbed: the instance is marked hidden and the crawl moves on.

mod config;
mod crawler;
mod error;
mod pool;

pub use config::{CrawlConfig, DEFAULT_POOL_SIZE, DEFAULT_REGISTRY_URL};
pub use crawler::{CrawlReport, Crawler};
pub use error::{ConfigError, CrawlError};
pub use pool::{FetchStatus, Progress, ProgressEvent, WorkerPool};
