use fedigraph_fetch::FetchError;
use fedigraph_graph::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("pool size must be at least 1")]
    ZeroPoolSize,
    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,
    #[error("registry URL is empty")]
    EmptyRegistryUrl,
}

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load instances: {0}")]
    Registry(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
