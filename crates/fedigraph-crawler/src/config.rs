//! Crawl configuration.
//!
//! Everything a run depends on lives in one [`CrawlConfig`] value handed to
//! the [`Crawler`](crate::Crawler). Library code never reads the environment.

use crate::error::ConfigError;
use fedigraph_fetch::DEFAULT_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REGISTRY_URL: &str = "https://instances.social/api/1.0";
pub const DEFAULT_POOL_SIZE: usize = 15;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Base URL of the instance registry API.
    pub registry_url: String,

    /// Bearer token for the registry. Not needed once the registry is cached.
    pub api_token: Option<String>,

    /// Root of the on-disk cache.
    pub data_dir: PathBuf,

    /// Where the graph artifact is written.
    pub artifact_path: PathBuf,

    /// Number of concurrent workers, which is also the cap on in-flight requests.
    pub pool_size: usize,

    /// Deadline for each remote request.
    pub fetch_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            api_token: None,
            artifact_path: data_dir.join("instance-graph.json"),
            data_dir,
            pool_size: DEFAULT_POOL_SIZE,
            fetch_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CrawlConfig {
    /// Same defaults, rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            artifact_path: data_dir.join("instance-graph.json"),
            data_dir,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.registry_url.trim().is_empty() {
            return Err(ConfigError::EmptyRegistryUrl);
        }
        Ok(())
    }

    /// The full registry listing, unpaginated.
    pub fn registry_list_url(&self) -> String {
        format!(
            "{}/instances/list?count=0",
            self.registry_url.trim_end_matches('/')
        )
    }

    pub fn registry_cache_path(&self) -> PathBuf {
        self.data_dir.join("instances.json")
    }

    /// Directory holding one block-list file per instance.
    pub fn moderation_cache_dir(&self) -> PathBuf {
        self.data_dir.join("instances")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CrawlConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.pool_size, 15);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.artifact_path, PathBuf::from("data/instance-graph.json"));
        assert_eq!(config.registry_cache_path(), PathBuf::from("data/instances.json"));
        assert_eq!(config.moderation_cache_dir(), PathBuf::from("data/instances"));
    }

    #[test]
    fn test_registry_url_tolerates_trailing_slash() {
        let config = CrawlConfig {
            registry_url: "https://registry.example/api/1.0/".into(),
            ..CrawlConfig::default()
        };

        assert_eq!(
            config.registry_list_url(),
            "https://registry.example/api/1.0/instances/list?count=0"
        );
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let zero_pool = CrawlConfig {
            pool_size: 0,
            ..CrawlConfig::default()
        };
        let zero_timeout = CrawlConfig {
            fetch_timeout: Duration::ZERO,
            ..CrawlConfig::default()
        };
        let no_registry = CrawlConfig {
            registry_url: "  ".into(),
            ..CrawlConfig::default()
        };

        assert!(matches!(zero_pool.validate(), Err(ConfigError::ZeroPoolSize)));
        assert!(matches!(zero_timeout.validate(), Err(ConfigError::ZeroTimeout)));
        assert!(matches!(no_registry.validate(), Err(ConfigError::EmptyRegistryUrl)));
    }

    #[test]
    fn test_with_data_dir_moves_artifact() {
        let config = CrawlConfig::with_data_dir("/tmp/crawl");
        assert_eq!(config.artifact_path, PathBuf::from("/tmp/crawl/instance-graph.json"));
    }
}
