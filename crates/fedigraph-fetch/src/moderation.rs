//! Fetching one instance's public block list.

use crate::cache::{CacheGate, CacheOutcome};
use crate::error::FetchError;
use fedigraph_core::{
    FetchOrigin, Instance, InstanceMeta, InstanceSet, ModerationEntry, ModerationOutcome,
};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// The Mastodon-compatible endpoint listing an instance's domain blocks.
pub fn moderation_url(instance: &str) -> String {
    format!("https://{}/api/v1/instance/domain_blocks", instance)
}

/// Cache file for an instance's block list under `cache_dir`.
///
/// Fails for names that are not a single plain path component, so a
/// registry entry can never point a cache write outside `cache_dir`.
pub fn moderation_cache_path(cache_dir: &Path, instance: &str) -> Result<PathBuf, FetchError> {
    let plain = !instance.is_empty()
        && instance != "."
        && instance != ".."
        && !instance.contains(['/', '\\', '\0']);
    if !plain {
        return Err(FetchError::InvalidInstanceName(instance.to_string()));
    }
    Ok(cache_dir.join(format!("{}-moderated.json", instance)))
}

/// Reads block lists through the cache gate and drops rows about
/// instances the registry does not know.
#[derive(Clone)]
pub struct ModerationFetcher {
    gate: CacheGate,
    known: Arc<InstanceSet>,
    cache_dir: PathBuf,
}

impl ModerationFetcher {
    pub fn new(gate: CacheGate, known: Arc<InstanceSet>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            gate,
            known,
            cache_dir: cache_dir.into(),
        }
    }

    pub fn known(&self) -> &InstanceSet {
        &self.known
    }

    /// Fetches and filters `instance`'s block list. Never fails.
    ///
    /// The list must be a JSON array. Rows that are not a recognisable block
    /// entry, such as an unknown severity, are skipped.
    pub async fn fetch(&self, instance: &Instance) -> ModerationOutcome {
        let path = match moderation_cache_path(&self.cache_dir, &instance.name) {
            Ok(path) => path,
            Err(e) => {
                return ModerationOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };

        let url = moderation_url(&instance.name);
        let (origin, rows) = match self
            .gate
            .fetch::<Vec<Value>>(&url, &path, &HeaderMap::new())
            .await
        {
            CacheOutcome::Downloaded(rows) => (FetchOrigin::Downloaded, rows),
            CacheOutcome::Cached(rows) => (FetchOrigin::Cached, rows),
            CacheOutcome::Error(message) => return ModerationOutcome::Failed { message },
        };

        let entries = rows
            .iter()
            .filter_map(|row| match ModerationEntry::deserialize(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("{}: skipping block row: {}", instance.name, e);
                    None
                }
            });

        ModerationOutcome::Fetched {
            origin,
            entries: self
                .known
                .filter(|entry: &ModerationEntry| entry.domain.as_str(), entries),
        }
    }

    /// Fetches `instance`'s block list and folds it into [`InstanceMeta`].
    ///
    /// Also returns where the list came from, or `None` if the instance
    /// ended up hidden.
    pub async fn build_info(&self, instance: &Instance) -> (InstanceMeta, Option<FetchOrigin>) {
        let outcome = self.fetch(instance).await;
        let origin = match &outcome {
            ModerationOutcome::Fetched { origin, .. } => Some(*origin),
            ModerationOutcome::Failed { message } => {
                debug!("{} hidden: {}", instance.name, message);
                None
            }
        };
        (InstanceMeta::from_outcome(instance, outcome), origin)
    }
}
