use crate::link::GraphData;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Artifact I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The document the visualizer loads: the graph plus when it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphArtifact {
    /// RFC 3339, UTC.
    pub last_updated: String,

    #[serde(flatten)]
    pub graph: GraphData,
}

impl GraphArtifact {
    pub fn new(graph: GraphData, at: DateTime<Utc>) -> Self {
        Self {
            last_updated: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            graph,
        }
    }
}

/// Persists the graph artifact at a fixed path.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the artifact, replacing whatever was there.
    pub async fn save(&self, artifact: &GraphArtifact) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(artifact)?;
        let len = bytes.len();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| self.io_error(source))?;

        debug!("wrote {} bytes to {}", len, self.path.display());
        Ok(())
    }

    /// Loads the last written artifact, if any.
    pub async fn load(&self) -> Result<Option<GraphArtifact>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
