//! Per-instance metadata derived during a crawl.
//!
//! `InstanceMeta` lives only between the moderation fetch and graph
//! aggregation. It is never written to disk on its own.

use crate::instance::Instance;
use crate::moderation::ModerationEntry;

/// Where a successful moderation list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchOrigin {
    /// Fetched over the network and written to the cache.
    Downloaded,
    /// Read back from an existing cache file.
    Cached,
}

/// Result of fetching one instance's moderation list.
#[derive(Debug, Clone, PartialEq)]
pub enum ModerationOutcome {
    /// The list was obtained; entries are already restricted to known instances.
    Fetched {
        origin: FetchOrigin,
        entries: Vec<ModerationEntry>,
    },
    /// Network, timeout, parse or cache-write failure.
    Failed { message: String },
}

impl ModerationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Whether an instance's moderation list could be read this run.
#[derive(Debug, Clone, PartialEq)]
pub enum Visibility {
    Hidden,
    Public { moderated: Vec<ModerationEntry> },
}

/// What the crawler learned about one instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceMeta {
    pub name: String,
    pub users: u64,
    pub visibility: Visibility,
}

impl InstanceMeta {
    /// Folds a moderation outcome into instance metadata.
    ///
    /// A failed fetch hides the instance; a successful one makes it public
    /// with the (already filtered) list attached.
    pub fn from_outcome(instance: &Instance, outcome: ModerationOutcome) -> Self {
        let visibility = match outcome {
            ModerationOutcome::Fetched { entries, .. } => Visibility::Public { moderated: entries },
            ModerationOutcome::Failed { .. } => Visibility::Hidden,
        };

        Self {
            name: instance.name.clone(),
            users: instance.users,
            visibility,
        }
    }

    pub fn hidden(name: impl Into<String>, users: u64) -> Self {
        Self {
            name: name.into(),
            users,
            visibility: Visibility::Hidden,
        }
    }

    pub fn public(name: impl Into<String>, users: u64, moderated: Vec<ModerationEntry>) -> Self {
        Self {
            name: name.into(),
            users,
            visibility: Visibility::Public { moderated },
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public { .. })
    }

    /// The moderation list, empty for hidden instances.
    pub fn moderated(&self) -> &[ModerationEntry] {
        match &self.visibility {
            Visibility::Public { moderated } => moderated,
            Visibility::Hidden => &[],
        }
    }
}
