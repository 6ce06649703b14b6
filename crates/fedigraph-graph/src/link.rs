//! Graph element types.
//!
//! These are the shapes the visualizer reads, so field names are part of
//! the artifact format.

use fedigraph_core::Severity;
use serde::{Deserialize, Serialize};

/// An instance in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Instance domain name.
    pub id: String,

    pub users: u64,
}

/// `source` moderates `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub kind: Severity,
    pub comment: String,
}

/// The complete dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl GraphData {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let suspends = self
            .links
            .iter()
            .filter(|link| link.kind == Severity::Suspend)
            .count();

        GraphStats {
            node_count: self.nodes.len(),
            link_count: self.links.len(),
            suspends,
            silences: self.links.len() - suspends,
        }
    }
}

/// Counts for logging and the end-of-run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub link_count: usize,
    pub suspends: usize,
    pub silences: usize,
}
