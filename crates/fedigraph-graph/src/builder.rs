//! Graph builder for turning crawl results into the moderation graph.
//!
//! The builder works in two passes:
//! 1. Every public instance contributes one link per moderation row
//! 2. Only instances touched by some link become nodes

use crate::link::{GraphData, Link, Node};
use fedigraph_core::{InstanceMeta, Visibility};
use std::collections::HashSet;

/// Builds [`GraphData`] from [`InstanceMeta`] records.
///
/// Link and node order follow the order metadata was added in. Nothing is
/// deduplicated: two rows for the same pair produce two links.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    links: Vec<Link>,
    /// Every instance seen, in insertion order, as node candidates.
    candidates: Vec<Node>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one instance's metadata.
    pub fn add_meta(&mut self, meta: &InstanceMeta) {
        if let Visibility::Public { moderated } = &meta.visibility {
            self.links.extend(moderated.iter().map(|entry| Link {
                source: meta.name.clone(),
                target: entry.domain.clone(),
                kind: entry.severity,
                comment: entry.comment.clone(),
            }));
        }

        self.candidates.push(Node {
            id: meta.name.clone(),
            users: meta.users,
        });
    }

    pub fn add_metas<'a>(&mut self, metas: impl IntoIterator<Item = &'a InstanceMeta>) {
        for meta in metas {
            self.add_meta(meta);
        }
    }

    /// Drops isolated instances and returns the graph.
    pub fn build(self) -> GraphData {
        let linked: HashSet<&str> = self
            .links
            .iter()
            .flat_map(|link| [link.source.as_str(), link.target.as_str()])
            .collect();

        let nodes = self
            .candidates
            .iter()
            .filter(|node| linked.contains(node.id.as_str()))
            .cloned()
            .collect();

        GraphData {
            nodes,
            links: self.links,
        }
    }
}

/// Builds the moderation graph for a whole crawl.
pub fn aggregate(metas: &[InstanceMeta]) -> GraphData {
    let mut builder = GraphBuilder::new();
    builder.add_metas(metas);
    builder.build()
}
