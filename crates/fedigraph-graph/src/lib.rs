//! Fedigraph Graph - the moderation graph
//!
//! Turns the per-instance metadata gathered by the crawler into the
//! node/link dataset the visualizer renders, and writes it to disk.
//!
//! Nodes are instances; a link `source -> target` means `source` silences
//! or suspends `target`. Instances that neither moderate nor are moderated
//! by a known instance do not appear at all.
//!
//! # Example
//!
//! ```
//! use fedigraph_core::{InstanceMeta, ModerationEntry, Severity};
//! use fedigraph_graph::aggregate;
//!
//! let metas = vec![
//!     InstanceMeta::public("a.example", 10, vec![
//!         ModerationEntry::new("b.example", Severity::Suspend, "spam"),
//!     ]),
//!     InstanceMeta::hidden("b.example", 5),
//!     InstanceMeta::public("c.example", 1, vec![]),
//! ];
//!
//! let graph = aggregate(&metas);
//! assert_eq!(graph.nodes.len(), 2);
//! assert_eq!(graph.links.len(), 1);
//! ```

mod builder;
mod link;
mod store;

pub use builder::{aggregate, GraphBuilder};
pub use link::{GraphData, GraphStats, Link, Node};
pub use store::{ArtifactStore, GraphArtifact, StoreError};
