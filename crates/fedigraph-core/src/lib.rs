//! Fedigraph Core - the shared data model
//!
//! This crate holds the types every other Fedigraph crate speaks:
//! registry records, moderation rows, and the per-instance metadata the
//! crawler derives before the graph is built.
//!
//! # Example
//!
//! ```
//! use fedigraph_core::{InstanceSet, ModerationEntry, Severity};
//!
//! let known = InstanceSet::from_names(["a.example", "b.example"]);
//! let rows = vec![
//!     ModerationEntry::new("b.example", Severity::Suspend, "spam"),
//!     ModerationEntry::new("elsewhere.example", Severity::Silence, ""),
//! ];
//!
//! let kept = known.filter(|row: &ModerationEntry| row.domain.as_str(), rows);
//! assert_eq!(kept.len(), 1);
//! ```

mod filter;
mod instance;
mod meta;
mod moderation;

pub use filter::InstanceSet;
pub use instance::{Instance, InstanceList};
pub use meta::{FetchOrigin, InstanceMeta, ModerationOutcome, Visibility};
pub use moderation::{ModerationEntry, Severity};
