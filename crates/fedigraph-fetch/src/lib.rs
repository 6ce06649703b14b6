//! Fedigraph Fetch - getting JSON off the network, once
//!
//! Three layers, leaf first:
//!
//! - [`TimedFetch`] issues one GET with a hard deadline and parses the body.
//! - [`CacheGate`] puts a read-through disk cache in front of any [`JsonSource`].
//!   An existing cache file is trusted forever; there is no expiry.
//! - [`ModerationFetcher`] reads one instance's block list through the gate and
//!   keeps only rows that point at known instances.
//!
//! Only `TimedFetch` can fail with an error; the gate and the moderation
//! fetcher always return a tagged outcome.

mod cache;
mod client;
mod error;
mod moderation;

pub use cache::{CacheGate, CacheOutcome};
pub use client::{bearer_headers, JsonSource, TimedFetch, DEFAULT_TIMEOUT, USER_AGENT};
pub use error::FetchError;
pub use moderation::{moderation_cache_path, moderation_url, ModerationFetcher};
pub use reqwest::header::HeaderMap;
