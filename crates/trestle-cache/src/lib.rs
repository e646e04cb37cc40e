//! # trestle-cache
//!
//! Category-scoped TTL cache for query results. One cache per category,
//! per-entry TTL following the category policy, blake3 fingerprint keys,
//! and atomic category invalidation driven by mutations.
//!
//! A stale hit is not an error: entries are served until TTL expiry or
//! explicit invalidation, by design.

mod categories;
mod key;
mod manager;

pub use categories::Category;
pub use key::fingerprint;
pub use manager::{CacheHit, QueryCache};
