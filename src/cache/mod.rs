//! Cache Module
//!
//! Provides a bounded in-memory cache with insertion-order eviction and
//! per-key TTL expiry.

mod capacity;
mod entry;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use capacity::Capacity;
pub(crate) use entry::Entry;
pub(crate) use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::Cache;
