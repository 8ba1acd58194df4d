//! icache - A bounded in-memory key/value cache
//!
//! Entries are evicted oldest-inserted first once a capacity is exceeded,
//! and can expire individually after a TTL.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{Cache, CacheStats, Capacity};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
