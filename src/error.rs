//! Error types for the cache
//!
//! Cache operations themselves never fail; these errors only surface while
//! building a cache or loading its configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No tokio runtime is available to drive expiry timers
    #[error("Runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    /// A configuration value was present but could not be parsed
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
