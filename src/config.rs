//! Configuration Module
//!
//! Construction parameters for a cache, optionally loaded from environment variables.

use std::env;

use serde::{Deserialize, Serialize};

use crate::cache::Capacity;
use crate::error::{CacheError, Result};

/// Environment variable holding the capacity
pub const CAPACITY_ENV: &str = "ICACHE_CAPACITY";

/// Environment variable holding the default TTL in seconds
pub const DEFAULT_TTL_ENV: &str = "ICACHE_DEFAULT_TTL";

/// Cache configuration parameters.
///
/// # Example
/// ```
/// use icache::CacheConfig;
///
/// let config = CacheConfig::default()
///     .with_capacity(100)
///     .with_default_ttl(30.0);
/// assert_eq!(config.capacity.get(), 100.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of entries, 0 = unbounded
    #[serde(default)]
    pub capacity: Capacity,
    /// TTL in seconds applied by `put` when no TTL is given, None = never expire
    #[serde(default)]
    pub default_ttl: Option<f64>,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: impl Into<Capacity>) -> Self {
        self.capacity = capacity.into();
        self
    }

    pub fn with_default_ttl(mut self, ttl_secs: f64) -> Self {
        self.default_ttl = Some(ttl_secs);
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Unset or unparseable values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `ICACHE_CAPACITY` - Maximum entries (default: 0, unbounded)
    /// - `ICACHE_DEFAULT_TTL` - Default TTL in seconds (default: none)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var(CAPACITY_ENV)
                .ok()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .map(Capacity::new)
                .unwrap_or_default(),
            default_ttl: env::var(DEFAULT_TTL_ENV)
                .ok()
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Like [`CacheConfig::from_env`], but rejects values that are set and unparseable.
    pub fn try_from_env() -> Result<Self> {
        Ok(Self {
            capacity: parse_env::<f64>(CAPACITY_ENV)?
                .map(Capacity::new)
                .unwrap_or_default(),
            default_ttl: parse_env(DEFAULT_TTL_ENV)?,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig(format!("{}={:?} is not a number", name, raw))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(CacheError::InvalidConfig(format!("{}: {}", name, e))),
    }
}
