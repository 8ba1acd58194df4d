//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.
//! Deadlines use tokio's clock so they follow the runtime's timers.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A stored value with its insertion time and optional expiry deadline.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value, returned unmodified
    pub value: V,
    /// When this entry was (re)inserted
    pub inserted_at: Instant,
    /// When the pending expiry timer fires, None = no expiry
    pub expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates a new entry without an expiry deadline.
    pub fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            expires_at: None,
        }
    }

    /// Records the deadline of a freshly scheduled expiry timer.
    pub fn set_deadline(&mut self, ttl: Duration) {
        self.expires_at = Some(Instant::now() + ttl);
    }

    pub fn clear_deadline(&mut self) {
        self.expires_at = None;
    }

    // == Time To Live ==
    /// Returns the time left before the expiry timer fires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the deadline passed but the timer has not run yet
    /// - `Some(remaining)` if the deadline is still ahead
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
