//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with insertion-order eviction
//! and per-key expiry timers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::{debug, info, trace};

use crate::cache::{CacheStats, Capacity, Entry, InsertionOrder};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_expiry_timer, ExpiryTimer};

// == Cache State ==
/// Everything guarded by the cache lock.
///
/// `entries` and `order` always hold the same key set, and every key in
/// `timers` is also in `entries`.
struct CacheState<V> {
    capacity: Capacity,
    entries: HashMap<String, Entry<V>>,
    order: InsertionOrder,
    timers: HashMap<String, ExpiryTimer>,
    stats: CacheStats,
    next_timer_id: u64,
}

impl<V> CacheState<V> {
    fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            timers: HashMap::new(),
            stats: CacheStats::new(),
            next_timer_id: 0,
        }
    }

    fn insert(&mut self, key: String, value: V) {
        self.order.push(key.clone());
        self.entries.insert(key, Entry::new(value));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Remove ==
    /// Drops a key from the order, the store and the timer map.
    fn remove(&mut self, key: &str) -> Option<Entry<V>> {
        if !self.order.remove(key) {
            return None;
        }
        self.cancel_timer(key);
        let entry = self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
        entry
    }

    fn cancel_timer(&mut self, key: &str) {
        if let Some(timer) = self.timers.remove(key) {
            timer.cancel();
        }
    }

    // == Evict ==
    /// Evicts oldest entries until the capacity holds. Returns how many were evicted.
    fn enforce_capacity(&mut self) -> usize {
        let mut evicted = 0;
        while self.capacity.is_exceeded_by(self.order.len()) {
            let Some(key) = self.order.pop_oldest() else {
                break;
            };
            self.cancel_timer(&key);
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!("Evicted oldest entry '{}' (capacity {})", key, self.capacity.get());
            evicted += 1;
        }
        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Fire Expiry ==
    /// Called from the timer task. Stale timers (cancelled or replaced while
    /// waiting for the lock) leave the cache untouched.
    fn fire_expiry(&mut self, key: &str, timer_id: u64) {
        match self.timers.get(key) {
            Some(timer) if timer.id == timer_id => {}
            _ => {
                trace!("Ignoring stale expiry timer {} for '{}'", timer_id, key);
                return;
            }
        }

        // The running task is the one being removed; dropping its handle detaches it.
        self.timers.remove(key);
        if self.order.remove(key) {
            self.entries.remove(key);
            self.stats.record_expiration();
            self.stats.set_total_entries(self.entries.len());
            debug!("Expired entry '{}'", key);
        }
    }

    fn clear(&mut self) -> usize {
        for (_, timer) in self.timers.drain() {
            timer.cancel();
        }
        let removed = self.order.drain().count();
        self.entries.clear();
        self.stats.set_total_entries(0);
        removed
    }
}

impl<V> Drop for CacheState<V> {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.cancel();
        }
    }
}

/// Converts a TTL in seconds to a timer delay. Non-positive, NaN and
/// unrepresentable values mean "no expiry".
fn ttl_delay(ttl_secs: f64) -> Option<Duration> {
    if ttl_secs > 0.0 {
        Duration::try_from_secs_f64(ttl_secs)
            .ok()
            .filter(|delay| Instant::now().checked_add(*delay).is_some())
    } else {
        None
    }
}

// == Cache ==
/// Bounded in-memory cache with insertion-order eviction and per-key TTL.
///
/// Keys are any `ToString` value and are stored by their string form, so
/// `1` and `"1"` name the same entry. Mutators return `&Self` for chaining.
///
/// Every operation runs under one lock. Expiry timers are tokio tasks spawned
/// on the runtime captured at construction; they take the same lock when they
/// fire. Cloning a `Cache` yields another handle to the same entries, and
/// dropping the last handle cancels every pending timer.
///
/// # Example
/// ```
/// use icache::Cache;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let cache = Cache::new(2);
///     cache.put("a", 1, None).put("b", 2, None).put("c", 3, Some(30.0));
///
///     assert!(!cache.has("a"));
///     assert_eq!(cache.keys(), ["b", "c"]);
/// }
/// ```
pub struct Cache<V> {
    state: Arc<Mutex<CacheState<V>>>,
    runtime: Handle,
    default_ttl: Option<f64>,
}

impl<V> Clone for Cache<V> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            runtime: self.runtime.clone(),
            default_ttl: self.default_ttl,
        }
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Cache")
            .field("capacity", &state.capacity.get())
            .field("len", &state.order.len())
            .field("pending_timers", &state.timers.len())
            .finish()
    }
}

impl<V: Clone + Send + 'static> Cache<V> {
    // == Constructors ==
    /// Creates a cache with the given capacity (0 or invalid = unbounded).
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context. Use
    /// [`Cache::try_new`] or [`Cache::with_handle`] otherwise.
    pub fn new(capacity: impl Into<Capacity>) -> Self {
        Self::with_handle(capacity, Handle::current())
    }

    /// Creates a cache, failing if no Tokio runtime is running.
    pub fn try_new(capacity: impl Into<Capacity>) -> Result<Self> {
        Self::try_with_config(CacheConfig::default().with_capacity(capacity))
    }

    /// Creates a cache whose expiry timers run on `runtime`.
    pub fn with_handle(capacity: impl Into<Capacity>, runtime: Handle) -> Self {
        Self::from_parts(CacheConfig::default().with_capacity(capacity), runtime)
    }

    /// Creates a cache from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::from_parts(config, Handle::current())
    }

    pub fn try_with_config(config: CacheConfig) -> Result<Self> {
        let runtime =
            Handle::try_current().map_err(|e| CacheError::RuntimeUnavailable(e.to_string()))?;
        Ok(Self::from_parts(config, runtime))
    }

    fn from_parts(config: CacheConfig, runtime: Handle) -> Self {
        info!(
            "Cache created: capacity={}, default_ttl={:?}",
            config.capacity.get(),
            config.default_ttl
        );

        Self {
            state: Arc::new(Mutex::new(CacheState::new(config.capacity))),
            runtime,
            default_ttl: config.default_ttl,
        }
    }

    // == Capacity ==
    /// Returns the current capacity (0.0 = unbounded).
    pub fn capacity(&self) -> f64 {
        self.state.lock().capacity.get()
    }

    /// Changes the capacity, evicting the oldest entries if the cache now
    /// holds more than the new limit. A zero capacity never evicts.
    pub fn set_capacity(&self, capacity: impl Into<Capacity>) -> &Self {
        let capacity = capacity.into();
        let mut state = self.state.lock();
        state.capacity = capacity;
        let evicted = state.enforce_capacity();
        debug!(
            "Capacity set to {}: evicted {} entries",
            capacity.get(),
            evicted
        );
        self
    }

    // == Reads ==
    /// Returns the keys oldest first.
    ///
    /// This is a snapshot; later mutations do not affect the returned vector.
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().order.iter().cloned().collect()
    }

    pub fn has<K: ToString>(&self, key: K) -> bool {
        self.state.lock().entries.contains_key(&key.to_string())
    }

    /// Returns a clone of the value stored under `key`.
    pub fn get<K: ToString>(&self, key: K) -> Option<V> {
        let mut state = self.state.lock();
        match state.entries.get(&key.to_string()) {
            Some(entry) => {
                let value = entry.value.clone();
                state.stats.record_hit();
                Some(value)
            }
            None => {
                state.stats.record_miss();
                None
            }
        }
    }

    /// Returns a snapshot of every live entry.
    pub fn all(&self) -> HashMap<String, V> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// Returns the time left before `key` expires, or None if it is absent
    /// or has no pending expiry.
    pub fn ttl<K: ToString>(&self, key: K) -> Option<Duration> {
        self.state
            .lock()
            .entries
            .get(&key.to_string())
            .and_then(Entry::ttl_remaining)
    }

    pub fn len(&self) -> usize {
        self.state.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.entries.len());
        stats
    }

    // == Put ==
    /// Stores `value` under `key` at the newest insertion position.
    ///
    /// An existing entry is deleted first (its timer included), so overwritten
    /// keys become the last eviction candidates. If the cache then exceeds its
    /// capacity, the oldest entry is evicted.
    ///
    /// # Arguments
    /// * `key` - The key, stored by its string form
    /// * `value` - The value to store
    /// * `ttl_secs` - Optional TTL in seconds (falls back to the configured default)
    pub fn put<K: ToString>(&self, key: K, value: V, ttl_secs: Option<f64>) -> &Self {
        let key = key.to_string();
        let mut state = self.state.lock();

        if let Some(previous) = state.remove(&key) {
            trace!(
                "Replacing entry '{}' inserted {:?} ago",
                key,
                previous.inserted_at.elapsed()
            );
        }
        state.insert(key.clone(), value);
        state.enforce_capacity();

        if let Some(ttl_secs) = ttl_secs.or(self.default_ttl) {
            self.schedule_expiry(&mut state, key, ttl_secs);
        }
        self
    }

    // == Delete ==
    /// Removes `key` and its pending timer. Absent keys are a no-op.
    pub fn del<K: ToString>(&self, key: K) -> &Self {
        let key = key.to_string();
        if self.state.lock().remove(&key).is_some() {
            trace!("Deleted entry '{}'", key);
        }
        self
    }

    // == Clear ==
    /// Removes every entry and cancels every pending timer.
    pub fn clear(&self) -> &Self {
        let removed = self.state.lock().clear();
        info!("Cache cleared: removed {} entries", removed);
        self
    }

    // == Expire ==
    /// Schedules `key` for deletion in `ttl_secs` seconds, replacing any
    /// pending timer.
    ///
    /// A non-positive TTL only cancels the pending timer; the entry stays.
    /// Absent keys are a no-op.
    pub fn expire<K: ToString>(&self, key: K, ttl_secs: f64) -> &Self {
        let key = key.to_string();
        let mut state = self.state.lock();
        self.schedule_expiry(&mut state, key, ttl_secs);
        self
    }

    fn schedule_expiry(&self, state: &mut CacheState<V>, key: String, ttl_secs: f64) {
        state.cancel_timer(&key);

        let Some(entry) = state.entries.get_mut(&key) else {
            return;
        };
        let Some(delay) = ttl_delay(ttl_secs) else {
            entry.clear_deadline();
            return;
        };
        entry.set_deadline(delay);

        state.next_timer_id += 1;
        let timer_id = state.next_timer_id;
        let weak_state = Arc::downgrade(&self.state);
        let timer_key = key.clone();

        let timer = spawn_expiry_timer(&self.runtime, timer_id, delay, move || {
            if let Some(state) = weak_state.upgrade() {
                state.lock().fire_expiry(&timer_key, timer_id);
            }
        });
        state.timers.insert(key, timer);
    }
}

#[cfg(test)]
impl<V> Cache<V> {
    /// Panics if the store, the insertion order and the timer map disagree.
    pub(crate) fn assert_consistent(&self) {
        let state = self.state.lock();

        assert_eq!(state.entries.len(), state.order.len(), "count mismatch");
        for key in state.order.iter() {
            assert!(state.entries.contains_key(key), "'{}' ordered but not stored", key);
        }
        for (key, entry) in &state.entries {
            assert_eq!(
                state.timers.contains_key(key),
                entry.expires_at.is_some(),
                "timer/deadline mismatch for '{}'",
                key
            );
        }
        for key in state.timers.keys() {
            assert!(state.entries.contains_key(key), "timer for absent '{}'", key);
        }
        assert!(
            !state.capacity.is_exceeded_by(state.order.len()),
            "capacity {} exceeded by {}",
            state.capacity.get(),
            state.order.len()
        );
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.state.lock().timers.len()
    }
}
