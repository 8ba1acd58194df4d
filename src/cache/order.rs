//! Insertion Order Module
//!
//! Tracks the order in which keys were (re)inserted, for capacity eviction.

use std::collections::VecDeque;

// == Insertion Order ==
/// Oldest-first sequence of keys.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion (next eviction victim)
/// - Back = Newest insertion
///
/// Reads never reorder keys; only re-insertion moves a key to the back.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<String>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty sequence.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push ==
    /// Appends a key at the newest position.
    ///
    /// Callers remove any previous occurrence first, so keys stay unique.
    pub fn push(&mut self, key: String) {
        debug_assert!(!self.contains(&key), "duplicate key in insertion order");
        self.order.push_back(key);
    }

    // == Remove ==
    /// Removes a key, returning true if it was tracked.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.order.iter().position(|k| k == key) {
            Some(index) => {
                self.order.remove(index);
                true
            }
            None => false,
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_front()
    }

    // == Peek Oldest ==
    /// Returns the oldest key without removing it.
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&String> {
        self.order.front()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }

    // == Iter ==
    /// Iterates keys oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    // == Drain ==
    /// Drains every key, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.order.drain(..)
    }
}
