//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple model of its state.

use proptest::prelude::*;
use std::collections::{HashMap, VecDeque};

use tokio::runtime::{Builder, Runtime};

use crate::cache::{Cache, Capacity};

// == Strategies ==
/// Small key space so puts, deletes and expiries collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]"
}

fn capacity_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        (1u32..6).prop_map(f64::from),
        0.5f64..6.0,
        -5.0f64..0.0,
    ]
}

/// TTLs long enough that no timer fires while a case runs
fn ttl_strategy() -> impl Strategy<Value = Option<f64>> {
    prop_oneof![Just(None), Just(Some(0.0)), (60.0f64..600.0).prop_map(Some)]
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: i32, ttl: Option<f64> },
    Get { key: String },
    Delete { key: String },
    Expire { key: String, ttl: f64 },
    SetCapacity { capacity: f64 },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<i32>(), ttl_strategy())
            .prop_map(|(key, value, ttl)| CacheOp::Put { key, value, ttl }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        2 => (key_strategy(), prop_oneof![Just(0.0), 60.0f64..600.0])
            .prop_map(|(key, ttl)| CacheOp::Expire { key, ttl }),
        1 => capacity_strategy().prop_map(|capacity| CacheOp::SetCapacity { capacity }),
        1 => Just(CacheOp::Clear),
    ]
}

// == Model ==
/// Reference model: oldest-first keys plus a plain map.
#[derive(Default)]
struct Model {
    capacity: Capacity,
    order: VecDeque<String>,
    values: HashMap<String, i32>,
}

impl Model {
    fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.values.remove(key);
    }

    fn enforce_capacity(&mut self) {
        while self.capacity.is_exceeded_by(self.order.len()) {
            if let Some(key) = self.order.pop_front() {
                self.values.remove(&key);
            }
        }
    }

    fn apply(&mut self, op: &CacheOp) {
        match op {
            CacheOp::Put { key, value, .. } => {
                self.remove(key);
                self.order.push_back(key.clone());
                self.values.insert(key.clone(), *value);
                self.enforce_capacity();
            }
            CacheOp::Delete { key } => self.remove(key),
            CacheOp::SetCapacity { capacity } => {
                self.capacity = Capacity::new(*capacity);
                self.enforce_capacity();
            }
            CacheOp::Clear => {
                self.order.clear();
                self.values.clear();
            }
            CacheOp::Get { .. } | CacheOp::Expire { .. } => {}
        }
    }
}

fn test_runtime() -> Runtime {
    Builder::new_current_thread().enable_time().build().unwrap()
}

fn apply(cache: &Cache<i32>, op: &CacheOp) {
    match op {
        CacheOp::Put { key, value, ttl } => {
            cache.put(key, *value, *ttl);
        }
        CacheOp::Get { key } => {
            cache.get(key);
        }
        CacheOp::Delete { key } => {
            cache.del(key);
        }
        CacheOp::Expire { key, ttl } => {
            cache.expire(key, *ttl);
        }
        CacheOp::SetCapacity { capacity } => {
            cache.set_capacity(*capacity);
        }
        CacheOp::Clear => {
            cache.clear();
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // For any sequence of operations the store, insertion order and timer map
    // stay in sync, and the cache matches the reference model.
    #[test]
    fn prop_matches_model(
        initial in capacity_strategy(),
        ops in prop::collection::vec(cache_op_strategy(), 1..60)
    ) {
        let runtime = test_runtime();
        let _guard = runtime.enter();
        let cache: Cache<i32> = Cache::new(initial);
        let mut model = Model { capacity: Capacity::new(initial), ..Model::default() };

        for op in &ops {
            apply(&cache, op);
            model.apply(op);

            cache.assert_consistent();
            prop_assert_eq!(cache.keys(), Vec::from(model.order.clone()), "after {:?}", op);
            prop_assert_eq!(cache.all(), model.values.clone());
            prop_assert_eq!(cache.len(), model.order.len());
        }
    }

    // For any sequence of puts, the entry count never exceeds a positive capacity.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..20,
        keys in prop::collection::vec("[a-z]{1,3}", 1..200)
    ) {
        let runtime = test_runtime();
        let _guard = runtime.enter();
        let cache = Cache::new(capacity);

        for (value, key) in keys.into_iter().enumerate() {
            cache.put(key, value, None);
            prop_assert!(cache.len() <= capacity, "{} entries exceed {}", cache.len(), capacity);
        }
    }

    // Filling a cache to capacity and adding one more distinct key evicts
    // exactly the first key inserted.
    #[test]
    fn prop_eviction_order(
        keys in prop::collection::hash_set("[a-z0-9]{1,8}", 2..12),
        new_key in "[A-Z]{1,8}"
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let runtime = test_runtime();
        let _guard = runtime.enter();
        let cache = Cache::new(keys.len());

        for key in &keys {
            cache.put(key, key.len(), None);
        }
        cache.put(&new_key, 0, None);

        prop_assert!(!cache.has(&keys[0]));
        for key in keys.iter().skip(1) {
            prop_assert!(cache.has(key));
        }
        prop_assert!(cache.has(&new_key));
        prop_assert_eq!(cache.len(), keys.len());
    }

    // Overwriting a key makes it the newest entry: shrinking to one keeps it.
    #[test]
    fn prop_overwrite_becomes_newest(
        keys in prop::collection::hash_set("[a-z]{1,4}", 2..10),
        pick in any::<prop::sample::Index>()
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let chosen = pick.get(&keys).clone();
        let runtime = test_runtime();
        let _guard = runtime.enter();
        let cache = Cache::new(0);

        for key in &keys {
            cache.put(key, 1, None);
        }
        cache.put(&chosen, 2, None);
        cache.set_capacity(1);

        prop_assert_eq!(cache.keys(), vec![chosen.clone()]);
        prop_assert_eq!(cache.get(&chosen), Some(2));
    }
}
