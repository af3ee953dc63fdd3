//! Binding-strategy cache
//!
//! This module provides the process-lifetime cache of binding strategies.
//! Each key owns a slot; populating a slot only blocks other callers of the
//! same key, and the map shard lock is never held while a strategy is
//! derived.

use crate::errors::CacheError;
use crate::key::CacheKey;
use crate::strategy::BindingStrategy;
use config::CacheConfig;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Slot = Arc<OnceCell<Arc<BindingStrategy>>>;

pub struct StrategyCache {
    slots: DashMap<CacheKey, Slot>,
    populations: AtomicU64,
}

impl Debug for StrategyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyCache")
            .field("slots", &self.slots.len())
            .field("populations", &self.population_count())
            .finish()
    }
}

impl StrategyCache {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            populations: AtomicU64::new(0),
        }
    }

    /// Create a cache sized from configuration.
    ///
    /// The configuration is validated first; `shard_amount` must be a power
    /// of two greater than one.
    pub fn with_config(config: &CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;
        Ok(Self {
            slots: DashMap::with_capacity_and_shard_amount(
                config.initial_capacity,
                config.shard_amount,
            ),
            populations: AtomicU64::new(0),
        })
    }

    fn slot(&self, key: &CacheKey) -> Slot {
        if let Some(slot) = self.slots.get(key).map(|entry| Arc::clone(entry.value())) {
            return slot;
        }
        Arc::clone(self.slots.entry(key.clone()).or_default().value())
    }

    /// Fetch the strategy for `key`, running `populate` if the slot is empty.
    ///
    /// Concurrent callers with the same key wait for the first populator and
    /// share its result. A failed population leaves the slot empty.
    pub fn get_or_populate<F>(
        &self,
        key: &CacheKey,
        populate: F,
    ) -> Result<Arc<BindingStrategy>, CacheError>
    where
        F: FnOnce() -> Result<BindingStrategy, CacheError>,
    {
        let slot = self.slot(key);
        slot.get_or_try_init(|| {
            let strategy = populate()?;
            self.populations.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(
                identity = %key.identity,
                shape = %key.shape,
                fields = strategy.fields().len(),
                "populated binding strategy"
            );
            Ok(Arc::new(strategy))
        })
        .map(Arc::clone)
    }

    /// Strategy for `key` if it was already populated
    pub fn get(&self, key: &CacheKey) -> Option<Arc<BindingStrategy>> {
        self.slots
            .get(key)
            .and_then(|entry| entry.value().get().map(Arc::clone))
    }

    /// Number of successful population events since creation
    pub fn population_count(&self) -> u64 {
        self.populations.load(Ordering::SeqCst)
    }

    /// Number of populated strategies
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StrategyCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{QueryIdentity, TemplateShape};
    use crate::strategy::TemplateField;
    use std::sync::Barrier;
    use type_mapping::TypeMappingError;

    struct OrderFilter;
    struct UserFilter;

    fn sample() -> Vec<TemplateField> {
        vec![TemplateField::new("id", &1i32)]
    }

    #[test]
    fn test_concurrent_identical_keys_populate_once() {
        let cache = StrategyCache::new();
        let key = QueryIdentity::new("usp_orders", "FakeConnection")
            .for_template(TemplateShape::of::<OrderFilter>());
        let barrier = Barrier::new(8);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    barrier.wait();
                    let strategy = cache
                        .get_or_populate(&key, || {
                            BindingStrategy::derive(key.shape, &sample())
                        })
                        .unwrap();
                    assert_eq!(strategy.fields().len(), 1);
                });
            }
        });

        assert_eq!(cache.population_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_shapes_and_identities_get_own_slots() {
        let cache = StrategyCache::new();
        let orders = QueryIdentity::new("usp_orders", "FakeConnection");
        let users = QueryIdentity::new("usp_users", "FakeConnection");

        for key in [
            orders.for_template(TemplateShape::of::<OrderFilter>()),
            orders.for_template(TemplateShape::of::<UserFilter>()),
            users.for_template(TemplateShape::of::<OrderFilter>()),
        ] {
            cache
                .get_or_populate(&key, || BindingStrategy::derive(key.shape, &sample()))
                .unwrap();
        }

        assert_eq!(cache.population_count(), 3);
        assert!(cache
            .get(&orders.for_template(TemplateShape::of::<UserFilter>()))
            .is_some());
    }

    #[test]
    fn test_failed_population_is_not_cached() {
        let cache = StrategyCache::new();
        let key = QueryIdentity::new("usp_orders", "FakeConnection")
            .for_template(TemplateShape::of::<OrderFilter>());

        let result = cache.get_or_populate(&key, || {
            Err(CacheError::Population {
                shape: key.shape.to_string(),
                source: TypeMappingError::UnmappedType("Vec<DbValue>".to_string()),
            })
        });
        assert!(result.is_err());
        assert!(cache.get(&key).is_none());

        cache
            .get_or_populate(&key, || BindingStrategy::derive(key.shape, &sample()))
            .unwrap();
        assert_eq!(cache.population_count(), 1);
    }

    #[test]
    fn test_with_config_starts_empty() {
        let cache = StrategyCache::with_config(&CacheConfig::default()).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.population_count(), 0);
    }

    #[test]
    fn test_with_config_rejects_bad_shard_amount() {
        for shard_amount in [0, 1, 12] {
            let result = StrategyCache::with_config(&CacheConfig::new(64, shard_amount));
            assert!(matches!(result, Err(CacheError::Config(_))));
        }
    }
}
