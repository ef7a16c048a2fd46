//! Read-through cache for dashboard metrics
//!
//! Views never mirror store state in their own fields; they read through
//! this cache, keyed by metric category. The owning service re-reads a
//! category after every successful write, so a warm entry is never staler
//! than the last write that went through this process.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use metrika_types::{MetricKind, QuantitySample};

/// Cached read result for one category
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Most recent sample (weight-style categories)
    Latest(Option<QuantitySample>),
    /// Today's cumulative sum (water, energy, exercise)
    TodaySum(f64),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: MetricValue,
    fetched_at: DateTime<Utc>,
}

/// In-memory metric cache, scoped to one service instance
#[derive(Debug, Default)]
pub struct MetricCache {
    entries: RwLock<HashMap<MetricKind, CacheEntry>>,
}

impl MetricCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, kind: MetricKind) -> Option<MetricValue> {
        let entries = self.entries.read().await;
        entries.get(&kind).map(|entry| entry.value.clone())
    }

    pub async fn put(&self, kind: MetricKind, value: MetricValue) {
        let mut entries = self.entries.write().await;
        entries.insert(
            kind,
            CacheEntry {
                value,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Drop one category so the next read goes to the store
    pub async fn invalidate(&self, kind: MetricKind) {
        self.entries.write().await.remove(&kind);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// When the cached value for a category was read from the store
    pub async fn fetched_at(&self, kind: MetricKind) -> Option<DateTime<Utc>> {
        let entries = self.entries.read().await;
        entries.get(&kind).map(|entry| entry.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = MetricCache::new();
        assert!(cache.get(MetricKind::DietaryWater).await.is_none());

        cache
            .put(MetricKind::DietaryWater, MetricValue::TodaySum(1.25))
            .await;
        assert_eq!(
            cache.get(MetricKind::DietaryWater).await,
            Some(MetricValue::TodaySum(1.25))
        );
        assert!(cache.fetched_at(MetricKind::DietaryWater).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_drops_only_that_kind() {
        let cache = MetricCache::new();
        cache
            .put(MetricKind::DietaryWater, MetricValue::TodaySum(1.0))
            .await;
        cache
            .put(MetricKind::BodyMass, MetricValue::Latest(None))
            .await;

        cache.invalidate(MetricKind::DietaryWater).await;
        assert!(cache.get(MetricKind::DietaryWater).await.is_none());
        assert!(cache.get(MetricKind::BodyMass).await.is_some());
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let cache = MetricCache::new();
        cache
            .put(MetricKind::ActiveEnergy, MetricValue::TodaySum(300.0))
            .await;
        cache.clear().await;
        assert!(cache.is_empty().await);
    }
}
