//! Client-side fetch cache.
//!
//! Entries are keyed by entity kind and date window. A successful
//! mutation invalidates the whole kind: last fetch wins, nothing is
//! merged back in.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

/// What kind of collection a cache entry holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Transactions,
    Budgets,
    Loans,
    Lending,
    Recurring,
    Summary,
    BudgetStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: EntityKind,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Discriminator for kind-local variants (cursor, person filter).
    variant: String,
}

#[derive(Debug, Default)]
pub struct FetchCache {
    entries: HashMap<CacheKey, serde_json::Value>,
}

impl FetchCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        variant: &str,
    ) -> Option<T> {
        let key = CacheKey {
            kind,
            window,
            variant: variant.to_string(),
        };
        let value = self.entries.get(&key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn put<T: Serialize>(
        &mut self,
        kind: EntityKind,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
        variant: &str,
        value: &T,
    ) {
        let key = CacheKey {
            kind,
            window,
            variant: variant.to_string(),
        };
        if let Ok(value) = serde_json::to_value(value) {
            self.entries.insert(key, value);
        }
    }

    /// Drops every entry of one kind.
    pub fn invalidate(&mut self, kind: EntityKind) {
        self.entries.retain(|key, _| key.kind != kind);
    }

    /// Drops the derived aggregates; call after any transaction mutation.
    pub fn invalidate_derived(&mut self) {
        self.invalidate(EntityKind::Summary);
        self.invalidate(EntityKind::BudgetStatus);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((
            Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap(),
        ))
    }

    #[test]
    fn cached_value_round_trips_until_invalidated() {
        let mut cache = FetchCache::new();
        cache.put(EntityKind::Transactions, window(), "", &vec![1u64, 2, 3]);

        let hit: Option<Vec<u64>> = cache.get(EntityKind::Transactions, window(), "");
        assert_eq!(hit, Some(vec![1, 2, 3]));

        cache.invalidate(EntityKind::Transactions);
        let miss: Option<Vec<u64>> = cache.get(EntityKind::Transactions, window(), "");
        assert!(miss.is_none());
    }

    #[test]
    fn different_windows_are_different_entries() {
        let mut cache = FetchCache::new();
        cache.put(EntityKind::Summary, window(), "", &"july");
        let other: Option<String> = cache.get(EntityKind::Summary, None, "");
        assert!(other.is_none());
    }

    #[test]
    fn invalidation_is_per_kind_not_global() {
        let mut cache = FetchCache::new();
        cache.put(EntityKind::Transactions, window(), "", &"txs");
        cache.put(EntityKind::Budgets, None, "", &"budgets");

        cache.invalidate(EntityKind::Transactions);
        let budgets: Option<String> = cache.get(EntityKind::Budgets, None, "");
        assert_eq!(budgets.as_deref(), Some("budgets"));
        assert_eq!(cache.len(), 1);
    }
}
