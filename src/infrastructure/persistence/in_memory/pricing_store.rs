//! # In-Memory Pricing Store
//!
//! In-memory implementation of [`PricingSource`] for tests and for running
//! with an authoritative table loaded from somewhere other than PostgreSQL.
//!
//! The store can be switched off to simulate an outage and can be given an
//! artificial delay to exercise lookup timeouts.

use crate::domain::value_objects::enums::CustomerType;
use crate::infrastructure::persistence::traits::{
    LookupOutcome, PriceEntry, PricingSource, StoreError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

type PriceKey = (String, u32, CustomerType);

/// In-memory implementation of [`PricingSource`].
#[derive(Debug, Clone)]
pub struct InMemoryPricingStore {
    storage: Arc<RwLock<HashMap<PriceKey, PriceEntry>>>,
    available: Arc<AtomicBool>,
    delay: Option<Duration>,
}

impl InMemoryPricingStore {
    /// Creates a new empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
            delay: None,
        }
    }

    /// Delays every lookup by `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Inserts or replaces a price row.
    pub async fn insert(
        &self,
        product_code: impl Into<String>,
        term_years: u32,
        customer_type: CustomerType,
        entry: PriceEntry,
    ) {
        let mut storage = self.storage.write().await;
        storage.insert((product_code.into(), term_years, customer_type), entry);
    }

    /// Simulates the store going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the number of price rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the store holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all rows.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

impl Default for InMemoryPricingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PricingSource for InMemoryPricingStore {
    async fn lookup(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> LookupOutcome<PriceEntry> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return LookupOutcome::SourceUnavailable(
                StoreError::unavailable("in-memory pricing store is offline").to_string(),
            );
        }

        let storage = self.storage.read().await;
        let key = (product_code.to_string(), term_years, customer_type);
        match storage.get(&key) {
            Some(entry) => LookupOutcome::Found(*entry),
            None => LookupOutcome::NotFound,
        }
    }

    fn name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn entry() -> PriceEntry {
        PriceEntry::new(Decimal::new(210, 0), Decimal::new(18, 1))
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = InMemoryPricingStore::new();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let store = InMemoryPricingStore::new();
        store
            .insert("HOME_PROTECTION_PLAN", 2, CustomerType::Retail, entry())
            .await;

        let found = store
            .lookup("HOME_PROTECTION_PLAN", 2, CustomerType::Retail)
            .await;
        assert_eq!(found, LookupOutcome::Found(entry()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn tier_is_part_of_the_key() {
        let store = InMemoryPricingStore::new();
        store
            .insert("HOME_PROTECTION_PLAN", 2, CustomerType::Retail, entry())
            .await;

        let wholesale = store
            .lookup("HOME_PROTECTION_PLAN", 2, CustomerType::Wholesale)
            .await;
        assert!(wholesale.is_not_found());
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = InMemoryPricingStore::new();
        store
            .insert("HOME_PROTECTION_PLAN", 2, CustomerType::Retail, entry())
            .await;
        store.set_available(false);

        let outcome = store
            .lookup("HOME_PROTECTION_PLAN", 2, CustomerType::Retail)
            .await;
        assert!(outcome.is_unavailable());

        store.set_available(true);
        let outcome = store
            .lookup("HOME_PROTECTION_PLAN", 2, CustomerType::Retail)
            .await;
        assert!(outcome.is_found());
    }

    #[tokio::test]
    async fn clear_removes_rows() {
        let store = InMemoryPricingStore::new();
        store
            .insert("HOME_PROTECTION_PLAN", 1, CustomerType::Retail, entry())
            .await;
        store.clear().await;
        assert!(store.is_empty());
    }
}
