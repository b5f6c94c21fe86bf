//! # In-Memory Settings Store
//!
//! In-memory implementation of [`SettingsSource`] keyed by
//! `(category, key)`, with the same offline toggle as the pricing store.

use crate::infrastructure::persistence::traits::{
    LookupOutcome, SettingKey, SettingsSource, StoreError,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// In-memory implementation of [`SettingsSource`].
#[derive(Debug, Clone)]
pub struct InMemorySettingsStore {
    storage: Arc<RwLock<HashMap<(String, String), Value>>>,
    available: Arc<AtomicBool>,
}

impl InMemorySettingsStore {
    /// Creates a new empty, available store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Inserts or replaces a setting.
    pub async fn set(&self, key: &SettingKey, value: Value) {
        let mut storage = self.storage.write().await;
        storage.insert((key.category().to_string(), key.key()), value);
    }

    /// Removes a setting, returning true if it existed.
    pub async fn remove(&self, key: &SettingKey) -> bool {
        let mut storage = self.storage.write().await;
        storage
            .remove(&(key.category().to_string(), key.key()))
            .is_some()
    }

    /// Simulates the store going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Returns the number of settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the store holds no settings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsSource for InMemorySettingsStore {
    async fn get(&self, key: &SettingKey) -> LookupOutcome<Value> {
        if !self.available.load(Ordering::SeqCst) {
            return LookupOutcome::SourceUnavailable(
                StoreError::unavailable("in-memory settings store is offline").to_string(),
            );
        }
        let storage = self.storage.read().await;
        match storage.get(&(key.category().to_string(), key.key())) {
            Some(value) => LookupOutcome::Found(value.clone()),
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
    use serde_json::json;

    #[tokio::test]
    async fn set_and_get() {
        let store = InMemorySettingsStore::new();
        store.set(&SettingKey::AdminFee, json!("30.00")).await;

        assert_eq!(
            store.get(&SettingKey::AdminFee).await,
            LookupOutcome::Found(json!("30.00"))
        );
        assert!(store.get(&SettingKey::DealerFee).await.is_not_found());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn remove_setting() {
        let store = InMemorySettingsStore::new();
        store.set(&SettingKey::ProcessingFee, json!(12)).await;
        assert!(store.remove(&SettingKey::ProcessingFee).await);
        assert!(!store.remove(&SettingKey::ProcessingFee).await);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn offline_store_reports_unavailable() {
        let store = InMemorySettingsStore::new();
        store.set(&SettingKey::AdminFee, json!(30)).await;
        store.set_available(false);
        assert!(store.get(&SettingKey::AdminFee).await.is_unavailable());
    }
}
