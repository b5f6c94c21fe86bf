//! # PostgreSQL Settings Store
//!
//! PostgreSQL implementation of [`SettingsSource`] over the
//! `admin_settings` table. Values are stored as JSON text; a value that is
//! not valid JSON is passed through as a plain string.

use crate::infrastructure::persistence::postgres::store_error;
use crate::infrastructure::persistence::traits::{
    LookupOutcome, SettingKey, SettingsSource, StoreResult,
};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// PostgreSQL implementation of [`SettingsSource`].
#[derive(Debug, Clone)]
pub struct PostgresSettingsStore {
    pool: PgPool,
}

impl PostgresSettingsStore {
    /// Creates a new PostgreSQL settings store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, key: &SettingKey) -> StoreResult<Option<Value>> {
        let row: Option<(Option<String>,)> =
            sqlx::query_as("SELECT value FROM admin_settings WHERE category = $1 AND key = $2")
                .bind(key.category())
                .bind(key.key())
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;

        Ok(row.and_then(|(value,)| value).map(|raw| decode_setting(&raw)))
    }
}

/// Decodes a stored setting, falling back to a JSON string for non-JSON text.
fn decode_setting(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[async_trait]
impl SettingsSource for PostgresSettingsStore {
    async fn get(&self, key: &SettingKey) -> LookupOutcome<Value> {
        self.fetch(key).await.into()
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
