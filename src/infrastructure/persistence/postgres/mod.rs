//! # PostgreSQL Stores
//!
//! sqlx-backed implementations of the pricing and settings ports.
//!
//! Expected tables:
//!
//! - `products(product_code, base_price)`
//! - `pricing(product_code, term_years, multiplier, customer_type)`
//! - `admin_settings(category, key, value)` where `value` is JSON text
//!
//! Schema management is out of scope; these stores only read.

pub mod pricing_store;
pub mod settings_store;

pub use pricing_store::PostgresPricingStore;
pub use settings_store::PostgresSettingsStore;

use crate::infrastructure::persistence::traits::{StoreError, StoreResult};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Creates a lazily connecting pool.
///
/// No connection is attempted until the first query, so a database that is
/// down at startup only affects individual lookups.
///
/// # Errors
///
/// Returns `StoreError::Connection` if the URL cannot be parsed.
pub fn lazy_pool(
    database_url: &str,
    max_connections: u32,
    acquire_timeout: Duration,
) -> StoreResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)
        .map_err(|e| StoreError::connection(e.to_string()))
}

/// Classifies a sqlx failure.
///
/// Pool and transport failures are connection errors; a column that cannot
/// be decoded into its Rust type is a serialization error.
pub(crate) fn store_error(error: sqlx::Error) -> StoreError {
    match error {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::connection(error.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::serialization(error.to_string())
        }
        other => StoreError::query(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_connection_errors() {
        assert!(store_error(sqlx::Error::PoolTimedOut).is_connection());
        assert!(store_error(sqlx::Error::PoolClosed).is_connection());
    }

    #[test]
    fn decode_failures_are_serialization_errors() {
        let err = store_error(sqlx::Error::ColumnDecode {
            index: "base_price".to_string(),
            source: "not a numeric".into(),
        });
        assert!(err.is_serialization());
        assert!(store_error(sqlx::Error::Decode("bad".into())).is_serialization());
    }

    #[test]
    fn other_failures_are_query_errors() {
        let err = store_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Query(_)));
    }
}
