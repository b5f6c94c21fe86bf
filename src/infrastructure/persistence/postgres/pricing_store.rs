//! # PostgreSQL Pricing Store
//!
//! PostgreSQL implementation of [`PricingSource`] using sqlx.

use crate::domain::value_objects::enums::CustomerType;
use crate::infrastructure::persistence::postgres::store_error;
use crate::infrastructure::persistence::traits::{
    LookupOutcome, PriceEntry, PricingSource, StoreError, StoreResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

/// PostgreSQL implementation of [`PricingSource`].
///
/// Joins `products` and `pricing` on `product_code`; the tier is selected
/// with the `customer_type` column.
///
/// # Examples
///
/// ```ignore
/// use protection_quote::infrastructure::persistence::postgres::{lazy_pool, PostgresPricingStore};
/// use std::time::Duration;
///
/// let pool = lazy_pool("postgres://...", 5, Duration::from_secs(3))?;
/// let store = PostgresPricingStore::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresPricingStore {
    pool: PgPool,
}

impl PostgresPricingStore {
    /// Creates a new PostgreSQL pricing store.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> StoreResult<Option<PriceEntry>> {
        let term = i32::try_from(term_years)
            .map_err(|_| StoreError::query(format!("term out of range: {term_years}")))?;

        let row: Option<(Decimal, Decimal)> = sqlx::query_as(
            r#"
            SELECT p.base_price, pr.multiplier
            FROM products p
            JOIN pricing pr ON pr.product_code = p.product_code
            WHERE p.product_code = $1
              AND pr.term_years = $2
              AND pr.customer_type = $3
            LIMIT 1
            "#,
        )
        .bind(product_code)
        .bind(term)
        .bind(customer_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|(base_price, multiplier)| PriceEntry::new(base_price, multiplier)))
    }
}

#[async_trait]
impl PricingSource for PostgresPricingStore {
    async fn lookup(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> LookupOutcome<PriceEntry> {
        self.fetch(product_code, term_years, customer_type)
            .await
            .into()
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
