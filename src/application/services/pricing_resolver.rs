//! # Pricing Resolver
//!
//! Resolves the base price and term multiplier for a product in two stages:
//! the authoritative [`PricingSource`] first, then the embedded
//! [`PricingCatalog`].
//!
//! Any failure of the authoritative stage (no source configured, source
//! unavailable, timeout, row not found) falls through to the catalog. Only a
//! miss in the catalog is reported to the caller.
//!
//! # Examples
//!
//! ```
//! use protection_quote::application::services::pricing_resolver::PricingResolver;
//! use protection_quote::domain::catalog::PricingCatalog;
//! use protection_quote::domain::value_objects::{CustomerType, DataSource};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let resolver = PricingResolver::new(Arc::new(PricingCatalog::standard()));
//! let rt = tokio::runtime::Runtime::new().unwrap();
//! let price = rt
//!     .block_on(resolver.resolve_price("HOME_PROTECTION_PLAN", 2, CustomerType::Retail))
//!     .unwrap();
//! assert_eq!(price.final_price, Decimal::new(35820, 2));
//! assert_eq!(price.data_source, DataSource::Hardcoded);
//! ```

use crate::domain::catalog::PricingCatalog;
use crate::domain::value_objects::arithmetic::{
    ArithmeticError, CheckedArithmetic, round_currency,
};
use crate::domain::value_objects::enums::{CustomerType, DataSource};
use crate::infrastructure::persistence::traits::{LookupOutcome, PriceEntry, PricingSource};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Default bound on a single authoritative lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// A resolved product price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedPrice {
    /// External product code.
    pub product_code: String,
    /// Product base price.
    #[schemars(with = "String")]
    pub base_price: Decimal,
    /// Term multiplier, tier-adjusted.
    #[schemars(with = "String")]
    pub multiplier: Decimal,
    /// `base_price × multiplier`, rounded to cents.
    #[schemars(with = "String")]
    pub final_price: Decimal,
    /// Which stage answered.
    pub data_source: DataSource,
    /// Customer tier the price was resolved for.
    pub customer_type: CustomerType,
    /// Term length in years.
    pub term_years: u32,
}

/// Error returned when neither stage can price a product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// The product or term is unknown to the fallback catalog.
    #[error("no price for {product_code} with a {term_years}-year term")]
    NotFound {
        /// Requested product code.
        product_code: String,
        /// Requested term.
        term_years: u32,
    },

    /// The stored values overflowed while computing the final price.
    #[error("price computation failed: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl ResolutionError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(product_code: impl Into<String>, term_years: u32) -> Self {
        Self::NotFound {
            product_code: product_code.into(),
            term_years,
        }
    }

    /// Returns true if the product or term does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for price resolution.
pub type ResolutionResult<T> = Result<T, ResolutionError>;

/// Two-stage price resolver.
#[derive(Debug, Clone)]
pub struct PricingResolver {
    authoritative: Option<Arc<dyn PricingSource>>,
    catalog: Arc<PricingCatalog>,
    lookup_timeout: Duration,
}

impl PricingResolver {
    /// Creates a resolver that only uses the catalog.
    #[must_use]
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        Self {
            authoritative: None,
            catalog,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Consults `source` before the catalog.
    #[must_use]
    pub fn with_authoritative(mut self, source: Arc<dyn PricingSource>) -> Self {
        self.authoritative = Some(source);
        self
    }

    /// Sets the bound on each authoritative lookup.
    #[must_use]
    pub fn with_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    /// The fallback catalog.
    #[must_use]
    pub fn catalog(&self) -> &PricingCatalog {
        &self.catalog
    }

    /// Returns true if an authoritative source is configured.
    #[must_use]
    pub fn has_authoritative(&self) -> bool {
        self.authoritative.is_some()
    }

    /// Resolves the price of `product_code` for `term_years` and tier.
    ///
    /// Authoritative rows already encode tier multipliers. On the fallback
    /// path wholesale multipliers are scaled by
    /// [`WHOLESALE_MULTIPLIER_FACTOR`](crate::domain::catalog::WHOLESALE_MULTIPLIER_FACTOR).
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::NotFound` if the catalog has no such
    /// product code or term.
    pub async fn resolve_price(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> ResolutionResult<ResolvedPrice> {
        if let Some(entry) = self
            .authoritative_lookup(product_code, term_years, customer_type)
            .await
        {
            return build(
                product_code,
                term_years,
                customer_type,
                entry,
                DataSource::Database,
            );
        }

        let (base_price, multiplier) = self
            .catalog
            .tier_price(product_code, term_years, customer_type)
            .ok_or_else(|| ResolutionError::not_found(product_code, term_years))?;

        build(
            product_code,
            term_years,
            customer_type,
            PriceEntry::new(base_price, multiplier),
            DataSource::Hardcoded,
        )
    }

    async fn authoritative_lookup(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> Option<PriceEntry> {
        let source = self.authoritative.as_ref()?;
        let lookup = source.lookup(product_code, term_years, customer_type);

        match timeout(self.lookup_timeout, lookup).await {
            Ok(LookupOutcome::Found(entry)) => Some(entry),
            Ok(LookupOutcome::NotFound) => {
                debug!(
                    source = source.name(),
                    product_code, term_years, "price not in authoritative source, using catalog"
                );
                None
            }
            Ok(LookupOutcome::SourceUnavailable(reason)) => {
                warn!(
                    source = source.name(),
                    product_code,
                    term_years,
                    reason = %reason,
                    "pricing source unavailable, using catalog"
                );
                None
            }
            Err(_) => {
                warn!(
                    source = source.name(),
                    product_code,
                    term_years,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "pricing lookup timed out, using catalog"
                );
                None
            }
        }
    }
}

fn build(
    product_code: &str,
    term_years: u32,
    customer_type: CustomerType,
    entry: PriceEntry,
    data_source: DataSource,
) -> ResolutionResult<ResolvedPrice> {
    let final_price = round_currency(entry.base_price.safe_mul(entry.multiplier)?);
    Ok(ResolvedPrice {
        product_code: product_code.to_string(),
        base_price: entry.base_price,
        multiplier: entry.multiplier,
        final_price,
        data_source,
        customer_type,
        term_years,
    })
}
