//! # Store Traits
//!
//! Port definitions for the authoritative pricing and settings stores.
//!
//! Lookups never return `Err`. A store that cannot answer reports
//! [`LookupOutcome::SourceUnavailable`], which callers treat as a signal to
//! fall back, while [`LookupOutcome::NotFound`] means the store answered and
//! has no row.
//!
//! # Available Ports
//!
//! - [`PricingSource`]: Base price and term multiplier per product/term/tier
//! - [`SettingsSource`]: Fees, discounts, tax rates, multipliers, contact data
//!
//! # Examples
//!
//! ```
//! use protection_quote::infrastructure::persistence::traits::{LookupOutcome, StoreError};
//!
//! let missing: Result<Option<u32>, StoreError> = Ok(None);
//! assert!(LookupOutcome::from(missing).is_not_found());
//!
//! let down: Result<Option<u32>, StoreError> = Err(StoreError::connection("refused"));
//! assert!(LookupOutcome::from(down).is_unavailable());
//! ```

use crate::domain::value_objects::enums::CustomerType;
use crate::domain::value_objects::jurisdiction::Jurisdiction;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection could not be established or was lost.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query failed.
    #[error("Query error: {0}")]
    Query(String),

    /// A stored value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The store was switched off or is otherwise not serving.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Returns true if this is a connection error.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns true if a stored value could not be decoded.
    #[must_use]
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Three-way result of an authoritative lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome<T> {
    /// The store returned a value.
    Found(T),
    /// The store answered and has no matching row.
    NotFound,
    /// The store could not answer; the reason is for logging only.
    SourceUnavailable(String),
}

impl<T> LookupOutcome<T> {
    /// Returns true for [`LookupOutcome::Found`].
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Returns true for [`LookupOutcome::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns true for [`LookupOutcome::SourceUnavailable`].
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_))
    }

    /// Converts into `Option`, discarding the reason for absence.
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound | Self::SourceUnavailable(_) => None,
        }
    }

    /// Maps the found value.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> LookupOutcome<U> {
        match self {
            Self::Found(value) => LookupOutcome::Found(f(value)),
            Self::NotFound => LookupOutcome::NotFound,
            Self::SourceUnavailable(reason) => LookupOutcome::SourceUnavailable(reason),
        }
    }
}

impl<T> From<StoreResult<Option<T>>> for LookupOutcome<T> {
    fn from(result: StoreResult<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Self::Found(value),
            Ok(None) => Self::NotFound,
            Err(e) => Self::SourceUnavailable(e.to_string()),
        }
    }
}

/// Price row returned by a [`PricingSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceEntry {
    /// Product base price.
    pub base_price: Decimal,
    /// Term (and, for authoritative stores, tier) multiplier.
    pub multiplier: Decimal,
}

impl PriceEntry {
    /// Creates a price entry.
    #[must_use]
    pub const fn new(base_price: Decimal, multiplier: Decimal) -> Self {
        Self {
            base_price,
            multiplier,
        }
    }
}

/// Authoritative product pricing lookup.
///
/// Tier-specific multipliers are the store's responsibility: a wholesale row
/// already carries the wholesale multiplier.
#[async_trait]
pub trait PricingSource: Send + Sync + fmt::Debug {
    /// Looks up the price for a product code, term and customer tier.
    async fn lookup(
        &self,
        product_code: &str,
        term_years: u32,
        customer_type: CustomerType,
    ) -> LookupOutcome<PriceEntry>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Identifies one ancillary setting.
///
/// Settings are addressed by `(category, key)` pairs such as
/// `("fees", "admin_fee")` or `("taxes", "ca_tax_rate")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Generic admin fee.
    AdminFee,
    /// Admin fee for a product family such as `hero`.
    ProductAdminFee(String),
    /// Processing fee.
    ProcessingFee,
    /// Dealer fee.
    DealerFee,
    /// Wholesale discount rate.
    WholesaleDiscount,
    /// Tax rate used when no jurisdiction-specific rate exists.
    DefaultTaxRate,
    /// Tax rate for a jurisdiction.
    TaxRate(Jurisdiction),
    /// Price multiplier for a jurisdiction.
    JurisdictionMultiplier(Jurisdiction),
    /// Support phone number.
    ContactPhone,
    /// Support email address.
    ContactEmail,
    /// Support hours.
    SupportHours,
}

impl SettingKey {
    /// Settings category.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::AdminFee | Self::ProductAdminFee(_) | Self::ProcessingFee | Self::DealerFee => {
                "fees"
            }
            Self::WholesaleDiscount => "discounts",
            Self::DefaultTaxRate | Self::TaxRate(_) => "taxes",
            Self::JurisdictionMultiplier(_) => "pricing",
            Self::ContactPhone | Self::ContactEmail | Self::SupportHours => "contact",
        }
    }

    /// Key within the category.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::AdminFee => "admin_fee".to_string(),
            Self::ProductAdminFee(product) => format!("{product}_admin_fee"),
            Self::ProcessingFee => "processing_fee".to_string(),
            Self::DealerFee => "dealer_fee".to_string(),
            Self::WholesaleDiscount => "wholesale_discount".to_string(),
            Self::DefaultTaxRate => "default_tax_rate".to_string(),
            Self::TaxRate(j) => format!("{}_tax_rate", j.settings_fragment()),
            Self::JurisdictionMultiplier(j) => format!("{}_multiplier", j.settings_fragment()),
            Self::ContactPhone => "phone".to_string(),
            Self::ContactEmail => "email".to_string(),
            Self::SupportHours => "support_hours".to_string(),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category(), self.key())
    }
}

/// Authoritative settings lookup.
///
/// Values are returned as raw JSON; interpretation (numeric strings, plain
/// numbers, quoted strings) belongs to the caller.
#[async_trait]
pub trait SettingsSource: Send + Sync + fmt::Debug {
    /// Looks up one setting.
    async fn get(&self, key: &SettingKey) -> LookupOutcome<serde_json::Value>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}
