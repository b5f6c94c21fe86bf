//! # Product Pricing Configuration
//!
//! Base price and per-term multipliers for one protection-plan product.

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pricing configuration for a single product.
///
/// # Invariants
///
/// - `base_price` is positive
/// - at least one term is offered
/// - every term multiplier is at least 1.0
///
/// # Examples
///
/// ```
/// use protection_quote::domain::entities::product::ProductPricingConfig;
/// use rust_decimal::Decimal;
///
/// let config = ProductPricingConfig::new(
///     "HOME_PROTECTION_PLAN",
///     "home_protection",
///     Decimal::new(199, 0),
///     [(1, Decimal::ONE), (2, Decimal::new(18, 1))],
/// )
/// .unwrap();
///
/// assert_eq!(config.terms(), vec![1, 2]);
/// assert_eq!(config.multiplier(2), Some(Decimal::new(18, 1)));
/// assert!(!config.supports_term(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProductPricingConfig {
    product_code: String,
    key: String,
    #[schemars(with = "String")]
    base_price: Decimal,
    #[schemars(with = "BTreeMap<u32, String>")]
    multipliers: BTreeMap<u32, Decimal>,
}

impl ProductPricingConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the base price is not
    /// positive, no terms are given, a term is zero, or a multiplier is below
    /// 1.0.
    pub fn new(
        product_code: impl Into<String>,
        key: impl Into<String>,
        base_price: Decimal,
        multipliers: impl IntoIterator<Item = (u32, Decimal)>,
    ) -> DomainResult<Self> {
        let product_code = product_code.into();
        if base_price <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "{product_code}: base price must be positive"
            )));
        }

        let multipliers: BTreeMap<u32, Decimal> = multipliers.into_iter().collect();
        if multipliers.is_empty() {
            return Err(DomainError::validation(format!(
                "{product_code}: at least one term is required"
            )));
        }
        for (term, multiplier) in &multipliers {
            if *term == 0 {
                return Err(DomainError::validation(format!(
                    "{product_code}: term must be at least one year"
                )));
            }
            if *multiplier < Decimal::ONE {
                return Err(DomainError::validation(format!(
                    "{product_code}: multiplier for {term}-year term is below 1.0"
                )));
            }
        }

        Ok(Self {
            product_code,
            key: key.into(),
            base_price,
            multipliers,
        })
    }

    /// External product code (`HOME_PROTECTION_PLAN`).
    #[inline]
    #[must_use]
    pub fn product_code(&self) -> &str {
        &self.product_code
    }

    /// Internal catalog key (`home_protection`).
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Base price for a one-year term.
    #[inline]
    #[must_use]
    pub fn base_price(&self) -> Decimal {
        self.base_price
    }

    /// Multiplier for `term_years`, if offered.
    #[must_use]
    pub fn multiplier(&self, term_years: u32) -> Option<Decimal> {
        self.multipliers.get(&term_years).copied()
    }

    /// Returns true if the product is sold with this term.
    #[must_use]
    pub fn supports_term(&self, term_years: u32) -> bool {
        self.multipliers.contains_key(&term_years)
    }

    /// Offered terms in ascending order.
    #[must_use]
    pub fn terms(&self) -> Vec<u32> {
        self.multipliers.keys().copied().collect()
    }

    /// Term multipliers in ascending term order.
    #[must_use]
    pub fn multipliers(&self) -> &BTreeMap<u32, Decimal> {
        &self.multipliers
    }
}
