//! # Quote Entity
//!
//! A priced protection-plan quote.
//!
//! A [`Quote`] is assembled once by the rating engine and never mutated. All
//! currency values are already rounded to cents; multipliers and rates are
//! reported as applied.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::entities::quote::QUOTE_VALIDITY_DAYS;
//!
//! assert_eq!(QUOTE_VALIDITY_DAYS, 30);
//! ```

use crate::domain::value_objects::enums::{CoverageLimit, CustomerType, DataSource};
use crate::domain::value_objects::ids::QuoteId;
use crate::domain::value_objects::jurisdiction::Jurisdiction;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days a quote remains valid after creation.
pub const QUOTE_VALIDITY_DAYS: i64 = 30;

/// What was quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProductInfo {
    /// Catalog key of the product.
    #[serde(rename = "type")]
    pub product_type: String,
    /// External product code.
    pub product_code: String,
    /// Term length in years.
    pub term_years: u32,
    /// Coverage tier.
    #[schemars(with = "u32")]
    pub coverage_limit: CoverageLimit,
    /// Customer pricing class.
    pub customer_type: CustomerType,
}

/// Currency breakdown, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PricingBreakdown {
    /// Product base price.
    #[schemars(with = "String")]
    pub base_price: Decimal,
    /// Price after all multipliers and the customer discount.
    #[schemars(with = "String")]
    pub subtotal: Decimal,
    /// Administrative fee.
    #[schemars(with = "String")]
    pub admin_fee: Decimal,
    /// Subtotal plus admin fee.
    #[schemars(with = "String")]
    pub subtotal_with_fee: Decimal,
    /// Tax on the subtotal with fee.
    #[schemars(with = "String")]
    pub tax_amount: Decimal,
    /// Amount due.
    #[schemars(with = "String")]
    pub total_price: Decimal,
    /// Total spread evenly over the term in months.
    #[schemars(with = "String")]
    pub monthly_payment: Decimal,
}

/// Multipliers applied to the base price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MultipliersApplied {
    /// Term multiplier.
    #[schemars(with = "String")]
    pub term: Decimal,
    /// Coverage tier multiplier.
    #[schemars(with = "String")]
    pub coverage: Decimal,
    /// Jurisdiction multiplier.
    #[schemars(with = "String")]
    pub jurisdiction: Decimal,
    /// Customer-tier factor (1.0 for retail).
    #[schemars(with = "String")]
    pub customer_discount: Decimal,
}

/// Where the fee and discount inputs came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FeesAndDiscounts {
    /// Source of the admin fee.
    pub admin_fee_source: DataSource,
    /// Wholesale discount rate in effect (0.15 = 15%).
    #[schemars(with = "String")]
    pub wholesale_discount_rate: Decimal,
    /// Source of the wholesale discount rate.
    pub discount_source: DataSource,
    /// Source of the product base price and term multiplier.
    pub price_source: DataSource,
}

/// Location-dependent inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteLocation {
    /// Jurisdiction code.
    #[schemars(with = "String")]
    pub jurisdiction_code: Jurisdiction,
    /// Postal code, if supplied.
    pub zip_code: Option<String>,
    /// Tax rate applied.
    #[schemars(with = "String")]
    pub tax_rate: Decimal,
    /// Source of the tax rate.
    pub tax_source: DataSource,
}

/// Payment choices offered with the quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PaymentOptions {
    /// Pay in full.
    #[schemars(with = "String")]
    pub full_payment: Decimal,
    /// Monthly instalment.
    #[schemars(with = "String")]
    pub monthly_payment: Decimal,
    /// Whether monthly financing is offered.
    pub financing_available: bool,
}

/// An immutable protection-plan quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    #[schemars(with = "String")]
    quote_id: QuoteId,
    product_info: ProductInfo,
    pricing: PricingBreakdown,
    multipliers_applied: MultipliersApplied,
    fees_and_discounts: FeesAndDiscounts,
    location: QuoteLocation,
    payment_options: PaymentOptions,
    #[schemars(with = "String")]
    created_at: Timestamp,
    #[schemars(with = "String")]
    valid_until: Timestamp,
}

impl Quote {
    /// Assembles a quote created at `created_at`; expiry is set
    /// [`QUOTE_VALIDITY_DAYS`] later.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        quote_id: QuoteId,
        product_info: ProductInfo,
        pricing: PricingBreakdown,
        multipliers_applied: MultipliersApplied,
        fees_and_discounts: FeesAndDiscounts,
        location: QuoteLocation,
        payment_options: PaymentOptions,
        created_at: Timestamp,
    ) -> Self {
        Self {
            quote_id,
            product_info,
            pricing,
            multipliers_applied,
            fees_and_discounts,
            location,
            payment_options,
            created_at,
            valid_until: created_at.add_days(QUOTE_VALIDITY_DAYS),
        }
    }

    /// Returns the quote ID.
    #[inline]
    #[must_use]
    pub fn quote_id(&self) -> &QuoteId {
        &self.quote_id
    }

    /// Returns what was quoted.
    #[inline]
    #[must_use]
    pub fn product_info(&self) -> &ProductInfo {
        &self.product_info
    }

    /// Returns the currency breakdown.
    #[inline]
    #[must_use]
    pub fn pricing(&self) -> &PricingBreakdown {
        &self.pricing
    }

    /// Returns the multipliers applied.
    #[inline]
    #[must_use]
    pub fn multipliers_applied(&self) -> &MultipliersApplied {
        &self.multipliers_applied
    }

    /// Returns fee and discount provenance.
    #[inline]
    #[must_use]
    pub fn fees_and_discounts(&self) -> &FeesAndDiscounts {
        &self.fees_and_discounts
    }

    /// Returns location inputs.
    #[inline]
    #[must_use]
    pub fn location(&self) -> &QuoteLocation {
        &self.location
    }

    /// Returns payment options.
    #[inline]
    #[must_use]
    pub fn payment_options(&self) -> &PaymentOptions {
        &self.payment_options
    }

    /// Returns when the quote was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the quote expires.
    #[inline]
    #[must_use]
    pub fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    /// Shorthand for the total price.
    #[inline]
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.pricing.total_price
    }

    /// Returns true if the quote has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.valid_until.is_expired()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} {} {}y @ {})",
            self.quote_id,
            self.product_info.product_type,
            self.product_info.term_years,
            self.pricing.total_price
        )
    }
}
