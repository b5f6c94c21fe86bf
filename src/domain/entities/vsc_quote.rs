//! # Vehicle Service Contract Quote
//!
//! A priced vehicle service contract. Like [`Quote`](super::quote::Quote),
//! it is assembled once, holds cent-rounded currency values and expires
//! [`QUOTE_VALIDITY_DAYS`] after creation.

use crate::domain::entities::quote::{
    FeesAndDiscounts, PaymentOptions, QUOTE_VALIDITY_DAYS, QuoteLocation,
};
use crate::domain::value_objects::enums::CustomerType;
use crate::domain::value_objects::ids::QuoteId;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::vsc_rates::{CoverageLevel, VehicleClass};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The vehicle as rated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VscVehicle {
    /// Make as supplied or decoded.
    pub make: String,
    /// Model, when known.
    pub model: Option<String>,
    /// Model year.
    pub year: i32,
    /// Odometer reading.
    pub mileage: u32,
    /// Class used for the base rate.
    pub vehicle_class: VehicleClass,
    /// Age in model years at quote time.
    pub age_years: u32,
}

/// Contract terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VscCoverage {
    /// Coverage level.
    pub level: CoverageLevel,
    /// Term in months.
    pub term_months: u32,
    /// Deductible per claim in dollars.
    pub deductible: u32,
    /// Customer pricing class.
    pub customer_type: CustomerType,
}

/// Currency breakdown, rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VscPricingBreakdown {
    /// Rate card base rate.
    #[schemars(with = "String")]
    pub base_rate: Decimal,
    /// Base rate after every factor and the customer discount.
    #[schemars(with = "String")]
    pub adjusted_price: Decimal,
    /// Administrative fee.
    #[schemars(with = "String")]
    pub admin_fee: Decimal,
    /// Adjusted price plus admin fee.
    #[schemars(with = "String")]
    pub subtotal: Decimal,
    /// Tax on the subtotal.
    #[schemars(with = "String")]
    pub tax_amount: Decimal,
    /// Amount due.
    #[schemars(with = "String")]
    pub total_price: Decimal,
    /// Total spread over the term.
    #[schemars(with = "String")]
    pub monthly_payment: Decimal,
}

/// Factors applied to the base rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VscRatingFactors {
    /// Vehicle age factor.
    #[schemars(with = "String")]
    pub age: Decimal,
    /// Mileage factor.
    #[schemars(with = "String")]
    pub mileage: Decimal,
    /// Term factor.
    #[schemars(with = "String")]
    pub term: Decimal,
    /// Deductible factor.
    #[schemars(with = "String")]
    pub deductible: Decimal,
    /// Customer-tier factor (1.0 for retail).
    #[schemars(with = "String")]
    pub customer_discount: Decimal,
}

/// An immutable vehicle service contract quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VscQuote {
    #[schemars(with = "String")]
    quote_id: QuoteId,
    vehicle: VscVehicle,
    coverage: VscCoverage,
    pricing: VscPricingBreakdown,
    rating_factors: VscRatingFactors,
    fees_and_discounts: FeesAndDiscounts,
    location: QuoteLocation,
    payment_options: PaymentOptions,
    #[schemars(with = "String")]
    created_at: Timestamp,
    #[schemars(with = "String")]
    valid_until: Timestamp,
}

impl VscQuote {
    /// Assembles a quote created at `created_at`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        quote_id: QuoteId,
        vehicle: VscVehicle,
        coverage: VscCoverage,
        pricing: VscPricingBreakdown,
        rating_factors: VscRatingFactors,
        fees_and_discounts: FeesAndDiscounts,
        location: QuoteLocation,
        payment_options: PaymentOptions,
        created_at: Timestamp,
    ) -> Self {
        Self {
            quote_id,
            vehicle,
            coverage,
            pricing,
            rating_factors,
            fees_and_discounts,
            location,
            payment_options,
            created_at,
            valid_until: created_at.add_days(QUOTE_VALIDITY_DAYS),
        }
    }

    /// Returns the quote ID.
    #[must_use]
    pub fn quote_id(&self) -> &QuoteId {
        &self.quote_id
    }

    /// Returns the vehicle as rated.
    #[must_use]
    pub fn vehicle(&self) -> &VscVehicle {
        &self.vehicle
    }

    /// Returns the contract terms.
    #[must_use]
    pub fn coverage(&self) -> &VscCoverage {
        &self.coverage
    }

    /// Returns the currency breakdown.
    #[must_use]
    pub fn pricing(&self) -> &VscPricingBreakdown {
        &self.pricing
    }

    /// Returns the factors applied.
    #[must_use]
    pub fn rating_factors(&self) -> &VscRatingFactors {
        &self.rating_factors
    }

    /// Returns payment options.
    #[must_use]
    pub fn payment_options(&self) -> &PaymentOptions {
        &self.payment_options
    }

    /// Returns fee and discount provenance.
    #[must_use]
    pub fn fees_and_discounts(&self) -> &FeesAndDiscounts {
        &self.fees_and_discounts
    }

    /// Returns location inputs, including the tax rate applied.
    #[must_use]
    pub fn location(&self) -> &QuoteLocation {
        &self.location
    }

    /// Returns when the quote was created.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the quote expires.
    #[must_use]
    pub fn valid_until(&self) -> Timestamp {
        self.valid_until
    }

    /// Shorthand for the total price.
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

impl fmt::Display for VscQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VscQuote({} {} {} {}mo @ {})",
            self.quote_id,
            self.vehicle.make,
            self.coverage.level,
            self.coverage.term_months,
            self.pricing.total_price
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::DataSource;
    use crate::domain::value_objects::jurisdiction::Jurisdiction;

    fn sample() -> VscQuote {
        let total = Decimal::new(175_159, 2);
        let monthly = Decimal::new(4866, 2);
        VscQuote::from_parts(
            QuoteId::new("VSC-20250601000000-abcdef01"),
            VscVehicle {
                make: "Honda".to_string(),
                model: None,
                year: 2020,
                mileage: 60_000,
                vehicle_class: VehicleClass::A,
                age_years: 5,
            },
            VscCoverage {
                level: CoverageLevel::Gold,
                term_months: 36,
                deductible: 100,
                customer_type: CustomerType::Retail,
            },
            VscPricingBreakdown {
                base_rate: Decimal::new(1200, 0),
                adjusted_price: Decimal::new(158_700, 2),
                admin_fee: Decimal::new(50, 0),
                subtotal: Decimal::new(163_700, 2),
                tax_amount: Decimal::new(11459, 2),
                total_price: total,
                monthly_payment: monthly,
            },
            VscRatingFactors {
                age: Decimal::new(115, 2),
                mileage: Decimal::new(115, 2),
                term: Decimal::ONE,
                deductible: Decimal::ONE,
                customer_discount: Decimal::ONE,
            },
            FeesAndDiscounts {
                admin_fee_source: DataSource::Hardcoded,
                wholesale_discount_rate: Decimal::new(15, 2),
                discount_source: DataSource::Hardcoded,
                price_source: DataSource::Hardcoded,
            },
            QuoteLocation {
                jurisdiction_code: Jurisdiction::default(),
                zip_code: None,
                tax_rate: Decimal::new(7, 2),
                tax_source: DataSource::Hardcoded,
            },
            PaymentOptions {
                full_payment: total,
                monthly_payment: monthly,
                financing_available: true,
            },
            Timestamp::from_ymd(2025, 6, 1).unwrap(),
        )
    }

    #[test]
    fn expires_thirty_days_after_creation() {
        let quote = sample();
        assert_eq!(quote.valid_until(), Timestamp::from_ymd(2025, 7, 1).unwrap());
    }

    #[test]
    fn serializes_sections() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["vehicle"]["vehicle_class"], "A");
        assert_eq!(json["coverage"]["level"], "gold");
        assert_eq!(json["pricing"]["total_price"], "1751.59");
        assert_eq!(json["rating_factors"]["age"], "1.15");
        assert!(json["vehicle"]["model"].is_null());
        assert_eq!(json["location"]["tax_rate"], "0.07");
    }

    #[test]
    fn display_names_vehicle_and_total() {
        let text = sample().to_string();
        assert!(text.contains("Honda"));
        assert!(text.contains("gold 36mo"));
        assert!(text.contains("1751.59"));
    }
}
