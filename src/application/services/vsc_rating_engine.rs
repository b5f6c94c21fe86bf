//! # VSC Rating Engine
//!
//! Prices vehicle service contracts from the embedded rate card.
//!
//! # Composition
//!
//! ```text
//! adjusted_price  = base_rate × age × mileage × term × deductible
//! adjusted_price  = adjusted_price × (1 − wholesale_discount)   wholesale only
//! subtotal        = adjusted_price + admin_fee
//! tax_amount      = subtotal × tax_rate
//! total_price     = subtotal + tax_amount
//! monthly_payment = total_price / term_months
//! ```
//!
//! The admin fee is the `vsc` family fee from the settings store, else
//! [`DEFAULT_VSC_ADMIN_FEE`]; it never inherits the generic admin fee. Tax
//! and wholesale discount resolve exactly as for protection plans.

use crate::application::services::settings_resolver::SettingsResolver;
use crate::domain::entities::quote::{FeesAndDiscounts, PaymentOptions, QuoteLocation};
use crate::domain::entities::vsc_quote::{
    VscCoverage, VscPricingBreakdown, VscQuote, VscRatingFactors, VscVehicle,
};
use crate::domain::value_objects::arithmetic::{
    ArithmeticError, CheckedArithmetic, checked_product, round_currency,
};
use crate::domain::value_objects::enums::{CustomerType, DataSource};
use crate::domain::value_objects::ids::QuoteId;
use crate::domain::value_objects::jurisdiction::Jurisdiction;
use crate::domain::value_objects::model_year::age_in_years;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::domain::vsc_rates::{
    CoverageLevel, CoverageOptions, DEFAULT_DEDUCTIBLE, DEFAULT_TERM_MONTHS, MAX_VSC_MILEAGE,
    MIN_VSC_MODEL_YEAR, VehicleClass, VehicleClassInfo, age_factor, base_rate, deductible_factor,
    deductible_options, mileage_factor, term_factor, term_options,
};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

/// Prefix of generated VSC quote IDs.
pub const DEFAULT_VSC_QUOTE_ID_PREFIX: &str = "VSC";

/// Product family used for the VSC admin fee setting.
pub const VSC_PRODUCT_FAMILY: &str = "vsc";

/// Admin fee when no `vsc` fee is stored.
pub const DEFAULT_VSC_ADMIN_FEE: Decimal = Decimal::from_parts(5000, 0, 0, false, 2);

/// Error type for VSC quote generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VscRatingError {
    /// The request lacks a field that could not be decoded from a VIN.
    #[error("vehicle {0} is required")]
    MissingVehicleDetail(&'static str),

    /// Make is blank or a single character.
    #[error("vehicle make is required (received {0:?})")]
    InvalidMake(String),

    /// Model year outside the rated window.
    #[error("vehicle year must be between {min} and {max} (received {year})")]
    InvalidYear {
        /// Requested model year.
        year: i32,
        /// Oldest accepted model year.
        min: i32,
        /// Newest accepted model year.
        max: i32,
    },

    /// Odometer reading above the rated maximum.
    #[error("mileage must be between 0 and {max} (received {mileage})")]
    InvalidMileage {
        /// Requested mileage.
        mileage: u32,
        /// Highest accepted mileage.
        max: u32,
    },

    /// Term not on the rate card.
    #[error("invalid term {term_months} months; available terms: {available:?}")]
    InvalidTerm {
        /// Requested term in months.
        term_months: u32,
        /// Terms on the rate card.
        available: Vec<u32>,
    },

    /// Deductible not on the rate card.
    #[error("invalid deductible {deductible}; available deductibles: {available:?}")]
    InvalidDeductible {
        /// Requested deductible.
        deductible: u32,
        /// Deductibles on the rate card.
        available: Vec<u32>,
    },

    /// The vehicle failed the eligibility check.
    #[error("vehicle is not eligible for a service contract: {}", restrictions.join("; "))]
    Ineligible {
        /// Reasons from the eligibility assessment.
        restrictions: Vec<String>,
    },

    /// Price composition overflowed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl VscRatingError {
    /// Returns true if the error was caused by the request itself.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Arithmetic(_))
    }
}

/// Result type for VSC rating operations.
pub type VscRatingResult<T> = Result<T, VscRatingError>;

fn default_term_months() -> u32 {
    DEFAULT_TERM_MONTHS
}

fn default_deductible() -> u32 {
    DEFAULT_DEDUCTIBLE
}

/// Input to [`VscRatingEngine::generate_quote`].
///
/// `make` and `year` are required for rating. When quoting through the
/// orchestrator they may be left out and filled from the VIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VscQuoteRequest {
    /// VIN used to fill in missing vehicle details.
    #[serde(default)]
    pub vin: Option<String>,
    /// Vehicle make.
    #[serde(default)]
    pub make: Option<String>,
    /// Vehicle model.
    #[serde(default)]
    pub model: Option<String>,
    /// Model year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Odometer reading.
    pub mileage: u32,
    /// Coverage level.
    #[serde(default)]
    pub coverage_level: CoverageLevel,
    /// Term in months.
    #[serde(default = "default_term_months")]
    pub term_months: u32,
    /// Deductible in dollars.
    #[serde(default = "default_deductible")]
    pub deductible: u32,
    /// Customer pricing class.
    #[serde(default)]
    pub customer_type: CustomerType,
    /// Jurisdiction used for the tax rate.
    #[serde(default)]
    #[schemars(with = "String")]
    pub jurisdiction: Jurisdiction,
    /// Postal code, recorded on the quote.
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl VscQuoteRequest {
    /// A retail gold, 36-month, $100-deductible request.
    #[must_use]
    pub fn new(make: impl Into<String>, year: i32, mileage: u32) -> Self {
        Self {
            make: Some(make.into()),
            year: Some(year),
            ..Self::for_vin_only(mileage)
        }
    }

    /// A request whose vehicle details come from `vin`.
    #[must_use]
    pub fn for_vin(vin: impl Into<String>, mileage: u32) -> Self {
        Self {
            vin: Some(vin.into()),
            ..Self::for_vin_only(mileage)
        }
    }

    fn for_vin_only(mileage: u32) -> Self {
        Self {
            vin: None,
            make: None,
            model: None,
            year: None,
            mileage,
            coverage_level: CoverageLevel::default(),
            term_months: DEFAULT_TERM_MONTHS,
            deductible: DEFAULT_DEDUCTIBLE,
            customer_type: CustomerType::default(),
            jurisdiction: Jurisdiction::default(),
            zip_code: None,
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the coverage level.
    #[must_use]
    pub fn with_coverage_level(mut self, coverage_level: CoverageLevel) -> Self {
        self.coverage_level = coverage_level;
        self
    }

    /// Sets the term in months.
    #[must_use]
    pub fn with_term_months(mut self, term_months: u32) -> Self {
        self.term_months = term_months;
        self
    }

    /// Sets the deductible.
    #[must_use]
    pub fn with_deductible(mut self, deductible: u32) -> Self {
        self.deductible = deductible;
        self
    }

    /// Sets the customer pricing class.
    #[must_use]
    pub fn with_customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = customer_type;
        self
    }

    /// Sets the jurisdiction.
    #[must_use]
    pub fn with_jurisdiction(mut self, jurisdiction: Jurisdiction) -> Self {
        self.jurisdiction = jurisdiction;
        self
    }

    /// Sets the postal code.
    #[must_use]
    pub fn with_zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VscRatingConfig {
    /// Prefix of generated quote IDs.
    pub quote_id_prefix: String,
    /// Admin fee when none is stored for the `vsc` family.
    pub default_admin_fee: Decimal,
    /// Whether quotes offer monthly financing.
    pub financing_available: bool,
}

impl Default for VscRatingConfig {
    fn default() -> Self {
        Self {
            quote_id_prefix: DEFAULT_VSC_QUOTE_ID_PREFIX.to_string(),
            default_admin_fee: DEFAULT_VSC_ADMIN_FEE,
            financing_available: true,
        }
    }
}

/// Vehicle service contract rating engine.
#[derive(Debug, Clone, Default)]
pub struct VscRatingEngine {
    settings: SettingsResolver,
    config: VscRatingConfig,
}

impl VscRatingEngine {
    /// Creates an engine over the given settings.
    #[must_use]
    pub fn new(settings: SettingsResolver, config: VscRatingConfig) -> Self {
        Self { settings, config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &VscRatingConfig {
        &self.config
    }

    /// Levels, terms, deductibles and class rates on the rate card.
    #[must_use]
    pub fn coverage_options(&self) -> CoverageOptions {
        CoverageOptions::standard()
    }

    /// The class a make is rated in, with its base rates.
    #[must_use]
    pub fn vehicle_class_info(&self, make: &str) -> VehicleClassInfo {
        VehicleClassInfo::for_class(VehicleClass::for_make(make))
    }

    /// Generates a quote timestamped now.
    ///
    /// # Errors
    ///
    /// See [`VscRatingEngine::generate_quote_at`].
    pub async fn generate_quote(&self, request: &VscQuoteRequest) -> VscRatingResult<VscQuote> {
        self.generate_quote_at(request, Timestamp::now()).await
    }

    /// Generates a quote created at `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `VscRatingError::MissingVehicleDetail` without a make or
    /// year, one of the `Invalid*` variants for values off the rate card,
    /// and `VscRatingError::Arithmetic` on overflow.
    #[instrument(
        skip(self, request),
        fields(coverage = %request.coverage_level, term = request.term_months)
    )]
    pub async fn generate_quote_at(
        &self,
        request: &VscQuoteRequest,
        created_at: Timestamp,
    ) -> VscRatingResult<VscQuote> {
        let current_year = created_at.year();

        let make = request
            .make
            .as_deref()
            .ok_or(VscRatingError::MissingVehicleDetail("make"))?
            .trim();
        if make.chars().count() < 2 {
            return Err(VscRatingError::InvalidMake(make.to_string()));
        }

        let year = request
            .year
            .ok_or(VscRatingError::MissingVehicleDetail("year"))?;
        let newest = current_year.saturating_add(1);
        if !(MIN_VSC_MODEL_YEAR..=newest).contains(&year) {
            return Err(VscRatingError::InvalidYear {
                year,
                min: MIN_VSC_MODEL_YEAR,
                max: newest,
            });
        }

        if request.mileage > MAX_VSC_MILEAGE {
            return Err(VscRatingError::InvalidMileage {
                mileage: request.mileage,
                max: MAX_VSC_MILEAGE,
            });
        }

        let term = term_factor(request.term_months).ok_or_else(|| VscRatingError::InvalidTerm {
            term_months: request.term_months,
            available: term_options(),
        })?;
        let deductible = deductible_factor(request.deductible).ok_or_else(|| {
            VscRatingError::InvalidDeductible {
                deductible: request.deductible,
                available: deductible_options(),
            }
        })?;

        let vehicle_class = VehicleClass::for_make(make);
        let age_years = age_in_years(year, current_year);
        let base = base_rate(vehicle_class, request.coverage_level);
        let age = age_factor(age_years);
        let mileage = mileage_factor(request.mileage);

        let jurisdiction = &request.jurisdiction;
        let (admin_fee, tax_rate, discount) = tokio::join!(
            self.settings
                .family_admin_fee(VSC_PRODUCT_FAMILY, self.config.default_admin_fee),
            self.settings.tax_rate(jurisdiction),
            self.settings.wholesale_discount(),
        );

        let customer_factor = if request.customer_type.is_wholesale() {
            Decimal::ONE.safe_sub(discount.value)?
        } else {
            Decimal::ONE
        };

        let adjusted_price =
            checked_product(&[base, age, mileage, term, deductible, customer_factor])?;
        let subtotal = adjusted_price.safe_add(admin_fee.value)?;
        let tax_amount = subtotal.safe_mul(tax_rate.value)?;
        let total_price = subtotal.safe_add(tax_amount)?;
        let monthly_payment = total_price.safe_div(Decimal::from(request.term_months))?;

        let pricing = VscPricingBreakdown {
            base_rate: round_currency(base),
            adjusted_price: round_currency(adjusted_price),
            admin_fee: round_currency(admin_fee.value),
            subtotal: round_currency(subtotal),
            tax_amount: round_currency(tax_amount),
            total_price: round_currency(total_price),
            monthly_payment: round_currency(monthly_payment),
        };

        let quote = VscQuote::from_parts(
            QuoteId::generate(&self.config.quote_id_prefix, created_at),
            VscVehicle {
                make: make.to_string(),
                model: request
                    .model
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string),
                year,
                mileage: request.mileage,
                vehicle_class,
                age_years,
            },
            VscCoverage {
                level: request.coverage_level,
                term_months: request.term_months,
                deductible: request.deductible,
                customer_type: request.customer_type,
            },
            pricing.clone(),
            VscRatingFactors {
                age,
                mileage,
                term,
                deductible,
                customer_discount: customer_factor,
            },
            FeesAndDiscounts {
                admin_fee_source: admin_fee.source,
                wholesale_discount_rate: discount.value,
                discount_source: discount.source,
                price_source: DataSource::Hardcoded,
            },
            QuoteLocation {
                jurisdiction_code: jurisdiction.clone(),
                zip_code: request.zip_code.clone(),
                tax_rate: tax_rate.value,
                tax_source: tax_rate.source,
            },
            PaymentOptions {
                full_payment: pricing.total_price,
                monthly_payment: pricing.monthly_payment,
                financing_available: self.config.financing_available,
            },
            created_at,
        );

        info!(
            quote_id = %quote.quote_id(),
            vehicle_class = %vehicle_class,
            customer_type = %request.customer_type,
            total = %pricing.total_price,
            "vsc quote generated"
        );

        Ok(quote)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::in_memory::InMemorySettingsStore;
    use crate::infrastructure::persistence::traits::SettingKey;
    use serde_json::json;
    use std::sync::Arc;

    fn at() -> Timestamp {
        Timestamp::from_ymd(2025, 6, 1).unwrap()
    }

    async fn quote(request: VscQuoteRequest) -> VscRatingResult<VscQuote> {
        VscRatingEngine::default().generate_quote_at(&request, at()).await
    }

    #[tokio::test]
    async fn retail_gold_honda() {
        let quote = quote(VscQuoteRequest::new("Honda", 2020, 60_000).with_model("Accord"))
            .await
            .unwrap();
        let pricing = quote.pricing();

        // 1200 x 1.15 (age 5) x 1.15 (60k miles) = 1587.00
        assert_eq!(pricing.base_rate, Decimal::new(1200, 0));
        assert_eq!(pricing.adjusted_price, Decimal::new(158_700, 2));
        assert_eq!(pricing.admin_fee, Decimal::new(50, 0));
        assert_eq!(pricing.subtotal, Decimal::new(163_700, 2));
        assert_eq!(pricing.tax_amount, Decimal::new(11459, 2));
        assert_eq!(pricing.total_price, Decimal::new(175_159, 2));
        assert_eq!(pricing.monthly_payment, Decimal::new(4866, 2));

        assert_eq!(quote.vehicle().vehicle_class, VehicleClass::A);
        assert_eq!(quote.vehicle().age_years, 5);
        assert_eq!(quote.vehicle().model.as_deref(), Some("Accord"));
        assert_eq!(quote.rating_factors().customer_discount, Decimal::ONE);
        assert_eq!(quote.fees_and_discounts().admin_fee_source, DataSource::Hardcoded);
        assert_eq!(quote.location().tax_rate, Decimal::new(7, 2));
        assert!(quote.quote_id().as_str().starts_with("VSC-20250601000000-"));
        assert_eq!(quote.valid_until(), at().add_days(30));
    }

    #[tokio::test]
    async fn wholesale_platinum_long_term_zero_deductible() {
        let request = VscQuoteRequest::new("BMW", 2024, 10_000)
            .with_coverage_level(CoverageLevel::Platinum)
            .with_term_months(72)
            .with_deductible(0)
            .with_customer_type(CustomerType::Wholesale);
        let quote = quote(request).await.unwrap();

        // 2800 x 1.60 x 1.25 x 0.85 = 4760.00
        assert_eq!(quote.pricing().adjusted_price, Decimal::new(4760, 0));
        assert_eq!(quote.pricing().total_price, Decimal::new(514_670, 2));
        assert_eq!(quote.pricing().monthly_payment, Decimal::new(7148, 2));
        assert_eq!(quote.rating_factors().customer_discount, Decimal::new(85, 2));
        assert_eq!(quote.rating_factors().term, Decimal::new(16, 1));
        assert_eq!(quote.rating_factors().deductible, Decimal::new(125, 2));
    }

    #[tokio::test]
    async fn stored_settings_drive_fee_and_tax() {
        let store = InMemorySettingsStore::new();
        store.set(&SettingKey::AdminFee, json!("25.00")).await;
        store
            .set(&SettingKey::ProductAdminFee("vsc".to_string()), json!(75))
            .await;
        let ca = Jurisdiction::new("CA").unwrap();
        store.set(&SettingKey::TaxRate(ca.clone()), json!("0.0725")).await;
        let engine = VscRatingEngine::new(
            SettingsResolver::new().with_source(Arc::new(store)),
            VscRatingConfig::default(),
        );

        let request = VscQuoteRequest::new("Ford", 2015, 130_000)
            .with_coverage_level(CoverageLevel::Silver)
            .with_term_months(12)
            .with_deductible(1000)
            .with_jurisdiction(ca)
            .with_zip_code("94105");
        let quote = engine.generate_quote_at(&request, at()).await.unwrap();

        // 1000 x 1.35 x 1.75 x 0.40 x 0.65 = 614.25; + 75 = 689.25
        assert_eq!(quote.pricing().adjusted_price, Decimal::new(61425, 2));
        assert_eq!(quote.pricing().subtotal, Decimal::new(68925, 2));
        assert_eq!(quote.pricing().tax_amount, Decimal::new(4997, 2));
        assert_eq!(quote.pricing().total_price, Decimal::new(73922, 2));
        assert_eq!(quote.pricing().monthly_payment, Decimal::new(6160, 2));
        assert_eq!(quote.fees_and_discounts().admin_fee_source, DataSource::Database);
        assert_eq!(quote.location().tax_source, DataSource::Database);
        assert_eq!(quote.location().zip_code.as_deref(), Some("94105"));
    }

    #[tokio::test]
    async fn model_year_window() {
        let err = quote(VscQuoteRequest::new("Honda", 1989, 1_000)).await.unwrap_err();
        assert_eq!(
            err,
            VscRatingError::InvalidYear {
                year: 1989,
                min: 1990,
                max: 2026
            }
        );
        assert!(quote(VscQuoteRequest::new("Honda", 1990, 1_000)).await.is_ok());
        assert!(quote(VscQuoteRequest::new("Honda", 2026, 1_000)).await.is_ok());
        assert!(quote(VscQuoteRequest::new("Honda", 2027, 1_000)).await.is_err());
        assert!(quote(VscQuoteRequest::new("Honda", i32::MIN, 1_000)).await.is_err());
    }

    #[tokio::test]
    async fn mileage_limit_is_inclusive() {
        assert!(quote(VscQuoteRequest::new("Kia", 2022, 500_000)).await.is_ok());
        let err = quote(VscQuoteRequest::new("Kia", 2022, 500_001))
            .await
            .unwrap_err();
        assert!(matches!(err, VscRatingError::InvalidMileage { mileage: 500_001, .. }));
    }

    #[tokio::test]
    async fn off_card_term_and_deductible_are_rejected() {
        let err = quote(VscQuoteRequest::new("Kia", 2022, 1_000).with_term_months(30))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            VscRatingError::InvalidTerm { term_months: 30, available } if available.len() == 6
        ));

        let err = quote(VscQuoteRequest::new("Kia", 2022, 1_000).with_deductible(250))
            .await
            .unwrap_err();
        assert!(matches!(err, VscRatingError::InvalidDeductible { deductible: 250, .. }));
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn make_and_year_are_required() {
        let err = quote(VscQuoteRequest::for_vin("1HGCM82633A004352", 1_000))
            .await
            .unwrap_err();
        assert_eq!(err, VscRatingError::MissingVehicleDetail("make"));

        let mut request = VscQuoteRequest::new("Honda", 2020, 1_000);
        request.year = None;
        assert_eq!(
            quote(request).await.unwrap_err(),
            VscRatingError::MissingVehicleDetail("year")
        );

        let err = quote(VscQuoteRequest::new(" X ", 2020, 1_000)).await.unwrap_err();
        assert_eq!(err, VscRatingError::InvalidMake("X".to_string()));
    }

    #[tokio::test]
    async fn unknown_make_rates_as_class_b() {
        let quote = quote(VscQuoteRequest::new("Tesla", 2024, 5_000)).await.unwrap();
        assert_eq!(quote.vehicle().vehicle_class, VehicleClass::B);
        assert_eq!(quote.pricing().base_rate, Decimal::new(1500, 0));
    }

    #[test]
    fn class_info_and_options() {
        let engine = VscRatingEngine::default();
        let info = engine.vehicle_class_info("Mercedes-Benz");
        assert_eq!(info.vehicle_class, VehicleClass::C);
        assert_eq!(info.base_rates.len(), 3);
        assert_eq!(engine.coverage_options().terms.len(), 6);
    }

    #[test]
    fn request_defaults_from_json() {
        let request: VscQuoteRequest =
            serde_json::from_str(r#"{"make": "Toyota", "year": 2021, "mileage": 42000}"#).unwrap();
        assert_eq!(request.coverage_level, CoverageLevel::Gold);
        assert_eq!(request.term_months, 36);
        assert_eq!(request.deductible, 100);
        assert_eq!(request.jurisdiction.as_str(), "FL");
    }
}
