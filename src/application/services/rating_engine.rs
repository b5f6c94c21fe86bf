//! # Rating Engine
//!
//! Composes a [`Quote`] from a resolved product price and the pricing
//! adjustments in force.
//!
//! # Composition
//!
//! ```text
//! subtotal          = base × term × coverage × jurisdiction
//! subtotal          = subtotal × (1 − wholesale_discount)   wholesale only
//! subtotal_with_fee = subtotal + admin_fee
//! tax_amount        = subtotal_with_fee × tax_rate
//! total_price       = subtotal_with_fee + tax_amount
//! monthly_payment   = total_price / (term_years × 12)
//! ```
//!
//! Every step runs at full precision with checked arithmetic; currency
//! values are rounded to cents only when the quote is assembled.
//!
//! The product price is always resolved at the retail tier, so the
//! wholesale discount is applied exactly once, here.

use crate::application::services::pricing_resolver::{PricingResolver, ResolutionError};
use crate::application::services::settings_resolver::SettingsResolver;
use crate::domain::catalog::PricingCatalog;
use crate::domain::entities::product::ProductPricingConfig;
use crate::domain::entities::quote::{
    FeesAndDiscounts, MultipliersApplied, PaymentOptions, PricingBreakdown, ProductInfo, Quote,
    QuoteLocation,
};
use crate::domain::value_objects::arithmetic::{
    ArithmeticError, CheckedArithmetic, checked_product, round_currency,
};
use crate::domain::value_objects::enums::{CoverageLimit, CustomerType};
use crate::domain::value_objects::ids::QuoteId;
use crate::domain::value_objects::jurisdiction::Jurisdiction;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

/// Prefix of generated quote IDs.
pub const DEFAULT_QUOTE_ID_PREFIX: &str = "HERO";

/// Product family used for the family-specific admin fee setting.
pub const DEFAULT_PRODUCT_FAMILY: &str = "hero";

/// Error type for quote generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    /// Neither a catalog key nor a product code.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The product is not sold with the requested term.
    #[error("invalid term {term_years} for {product}; available terms: {available:?}")]
    InvalidTerm {
        /// Catalog key of the product.
        product: String,
        /// Requested term.
        term_years: u32,
        /// Terms the product supports.
        available: Vec<u32>,
    },

    /// Coverage limit is not a supported tier.
    #[error("unsupported coverage limit: {0} (supported: 500, 1000)")]
    InvalidCoverageLimit(u32),

    /// No price could be resolved, even from the catalog.
    #[error("price resolution failed: {0}")]
    ResolutionFailure(#[from] ResolutionError),

    /// Price composition overflowed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl RatingError {
    /// Returns true if the error was caused by the request itself.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownProduct(_) | Self::InvalidTerm { .. } | Self::InvalidCoverageLimit(_)
        )
    }
}

/// Result type for rating operations.
pub type RatingResult<T> = Result<T, RatingError>;

fn default_coverage_limit() -> u32 {
    CoverageLimit::default().amount()
}

/// Input to [`RatingEngine::generate_quote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteRequest {
    /// Catalog key or external product code.
    pub product_type: String,
    /// Term length in years.
    pub term_years: u32,
    /// Coverage tier amount (500 or 1000).
    #[serde(default = "default_coverage_limit")]
    pub coverage_limit: u32,
    /// Customer pricing class.
    #[serde(default)]
    pub customer_type: CustomerType,
    /// Jurisdiction code.
    #[serde(default)]
    #[schemars(with = "String")]
    pub jurisdiction: Jurisdiction,
    /// Postal code, echoed on the quote.
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl QuoteRequest {
    /// A retail, standard-coverage request in the default jurisdiction.
    #[must_use]
    pub fn new(product_type: impl Into<String>, term_years: u32) -> Self {
        Self {
            product_type: product_type.into(),
            term_years,
            coverage_limit: default_coverage_limit(),
            customer_type: CustomerType::default(),
            jurisdiction: Jurisdiction::default(),
            zip_code: None,
        }
    }

    /// Sets the coverage tier amount.
    #[must_use]
    pub fn with_coverage_limit(mut self, coverage_limit: u32) -> Self {
        self.coverage_limit = coverage_limit;
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

/// Catalog entry as listed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProductSummary {
    /// Catalog key.
    pub key: String,
    /// External product code.
    pub product_code: String,
    /// Base price.
    #[schemars(with = "String")]
    pub base_price: Decimal,
    /// Supported terms in years.
    pub terms: Vec<u32>,
}

impl From<&ProductPricingConfig> for ProductSummary {
    fn from(product: &ProductPricingConfig) -> Self {
        Self {
            key: product.key().to_string(),
            product_code: product.product_code().to_string(),
            base_price: product.base_price(),
            terms: product.terms(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Prefix of generated quote IDs.
    pub quote_id_prefix: String,
    /// Product family for the family-specific admin fee.
    pub product_family: String,
    /// Whether quotes offer monthly financing.
    pub financing_available: bool,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            quote_id_prefix: DEFAULT_QUOTE_ID_PREFIX.to_string(),
            product_family: DEFAULT_PRODUCT_FAMILY.to_string(),
            financing_available: true,
        }
    }
}

/// Protection-plan rating engine.
#[derive(Debug, Clone)]
pub struct RatingEngine {
    pricing: PricingResolver,
    settings: SettingsResolver,
    config: RatingConfig,
}

impl RatingEngine {
    /// Creates an engine over the given resolvers.
    #[must_use]
    pub fn new(pricing: PricingResolver, settings: SettingsResolver, config: RatingConfig) -> Self {
        Self {
            pricing,
            settings,
            config,
        }
    }

    /// Returns the pricing catalog.
    #[must_use]
    pub fn catalog(&self) -> &PricingCatalog {
        self.pricing.catalog()
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Returns the settings resolver.
    #[must_use]
    pub fn settings(&self) -> &SettingsResolver {
        &self.settings
    }

    /// Lists every product in catalog order.
    #[must_use]
    pub fn available_products(&self) -> Vec<ProductSummary> {
        self.catalog().products().map(ProductSummary::from).collect()
    }

    /// Terms supported by a product, by catalog key or product code.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::UnknownProduct` if the product does not exist.
    pub fn product_terms(&self, product: &str) -> RatingResult<Vec<u32>> {
        self.catalog()
            .get(product)
            .map(ProductPricingConfig::terms)
            .ok_or_else(|| RatingError::UnknownProduct(product.to_string()))
    }

    /// Generates a quote timestamped now.
    ///
    /// # Errors
    ///
    /// See [`RatingEngine::generate_quote_at`].
    pub async fn generate_quote(&self, request: &QuoteRequest) -> RatingResult<Quote> {
        self.generate_quote_at(request, Timestamp::now()).await
    }

    /// Generates a quote created at `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::UnknownProduct`, `RatingError::InvalidTerm` or
    /// `RatingError::InvalidCoverageLimit` for bad input,
    /// `RatingError::ResolutionFailure` if no price exists for the product,
    /// and `RatingError::Arithmetic` on overflow.
    #[instrument(skip(self, request), fields(product = %request.product_type, term = request.term_years))]
    pub async fn generate_quote_at(
        &self,
        request: &QuoteRequest,
        created_at: Timestamp,
    ) -> RatingResult<Quote> {
        let product = self
            .catalog()
            .get(&request.product_type)
            .ok_or_else(|| RatingError::UnknownProduct(request.product_type.clone()))?;

        if !product.supports_term(request.term_years) {
            return Err(RatingError::InvalidTerm {
                product: product.key().to_string(),
                term_years: request.term_years,
                available: product.terms(),
            });
        }

        let coverage = CoverageLimit::try_from(request.coverage_limit)
            .map_err(|_| RatingError::InvalidCoverageLimit(request.coverage_limit))?;

        let price = self
            .pricing
            .resolve_price(
                product.product_code(),
                request.term_years,
                CustomerType::Retail,
            )
            .await?;

        let jurisdiction = &request.jurisdiction;
        let (jurisdiction_multiplier, admin_fee, tax_rate, discount) = tokio::join!(
            self.settings.jurisdiction_multiplier(jurisdiction),
            self.settings.admin_fee(&self.config.product_family),
            self.settings.tax_rate(jurisdiction),
            self.settings.wholesale_discount(),
        );

        let customer_factor = if request.customer_type.is_wholesale() {
            Decimal::ONE.safe_sub(discount.value)?
        } else {
            Decimal::ONE
        };

        let subtotal = checked_product(&[
            price.base_price,
            price.multiplier,
            coverage.multiplier(),
            jurisdiction_multiplier.value,
            customer_factor,
        ])?;
        let subtotal_with_fee = subtotal.safe_add(admin_fee.value)?;
        let tax_amount = subtotal_with_fee.safe_mul(tax_rate.value)?;
        let total_price = subtotal_with_fee.safe_add(tax_amount)?;
        let months = Decimal::from(request.term_years).safe_mul(Decimal::from(12u32))?;
        let monthly_payment = total_price.safe_div(months)?;

        let pricing = PricingBreakdown {
            base_price: round_currency(price.base_price),
            subtotal: round_currency(subtotal),
            admin_fee: round_currency(admin_fee.value),
            subtotal_with_fee: round_currency(subtotal_with_fee),
            tax_amount: round_currency(tax_amount),
            total_price: round_currency(total_price),
            monthly_payment: round_currency(monthly_payment),
        };

        let quote = Quote::from_parts(
            QuoteId::generate(&self.config.quote_id_prefix, created_at),
            ProductInfo {
                product_type: product.key().to_string(),
                product_code: product.product_code().to_string(),
                term_years: request.term_years,
                coverage_limit: coverage,
                customer_type: request.customer_type,
            },
            pricing.clone(),
            MultipliersApplied {
                term: price.multiplier,
                coverage: coverage.multiplier(),
                jurisdiction: jurisdiction_multiplier.value,
                customer_discount: customer_factor,
            },
            FeesAndDiscounts {
                admin_fee_source: admin_fee.source,
                wholesale_discount_rate: discount.value,
                discount_source: discount.source,
                price_source: price.data_source,
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
            customer_type = %request.customer_type,
            jurisdiction = %jurisdiction,
            total = %pricing.total_price,
            price_source = %price.data_source,
            "quote generated"
        );

        Ok(quote)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::enums::DataSource;
    use crate::infrastructure::persistence::in_memory::{
        InMemoryPricingStore, InMemorySettingsStore,
    };
    use crate::infrastructure::persistence::traits::{PriceEntry, SettingKey};
    use proptest::prelude::*;
    use serde_json::json;
    use std::sync::Arc;

    fn engine() -> RatingEngine {
        RatingEngine::new(
            PricingResolver::new(Arc::new(PricingCatalog::standard())),
            SettingsResolver::new(),
            RatingConfig::default(),
        )
    }

    fn at() -> Timestamp {
        Timestamp::from_ymd(2024, 1, 1).unwrap()
    }

    async fn quote(request: QuoteRequest) -> Quote {
        engine().generate_quote_at(&request, at()).await.unwrap()
    }

    #[tokio::test]
    async fn retail_home_protection_two_years() {
        let quote = quote(QuoteRequest::new("home_protection", 2)).await;
        let pricing = quote.pricing();

        assert_eq!(pricing.base_price, Decimal::new(199, 0));
        assert_eq!(pricing.subtotal, Decimal::new(35820, 2));
        assert_eq!(pricing.admin_fee, Decimal::new(25, 0));
        assert_eq!(pricing.subtotal_with_fee, Decimal::new(38320, 2));
        assert_eq!(pricing.tax_amount, Decimal::new(2682, 2));
        assert_eq!(pricing.total_price, Decimal::new(41002, 2));
        assert_eq!(pricing.monthly_payment, Decimal::new(1708, 2));

        assert_eq!(quote.product_info().product_code, "HOME_PROTECTION_PLAN");
        assert_eq!(quote.multipliers_applied().term, Decimal::new(18, 1));
        assert_eq!(quote.multipliers_applied().customer_discount, Decimal::ONE);
        assert_eq!(quote.fees_and_discounts().price_source, DataSource::Hardcoded);
        assert_eq!(quote.location().tax_rate, Decimal::new(7, 2));
        assert_eq!(quote.payment_options().full_payment, pricing.total_price);
        assert!(quote.quote_id().as_str().starts_with("HERO-20240101000000-"));
        assert_eq!(quote.valid_until(), at().add_days(30));
    }

    #[tokio::test]
    async fn product_code_is_accepted() {
        let by_key = quote(QuoteRequest::new("auto_protection", 3)).await;
        let by_code = quote(QuoteRequest::new("COMPREHENSIVE_AUTO_PROTECTION", 3)).await;
        assert_eq!(by_key.pricing(), by_code.pricing());
        assert_eq!(by_code.product_info().product_type, "auto_protection");
    }

    #[tokio::test]
    async fn wholesale_subtotal_is_exactly_85_percent() {
        let retail = quote(QuoteRequest::new("home_protection", 2)).await;
        let wholesale = quote(
            QuoteRequest::new("home_protection", 2).with_customer_type(CustomerType::Wholesale),
        )
        .await;

        assert_eq!(wholesale.pricing().subtotal, Decimal::new(30447, 2));
        assert_eq!(
            wholesale.pricing().subtotal,
            round_currency(retail.pricing().subtotal * Decimal::new(85, 2))
        );
        assert_eq!(
            wholesale.multipliers_applied().customer_discount,
            Decimal::new(85, 2)
        );
        assert_eq!(wholesale.pricing().total_price, Decimal::new(35253, 2));
    }

    #[tokio::test]
    async fn enhanced_coverage_is_twenty_percent_more() {
        let standard = quote(QuoteRequest::new("home_protection", 2)).await;
        let enhanced = quote(QuoteRequest::new("home_protection", 2).with_coverage_limit(1000)).await;
        assert_eq!(enhanced.pricing().subtotal, Decimal::new(42984, 2));
        assert_eq!(
            enhanced.pricing().subtotal,
            standard.pricing().subtotal * Decimal::new(12, 1)
        );
    }

    #[tokio::test]
    async fn jurisdiction_multiplier_applies() {
        let ca = quote(
            QuoteRequest::new("home_protection", 2)
                .with_jurisdiction(Jurisdiction::new("CA").unwrap())
                .with_zip_code("90210"),
        )
        .await;
        assert_eq!(ca.pricing().subtotal, Decimal::new(41193, 2));
        assert_eq!(ca.multipliers_applied().jurisdiction, Decimal::new(115, 2));
        assert_eq!(ca.location().zip_code.as_deref(), Some("90210"));
    }

    #[tokio::test]
    async fn input_errors() {
        let engine = engine();

        let err = engine
            .generate_quote_at(&QuoteRequest::new("warp_drive", 1), at())
            .await
            .unwrap_err();
        assert_eq!(err, RatingError::UnknownProduct("warp_drive".to_string()));
        assert!(err.is_input_error());

        let err = engine
            .generate_quote_at(&QuoteRequest::new("deductible_reimbursement", 5), at())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RatingError::InvalidTerm {
                product: "deductible_reimbursement".to_string(),
                term_years: 5,
                available: vec![1, 2, 3],
            }
        );

        let err = engine
            .generate_quote_at(
                &QuoteRequest::new("home_protection", 1).with_coverage_limit(750),
                at(),
            )
            .await
            .unwrap_err();
        assert_eq!(err, RatingError::InvalidCoverageLimit(750));
    }

    #[tokio::test]
    async fn stored_settings_and_prices_are_used() {
        let prices = InMemoryPricingStore::new();
        prices
            .insert(
                "HOME_PROTECTION_PLAN",
                1,
                CustomerType::Retail,
                PriceEntry::new(Decimal::new(200, 0), Decimal::ONE),
            )
            .await;
        let settings = InMemorySettingsStore::new();
        settings
            .set(&SettingKey::ProductAdminFee("hero".to_string()), json!("30"))
            .await;
        settings.set(&SettingKey::DefaultTaxRate, json!(0.05)).await;

        let engine = RatingEngine::new(
            PricingResolver::new(Arc::new(PricingCatalog::standard()))
                .with_authoritative(Arc::new(prices)),
            SettingsResolver::new().with_source(Arc::new(settings)),
            RatingConfig::default(),
        );
        let quote = engine
            .generate_quote_at(&QuoteRequest::new("home_protection", 1), at())
            .await
            .unwrap();

        assert_eq!(quote.pricing().subtotal_with_fee, Decimal::new(230, 0));
        assert_eq!(quote.pricing().tax_amount, Decimal::new(1150, 2));
        assert_eq!(quote.pricing().total_price, Decimal::new(24150, 2));
        let fees = quote.fees_and_discounts();
        assert_eq!(fees.price_source, DataSource::Database);
        assert_eq!(fees.admin_fee_source, DataSource::Database);
        assert_eq!(fees.discount_source, DataSource::Hardcoded);
        assert_eq!(quote.location().tax_source, DataSource::Database);
    }

    #[test]
    fn catalog_listing() {
        let engine = engine();
        let products = engine.available_products();
        assert_eq!(products.len(), 8);
        assert_eq!(products.first().unwrap().key, "home_protection");
        assert_eq!(
            engine.product_terms("HERO_LEVEL_HOME_PROTECTION").unwrap(),
            vec![1, 2, 3]
        );
        assert!(engine.product_terms("nope").is_err());
    }

    #[test]
    fn request_defaults_from_json() {
        let request: QuoteRequest =
            serde_json::from_str(r#"{"product_type":"home_protection","term_years":1}"#).unwrap();
        assert_eq!(request, QuoteRequest::new("home_protection", 1));
    }

    fn valid_request() -> impl Strategy<Value = QuoteRequest> {
        let pairs: Vec<(String, u32)> = PricingCatalog::standard()
            .products()
            .flat_map(|p| {
                let key = p.key().to_string();
                p.terms().into_iter().map(move |t| (key.clone(), t))
            })
            .collect();
        (
            prop::sample::select(pairs),
            prop::sample::select(vec![500u32, 1000]),
            any::<bool>(),
            prop::sample::select(vec!["FL", "CA", "NY", "TX", "IL", "WA"]),
        )
            .prop_map(|((key, term), coverage, wholesale, code)| {
                let tier = if wholesale {
                    CustomerType::Wholesale
                } else {
                    CustomerType::Retail
                };
                QuoteRequest::new(key, term)
                    .with_coverage_limit(coverage)
                    .with_customer_type(tier)
                    .with_jurisdiction(Jurisdiction::new(code).unwrap())
            })
    }

    proptest! {
        #[test]
        fn quotes_are_deterministic_and_consistent(request in valid_request()) {
            let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
            let engine = engine();
            let a = rt.block_on(engine.generate_quote_at(&request, at())).unwrap();
            let b = rt.block_on(engine.generate_quote_at(&request, at())).unwrap();
            prop_assert_eq!(a.pricing(), b.pricing());

            let p = a.pricing();
            let drift = (p.subtotal_with_fee + p.tax_amount - p.total_price).abs();
            prop_assert!(drift <= Decimal::new(2, 2));

            let months = Decimal::from(request.term_years * 12);
            let spread = (p.monthly_payment * months - p.total_price).abs();
            prop_assert!(spread <= Decimal::new(5, 3) * months);
        }
    }
}
