//! # Quote Orchestrator
//!
//! Produces a complete vehicle quote: decodes the VIN when one is supplied,
//! assesses eligibility when a mileage is supplied, then rates the product.
//!
//! Malformed VINs and bad quote parameters are returned as errors. An
//! ineligible vehicle is not an error; the assessment travels with the
//! quote so the caller can decide what to show.
//!
//! Vehicle service contracts go through [`QuoteOrchestrator::vsc_quote`],
//! which fills missing make, model and year from the VIN. There an
//! ineligible vehicle is an error, since the contract cannot be sold.

use crate::application::error::{ApplicationError, ApplicationResult, InfrastructureError};
use crate::application::services::pricing_resolver::PricingResolver;
use crate::application::services::rating_engine::{QuoteRequest, RatingConfig, RatingEngine};
use crate::application::services::settings_resolver::SettingsResolver;
use crate::application::services::vin_decoder::VinDecoder;
use crate::application::services::vsc_rating_engine::{
    VscQuoteRequest, VscRatingConfig, VscRatingEngine, VscRatingError,
};
use crate::config::AppConfig;
use crate::domain::catalog::PricingCatalog;
use crate::domain::entities::quote::Quote;
use crate::domain::entities::vehicle::{DecodedVehicle, UNKNOWN};
use crate::domain::entities::vsc_quote::VscQuote;
use crate::domain::services::eligibility::{EligibilityAssessment, EligibilityPolicy};
use crate::domain::services::manufacturer::UNKNOWN_MANUFACTURER;
use crate::domain::value_objects::model_year::{EARLIEST_MODEL_YEAR, is_plausible_model_year};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::infrastructure::persistence::postgres::{
    PostgresPricingStore, PostgresSettingsStore, lazy_pool,
};
use crate::infrastructure::vehicle_data::NhtsaProvider;
use crate::infrastructure::vehicle_data::nhtsa::MODEL_NOT_SPECIFIED;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Input to [`QuoteOrchestrator::quote`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleQuoteRequest {
    /// Product and pricing parameters.
    #[serde(flatten)]
    pub quote: QuoteRequest,
    /// VIN of the covered vehicle.
    #[serde(default)]
    pub vin: Option<String>,
    /// Model year hint passed to the vehicle data provider.
    #[serde(default)]
    pub model_year: Option<i32>,
    /// Odometer reading.
    #[serde(default)]
    pub mileage: Option<u32>,
}

impl VehicleQuoteRequest {
    /// Wraps a plain quote request.
    #[must_use]
    pub fn new(quote: QuoteRequest) -> Self {
        Self {
            quote,
            vin: None,
            model_year: None,
            mileage: None,
        }
    }

    /// Sets the VIN.
    #[must_use]
    pub fn with_vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = Some(vin.into());
        self
    }

    /// Sets the model year hint.
    #[must_use]
    pub fn with_model_year(mut self, model_year: i32) -> Self {
        self.model_year = Some(model_year);
        self
    }

    /// Sets the mileage.
    #[must_use]
    pub fn with_mileage(mut self, mileage: u32) -> Self {
        self.mileage = Some(mileage);
        self
    }
}

/// A quote with the vehicle it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VehicleQuote {
    /// The priced quote.
    pub quote: Quote,
    /// Decoded vehicle, when a VIN was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<DecodedVehicle>,
    /// Eligibility, when a mileage was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityAssessment>,
}

impl VehicleQuote {
    /// Returns false only when an assessment found the vehicle ineligible.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.eligibility.as_ref().is_none_or(|e| e.eligible)
    }
}

/// A service contract quote with the vehicle details behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VscVehicleQuote {
    /// The priced contract.
    pub quote: VscQuote,
    /// Decoded vehicle, when a VIN was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<DecodedVehicle>,
    /// Eligibility of the rated vehicle, including its pricing factors.
    pub eligibility: EligibilityAssessment,
}

/// Runs the vehicle quote flow.
#[derive(Debug, Clone)]
pub struct QuoteOrchestrator {
    engine: RatingEngine,
    vsc: VscRatingEngine,
    decoder: VinDecoder,
    eligibility: EligibilityPolicy,
}

impl QuoteOrchestrator {
    /// Creates an orchestrator from its parts.
    #[must_use]
    pub fn new(
        engine: RatingEngine,
        vsc: VscRatingEngine,
        decoder: VinDecoder,
        eligibility: EligibilityPolicy,
    ) -> Self {
        Self {
            engine,
            vsc,
            decoder,
            eligibility,
        }
    }

    /// An orchestrator with no database or provider, pricing from the
    /// embedded catalog and setting defaults.
    #[must_use]
    pub fn offline() -> Self {
        let settings = SettingsResolver::new();
        let engine = RatingEngine::new(
            PricingResolver::new(Arc::new(PricingCatalog::standard())),
            settings.clone(),
            RatingConfig::default(),
        );
        Self::new(
            engine,
            VscRatingEngine::new(settings, VscRatingConfig::default()),
            VinDecoder::new(),
            EligibilityPolicy::default(),
        )
    }

    /// Wires the orchestrator from configuration.
    ///
    /// A database URL enables the PostgreSQL pricing and settings stores.
    /// The pool connects lazily, so this must run inside a tokio runtime
    /// but does not touch the network.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Store` for an unusable database URL and
    /// `InfrastructureError::Provider` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> ApplicationResult<Self> {
        let database = &config.database;
        let mut pricing = PricingResolver::new(Arc::new(PricingCatalog::standard()))
            .with_timeout(database.lookup_timeout());
        let mut settings = SettingsResolver::new().with_timeout(database.lookup_timeout());

        if let Some(url) = database.url.as_deref() {
            let pool = lazy_pool(url, database.max_connections, database.acquire_timeout())
                .map_err(InfrastructureError::from)?;
            pricing = pricing.with_authoritative(Arc::new(PostgresPricingStore::new(pool.clone())));
            settings = settings.with_source(Arc::new(PostgresSettingsStore::new(pool)));
        }

        let vehicle_data = &config.vehicle_data;
        let mut decoder = VinDecoder::new()
            .with_policy(config.vin.check_digit_policy)
            .with_timeout(vehicle_data.timeout());
        if vehicle_data.enabled {
            let provider = NhtsaProvider::new(vehicle_data.base_url.as_str(), vehicle_data.timeout_ms)
                .map_err(InfrastructureError::from)?;
            decoder = decoder.with_provider(Arc::new(provider));
        }

        info!(
            database = database.url.is_some(),
            vehicle_data = vehicle_data.enabled,
            check_digit_policy = %config.vin.check_digit_policy,
            "quote orchestrator configured"
        );

        Ok(Self::new(
            RatingEngine::new(pricing, settings.clone(), config.quote.clone()),
            VscRatingEngine::new(settings, config.vsc.clone()),
            decoder,
            EligibilityPolicy::new(config.eligibility),
        ))
    }

    /// Returns the rating engine.
    #[must_use]
    pub fn engine(&self) -> &RatingEngine {
        &self.engine
    }

    /// Returns the service contract rating engine.
    #[must_use]
    pub fn vsc(&self) -> &VscRatingEngine {
        &self.vsc
    }

    /// Returns the VIN decoder.
    #[must_use]
    pub fn decoder(&self) -> &VinDecoder {
        &self.decoder
    }

    /// Returns the eligibility policy.
    #[must_use]
    pub fn eligibility(&self) -> &EligibilityPolicy {
        &self.eligibility
    }

    /// Quotes a vehicle now.
    ///
    /// # Errors
    ///
    /// See [`QuoteOrchestrator::quote_at`].
    pub async fn quote(&self, request: &VehicleQuoteRequest) -> ApplicationResult<VehicleQuote> {
        self.quote_at(request, Timestamp::now()).await
    }

    /// Quotes a vehicle as of `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` for a model year hint outside
    /// `1980..=current_year + 1`, `ApplicationError::Domain` for a malformed
    /// VIN and `ApplicationError::Rating` if the quote cannot be priced.
    #[instrument(skip(self, request), fields(product = %request.quote.product_type))]
    pub async fn quote_at(
        &self,
        request: &VehicleQuoteRequest,
        created_at: Timestamp,
    ) -> ApplicationResult<VehicleQuote> {
        let current_year = created_at.year();
        check_model_year_hint(request.model_year, current_year)?;

        let vehicle = self
            .decode_optional(request.vin.as_deref(), request.model_year, current_year)
            .await?;

        let eligibility = request.mileage.map(|mileage| {
            let year = vehicle
                .as_ref()
                .and_then(|v| v.year)
                .or(request.model_year);
            let make = vehicle.as_ref().map(|v| v.make.as_str());
            self.eligibility
                .assess(make, year, Some(mileage), current_year)
        });

        if let Some(assessment) = eligibility.as_ref().filter(|a| !a.eligible) {
            warn!(
                restrictions = ?assessment.restrictions,
                "vehicle is not eligible for a service contract"
            );
        }

        let quote = self
            .engine
            .generate_quote_at(&request.quote, created_at)
            .await?;

        Ok(VehicleQuote {
            quote,
            vehicle,
            eligibility,
        })
    }

    /// Quotes a vehicle service contract now.
    ///
    /// # Errors
    ///
    /// See [`QuoteOrchestrator::vsc_quote_at`].
    pub async fn vsc_quote(&self, request: &VscQuoteRequest) -> ApplicationResult<VscVehicleQuote> {
        self.vsc_quote_at(request, Timestamp::now()).await
    }

    /// Quotes a vehicle service contract as of `created_at`.
    ///
    /// Make, model and year given on the request win over decoded values.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` for a malformed VIN and
    /// `ApplicationError::Vsc` for an unratable or ineligible vehicle.
    #[instrument(skip(self, request), fields(coverage = %request.coverage_level))]
    pub async fn vsc_quote_at(
        &self,
        request: &VscQuoteRequest,
        created_at: Timestamp,
    ) -> ApplicationResult<VscVehicleQuote> {
        let current_year = created_at.year();
        let year_hint = request
            .year
            .filter(|year| is_plausible_model_year(*year, current_year));
        let vehicle = self
            .decode_optional(request.vin.as_deref(), year_hint, current_year)
            .await?;

        let mut rated = request.clone();
        if let Some(decoded) = vehicle.as_ref() {
            if rated.make.is_none() && decoded.make != UNKNOWN_MANUFACTURER {
                rated.make = Some(decoded.make.clone());
            }
            if rated.model.is_none()
                && decoded.model != UNKNOWN
                && decoded.model != MODEL_NOT_SPECIFIED
            {
                rated.model = Some(decoded.model.clone());
            }
            rated.year = rated.year.or(decoded.year);
        }

        let eligibility = self.eligibility.assess(
            rated.make.as_deref(),
            rated.year,
            Some(rated.mileage),
            current_year,
        );
        if !eligibility.eligible {
            warn!(
                restrictions = ?eligibility.restrictions,
                "vehicle is not eligible for a service contract"
            );
            return Err(VscRatingError::Ineligible {
                restrictions: eligibility.restrictions,
            }
            .into());
        }

        let quote = self.vsc.generate_quote_at(&rated, created_at).await?;

        Ok(VscVehicleQuote {
            quote,
            vehicle,
            eligibility,
        })
    }

    async fn decode_optional(
        &self,
        vin: Option<&str>,
        model_year: Option<i32>,
        current_year: i32,
    ) -> ApplicationResult<Option<DecodedVehicle>> {
        match vin {
            Some(raw) => Ok(Some(
                self.decoder.decode_at(raw, model_year, current_year).await?,
            )),
            None => Ok(None),
        }
    }
}

fn check_model_year_hint(model_year: Option<i32>, current_year: i32) -> ApplicationResult<()> {
    match model_year {
        Some(year) if !is_plausible_model_year(year, current_year) => {
            Err(ApplicationError::validation(format!(
                "model year {year} is outside {EARLIEST_MODEL_YEAR}..={}",
                current_year.saturating_add(1)
            )))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::rating_engine::RatingError;
    use crate::domain::vsc_rates::{CoverageLevel, VehicleClass};
    use crate::domain::errors::DomainError;
    use crate::domain::value_objects::enums::{CheckDigitPolicy, DecodeMethod};
    use rust_decimal::Decimal;

    fn created_at() -> Timestamp {
        Timestamp::from_ymd(2025, 6, 1).unwrap()
    }

    fn home(term: u32) -> VehicleQuoteRequest {
        VehicleQuoteRequest::new(QuoteRequest::new("home_protection", term))
    }

    #[tokio::test]
    async fn quote_without_vehicle() {
        let result = QuoteOrchestrator::offline()
            .quote_at(&home(2), created_at())
            .await
            .unwrap();

        assert_eq!(result.quote.total_price(), Decimal::new(41002, 2));
        assert!(result.vehicle.is_none());
        assert!(result.eligibility.is_none());
        assert!(result.is_eligible());
    }

    #[tokio::test]
    async fn quote_with_vin_and_mileage() {
        let request = home(2)
            .with_vin("wba3a5c53cf256985")
            .with_mileage(160_000);
        let result = QuoteOrchestrator::offline()
            .quote_at(&request, created_at())
            .await
            .unwrap();

        let vehicle = result.vehicle.as_ref().unwrap();
        assert_eq!(vehicle.make, "BMW");
        assert_eq!(vehicle.year, Some(2012));
        assert_eq!(vehicle.decode_method, DecodeMethod::BasicStructure);

        let eligibility = result.eligibility.as_ref().unwrap();
        assert!(eligibility.eligible);
        assert_eq!(eligibility.vehicle_age, Some(13));
        assert_eq!(eligibility.warnings.len(), 1);
        assert!(result.is_eligible());
    }

    #[tokio::test]
    async fn ineligible_vehicle_is_reported_not_rejected() {
        let request = home(1)
            .with_vin("1HGCM82633A004352")
            .with_mileage(210_000);
        let result = QuoteOrchestrator::offline()
            .quote_at(&request, created_at())
            .await
            .unwrap();

        assert!(!result.is_eligible());
        let eligibility = result.eligibility.unwrap();
        assert_eq!(eligibility.restrictions.len(), 2);
        assert!(result.quote.total_price() > Decimal::ZERO);
    }

    #[tokio::test]
    async fn model_year_hint_used_without_vin() {
        let request = home(1).with_model_year(2020).with_mileage(40_000);
        let result = QuoteOrchestrator::offline()
            .quote_at(&request, created_at())
            .await
            .unwrap();

        let eligibility = result.eligibility.unwrap();
        assert_eq!(eligibility.vehicle_age, Some(5));
        assert!(eligibility.eligible);
    }

    #[tokio::test]
    async fn extreme_model_year_hint_is_a_validation_error() {
        let request = home(1).with_model_year(i32::MIN).with_mileage(10_000);
        let err = QuoteOrchestrator::offline()
            .quote_at(&request, created_at())
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.is_input_error());
    }

    #[tokio::test]
    async fn model_year_hint_window() {
        let orchestrator = QuoteOrchestrator::offline();
        let cases = [
            (1979, false),
            (1980, true),
            (2026, true),
            (2027, false),
            (i32::MAX, false),
        ];
        for (year, ok) in cases {
            let result = orchestrator
                .quote_at(&home(1).with_model_year(year), created_at())
                .await;
            assert_eq!(result.is_ok(), ok, "model year {year}");
        }
    }

    #[tokio::test]
    async fn vsc_quote_fills_vehicle_from_vin() {
        let request = VscQuoteRequest::for_vin("WBA3A5C53CF256985", 90_000)
            .with_coverage_level(CoverageLevel::Silver);
        let result = QuoteOrchestrator::offline()
            .vsc_quote_at(&request, created_at())
            .await
            .unwrap();

        let vehicle = result.quote.vehicle();
        assert_eq!(vehicle.make, "BMW");
        assert_eq!(vehicle.year, 2012);
        assert_eq!(vehicle.age_years, 13);
        assert_eq!(vehicle.vehicle_class, VehicleClass::C);
        assert!(vehicle.model.is_none());

        // 1400 x 1.60 (age 13) x 1.30 (90k miles) = 2912.00
        assert_eq!(result.quote.pricing().adjusted_price, Decimal::new(2912, 0));
        let factors = result.eligibility.pricing_factors.as_ref().unwrap();
        assert_eq!(factors.vehicle_class, VehicleClass::C);
        assert_eq!(factors.mileage_factor, Some(Decimal::new(130, 2)));
        assert!(result.vehicle.is_some());
    }

    #[tokio::test]
    async fn vsc_request_values_win_over_decoded() {
        let mut request = VscQuoteRequest::for_vin("WBA3A5C53CF256985", 20_000);
        request.make = Some("Toyota".to_string());
        request.year = Some(2023);
        let result = QuoteOrchestrator::offline()
            .vsc_quote_at(&request, created_at())
            .await
            .unwrap();

        assert_eq!(result.quote.vehicle().make, "Toyota");
        assert_eq!(result.quote.vehicle().year, 2023);
        assert_eq!(result.quote.vehicle().vehicle_class, VehicleClass::A);
    }

    #[tokio::test]
    async fn ineligible_vsc_vehicle_is_rejected() {
        let request = VscQuoteRequest::new("Honda", 2003, 210_000);
        let err = QuoteOrchestrator::offline()
            .vsc_quote_at(&request, created_at())
            .await
            .unwrap_err();

        assert!(err.is_input_error());
        assert!(matches!(
            &err,
            ApplicationError::Vsc(VscRatingError::Ineligible { restrictions })
                if restrictions.len() == 2
        ));
    }

    #[tokio::test]
    async fn vsc_without_make_or_vin_is_rejected() {
        let mut request = VscQuoteRequest::new("Honda", 2022, 10_000);
        request.make = None;
        let err = QuoteOrchestrator::offline()
            .vsc_quote_at(&request, created_at())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Vsc(VscRatingError::MissingVehicleDetail("make"))
        ));
    }

    #[tokio::test]
    async fn malformed_vin_is_an_input_error() {
        let request = home(1).with_vin("1HGCM826");
        let err = QuoteOrchestrator::offline()
            .quote_at(&request, created_at())
            .await
            .unwrap_err();

        assert!(err.is_input_error());
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidVinLength { actual: 8 })
        ));
    }

    #[tokio::test]
    async fn unknown_product_is_a_rating_error() {
        let request = VehicleQuoteRequest::new(QuoteRequest::new("yacht_protection", 1));
        let err = QuoteOrchestrator::offline()
            .quote_at(&request, created_at())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Rating(RatingError::UnknownProduct(_))
        ));
    }

    #[tokio::test]
    async fn from_default_config_is_offline() {
        let orchestrator = QuoteOrchestrator::from_config(&AppConfig::default()).unwrap();
        assert!(!orchestrator.decoder().has_provider());
        assert_eq!(orchestrator.decoder().policy(), CheckDigitPolicy::Strict);
        assert_eq!(orchestrator.engine().config().quote_id_prefix, "HERO");
        assert_eq!(orchestrator.vsc().config().quote_id_prefix, "VSC");
    }

    #[tokio::test]
    async fn from_config_wires_provider_and_policy() {
        let config = AppConfig::from_toml(
            r#"
            [vehicle_data]
            enabled = true
            base_url = "http://127.0.0.1:9"

            [vin]
            check_digit_policy = "lenient"

            [eligibility]
            max_mileage = 100000
            "#,
        )
        .unwrap();

        let orchestrator = QuoteOrchestrator::from_config(&config).unwrap();
        assert!(orchestrator.decoder().has_provider());
        assert_eq!(orchestrator.decoder().policy(), CheckDigitPolicy::Lenient);
        assert_eq!(orchestrator.eligibility().rules().max_mileage, 100_000);
    }

    #[tokio::test]
    async fn from_config_accepts_lazy_database() {
        let config =
            AppConfig::from_toml("[database]\nurl = \"postgres://user@127.0.0.1:1/quotes\"").unwrap();
        assert!(QuoteOrchestrator::from_config(&config).is_ok());
    }

    #[test]
    fn request_flattens_quote_fields() {
        let request: VehicleQuoteRequest = serde_json::from_str(
            r#"{"product_type": "HOME_PROTECTION_PLAN", "term_years": 3, "vin": "1HGCM82633A004352", "mileage": 1000}"#,
        )
        .unwrap();
        assert_eq!(request.quote.product_type, "HOME_PROTECTION_PLAN");
        assert_eq!(request.quote.coverage_limit, 500);
        assert_eq!(request.mileage, Some(1000));
        assert!(request.model_year.is_none());
    }
}
