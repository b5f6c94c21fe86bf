//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`PricingResolver`]: Authoritative price lookup with catalog fallback
//! - [`SettingsResolver`]: Fees, rates and contact data with defaults
//! - [`RatingEngine`]: Multi-factor quote composition
//! - [`VinDecoder`]: VIN validation and decoding
//! - [`VscRatingEngine`]: Vehicle service contract pricing
//! - [`QuoteOrchestrator`]: Vehicle quote flow over the services above

pub mod pricing_resolver;
pub mod quote_orchestrator;
pub mod rating_engine;
pub mod settings_resolver;
pub mod vin_decoder;
pub mod vsc_rating_engine;

pub use pricing_resolver::{
    DEFAULT_LOOKUP_TIMEOUT, PricingResolver, ResolutionError, ResolutionResult, ResolvedPrice,
};
pub use quote_orchestrator::{
    QuoteOrchestrator, VehicleQuote, VehicleQuoteRequest, VscVehicleQuote,
};
pub use rating_engine::{
    ProductSummary, QuoteRequest, RatingConfig, RatingEngine, RatingError, RatingResult,
};
pub use settings_resolver::{ContactInfo, Resolved, SettingsResolver, SettingsSnapshot};
pub use vin_decoder::{DEFAULT_PROVIDER_TIMEOUT, ValidationResult, VinDecoder};
pub use vsc_rating_engine::{
    VscQuoteRequest, VscRatingConfig, VscRatingEngine, VscRatingError, VscRatingResult,
};
