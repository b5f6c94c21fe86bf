//! # Domain Entities
//!
//! ## Entities
//!
//! - [`ProductPricingConfig`]: Base price and term multipliers for a product
//! - [`Quote`]: Immutable priced quote
//! - [`DecodedVehicle`]: Result of decoding a VIN
//! - [`VscQuote`]: Immutable priced vehicle service contract

pub mod product;
pub mod quote;
pub mod vehicle;
pub mod vsc_quote;

pub use product::ProductPricingConfig;
pub use quote::{
    FeesAndDiscounts, MultipliersApplied, PaymentOptions, PricingBreakdown, ProductInfo, Quote,
    QuoteLocation, QUOTE_VALIDITY_DAYS,
};
pub use vehicle::{DecodedVehicle, VehicleAttributes};
pub use vsc_quote::{VscCoverage, VscPricingBreakdown, VscQuote, VscRatingFactors, VscVehicle};
