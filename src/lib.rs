//! # Protection Quote
//!
//! Pricing resolution, rating and VIN decoding for protection-plan quotes.
//!
//! The crate is layered the same way throughout:
//!
//! - [`domain`]: value objects, entities, the embedded pricing catalog and
//!   pure domain services (manufacturer lookup, eligibility)
//! - [`application`]: the resolvers, the rating engine, the VIN decoder and
//!   the quote orchestrator
//! - [`infrastructure`]: PostgreSQL and in-memory stores, and the NHTSA
//!   vehicle data provider
//!
//! Every external source is optional. With no database and no provider the
//! crate prices from the embedded catalog and decodes VINs from their
//! structure alone.
//!
//! # Examples
//!
//! ```
//! use protection_quote::application::services::{
//!     QuoteOrchestrator, QuoteRequest, VehicleQuoteRequest,
//! };
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let orchestrator = QuoteOrchestrator::offline();
//! let request = VehicleQuoteRequest::new(QuoteRequest::new("home_protection", 2))
//!     .with_vin("1HGCM82633A004352");
//!
//! let result = runtime.block_on(orchestrator.quote(&request)).unwrap();
//! assert_eq!(result.vehicle.unwrap().make, "Honda");
//! assert!(result.quote.total_price() > rust_decimal::Decimal::ZERO);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
