//! # Persistence Layer
//!
//! Read-only ports for pricing rows and ancillary settings, with their
//! implementations.
//!
//! ## Ports
//!
//! - [`PricingSource`]: base price and term multiplier per product, term and tier
//! - [`SettingsSource`]: fees, tax rates, jurisdiction multipliers and contact data
//!
//! ## Implementations
//!
//! - `catalog`: the embedded [`PricingCatalog`](crate::domain::catalog::PricingCatalog) as a pricing source
//! - `in_memory`: in-memory stores for tests and offline runs
//! - `postgres`: sqlx-backed stores

pub mod catalog;
pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use traits::{
    LookupOutcome, PriceEntry, PricingSource, SettingKey, SettingsSource, StoreError, StoreResult,
};
