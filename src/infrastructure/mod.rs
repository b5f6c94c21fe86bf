//! # Infrastructure Layer
//!
//! Adapters behind the ports the application layer depends on.
//!
//! - [`persistence`]: pricing and settings sources (PostgreSQL, in-memory, catalog)
//! - [`vehicle_data`]: external VIN enrichment

pub mod persistence;
pub mod vehicle_data;
