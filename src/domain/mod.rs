//! # Domain Layer
//!
//! Pure business types and rules: value objects, entities, the embedded
//! pricing catalog, the vehicle service contract rate card, and stateless
//! domain services. Nothing here performs I/O.

pub mod catalog;
pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;
pub mod vsc_rates;
