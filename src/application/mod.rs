//! # Application Layer
//!
//! Use-case services composed from the domain and the infrastructure ports.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult, InfrastructureError};
