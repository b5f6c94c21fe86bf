//! # Vehicle Data Port
//!
//! The optional external lookup consulted by the VIN decoder before it
//! falls back to the structural decode.

use crate::domain::entities::vehicle::VehicleAttributes;
use crate::domain::value_objects::vin::Vin;
use crate::infrastructure::vehicle_data::error::ProviderResult;
use async_trait::async_trait;
use std::fmt;

/// Source of descriptive vehicle attributes for a VIN.
///
/// Implementations must return `ProviderError::MissingMake` rather than a
/// make-less attribute set; the decoder treats every error as "use the
/// structural decode".
#[async_trait]
pub trait VehicleDataProvider: Send + Sync + fmt::Debug {
    /// Looks up attributes for `vin`, optionally hinting the model year.
    async fn lookup(&self, vin: &Vin, model_year: Option<i32>) -> ProviderResult<VehicleAttributes>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}
