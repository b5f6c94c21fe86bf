//! # Vehicle Data
//!
//! External vehicle-data lookup used to enrich VIN decodes.
//!
//! - [`VehicleDataProvider`]: the port
//! - [`NhtsaProvider`]: NHTSA vPIC implementation over reqwest
//! - [`ProviderError`]: lookup failures, all of which mean "decode structurally"

pub mod error;
pub mod http_client;
pub mod nhtsa;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use http_client::HttpClient;
pub use nhtsa::NhtsaProvider;
pub use traits::VehicleDataProvider;
