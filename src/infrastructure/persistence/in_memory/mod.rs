//! # In-Memory Stores
//!
//! In-memory implementations for testing without database dependencies.
//!
//! ## Available Stores
//!
//! - [`InMemoryPricingStore`]: Product price rows
//! - [`InMemorySettingsStore`]: Ancillary settings
//!
//! ## Thread Safety
//!
//! All implementations use `Arc<RwLock<HashMap>>` for thread-safe access.

pub mod pricing_store;
pub mod settings_store;

pub use pricing_store::InMemoryPricingStore;
pub use settings_store::InMemorySettingsStore;
