//! # Configuration
//!
//! Layered application configuration: built-in defaults, an optional
//! `protection-quote.toml` file, then `PROTECTION_QUOTE__*` environment
//! variables (a `.env` file is loaded first when present).
//!
//! Nested keys use a double underscore, e.g.
//! `PROTECTION_QUOTE__DATABASE__URL` or
//! `PROTECTION_QUOTE__VIN__CHECK_DIGIT_POLICY=lenient`.
//!
//! # Examples
//!
//! ```
//! use protection_quote::config::AppConfig;
//!
//! let config = AppConfig::from_toml("[vehicle_data]\nenabled = true").unwrap();
//! assert!(config.vehicle_data.enabled);
//! assert!(config.database.url.is_none());
//! ```

use crate::application::error::InfrastructureError;
use crate::application::services::rating_engine::RatingConfig;
use crate::application::services::vsc_rating_engine::VscRatingConfig;
use crate::domain::services::eligibility::EligibilityRules;
use crate::domain::value_objects::enums::CheckDigitPolicy;
use crate::infrastructure::vehicle_data::nhtsa::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base name of the optional configuration file.
pub const CONFIG_FILE: &str = "protection-quote";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "PROTECTION_QUOTE";

/// Pricing and settings database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL. Without one, quotes are priced from the catalog and
    /// setting defaults.
    pub url: Option<String>,
    /// Pool size.
    pub max_connections: u32,
    /// Time to wait for a pooled connection.
    pub acquire_timeout_ms: u64,
    /// Bound on a single pricing or settings lookup.
    pub lookup_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
            acquire_timeout_ms: 3_000,
            lookup_timeout_ms: 5_000,
        }
    }
}

impl DatabaseConfig {
    /// Connection acquire timeout.
    #[must_use]
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    /// Lookup timeout.
    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }
}

/// External vehicle data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleDataConfig {
    /// Whether to consult the provider at all.
    pub enabled: bool,
    /// Provider API root.
    pub base_url: String,
    /// Bound on a single provider call.
    pub timeout_ms: u64,
}

impl Default for VehicleDataConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl VehicleDataConfig {
    /// Provider timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// VIN handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VinConfig {
    /// What to do when the check digit does not match.
    pub check_digit_policy: CheckDigitPolicy,
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Vehicle data provider settings.
    pub vehicle_data: VehicleDataConfig,
    /// VIN settings.
    pub vin: VinConfig,
    /// Rating engine settings.
    pub quote: RatingConfig,
    /// Service contract rating settings.
    pub vsc: VscRatingConfig,
    /// Eligibility thresholds.
    pub eligibility: EligibilityRules,
    /// Logging settings.
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads `.env`, the optional default file and the environment.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Configuration` if a source cannot be
    /// read or a value has the wrong type.
    pub fn load() -> Result<Self, InfrastructureError> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], reading `path` instead of the default file.
    /// An explicit path must exist.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load`].
    pub fn load_from(path: Option<&str>) -> Result<Self, InfrastructureError> {
        let _ = dotenvy::dotenv();

        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name(CONFIG_FILE).required(false),
        };

        Ok(Config::builder()
            .add_source(file)
            .add_source(environment())
            .build()?
            .try_deserialize()?)
    }

    /// Parses a TOML document on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `InfrastructureError::Configuration` on malformed input.
    pub fn from_toml(document: &str) -> Result<Self, InfrastructureError> {
        Ok(Config::builder()
            .add_source(File::from_str(document, FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
