//! Configuration for the checkout payment layer
//!
//! Provides environment-based configuration with validation.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `CHECKOUT_STORE_BROADCAST_CAPACITY` | `store.broadcast_capacity` | `16` |
//! | `CHECKOUT_METHOD_TYPE_FALLBACK` | `registry.method_type_fallback` | `true` |
//! | `CHECKOUT_DISABLED_STRATEGIES` | `registry.disabled_strategies` | empty |
//!
//! # Example
//!
//! ```no_run
//! use checkout_payments::config::PaymentsConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PaymentsConfig::from_env()?;
//! println!("Broadcast capacity: {}", config.store.broadcast_capacity);
//! # Ok(())
//! # }
//! ```

use crate::registry::NO_PAYMENT_DATA_REQUIRED;
use checkout_payments_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable for [`StoreSettings::broadcast_capacity`]
pub const BROADCAST_CAPACITY_VAR: &str = "CHECKOUT_STORE_BROADCAST_CAPACITY";
/// Environment variable for [`RegistryConfig::method_type_fallback`]
pub const METHOD_TYPE_FALLBACK_VAR: &str = "CHECKOUT_METHOD_TYPE_FALLBACK";
/// Environment variable for [`RegistryConfig::disabled_strategies`]
pub const DISABLED_STRATEGIES_VAR: &str = "CHECKOUT_DISABLED_STRATEGIES";

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable could not be parsed
    #[error("Failed to parse {var}: '{value}' is not a valid {expected}")]
    ParseError {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Expected kind of value
        expected: &'static str,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Capacity of the folded-action broadcast channel
    pub broadcast_capacity: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Strategy registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Resolve payment methods by their type when no gateway or id key matches
    pub method_type_fallback: bool,
    /// Built-in strategy keys left out of the registry
    #[serde(default)]
    pub disabled_strategies: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            method_type_fallback: true,
            disabled_strategies: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Whether `key` is left out of the registry
    #[must_use]
    pub fn is_disabled(&self, key: &str) -> bool {
        self.disabled_strategies.iter().any(|disabled| disabled == key)
    }

    /// Validate registry configuration
    ///
    /// # Errors
    ///
    /// Returns error if the no-payment-data strategy is disabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_disabled(NO_PAYMENT_DATA_REQUIRED) {
            return Err(ConfigError::ValidationError(format!(
                "'{NO_PAYMENT_DATA_REQUIRED}' cannot be disabled"
            )));
        }
        Ok(())
    }
}

/// Complete payment layer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// Store settings
    pub store: StoreSettings,
    /// Registry settings
    pub registry: RegistryConfig,
}

impl PaymentsConfig {
    /// Load configuration from process environment variables
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or validation fails
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value
    ///
    /// # Errors
    ///
    /// Returns error if a variable cannot be parsed or validation fails
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(BROADCAST_CAPACITY_VAR) {
            config.store.broadcast_capacity =
                value.trim().parse().map_err(|_| ConfigError::ParseError {
                    var: BROADCAST_CAPACITY_VAR,
                    value: value.clone(),
                    expected: "positive integer",
                })?;
        }

        if let Some(value) = lookup(METHOD_TYPE_FALLBACK_VAR) {
            config.registry.method_type_fallback = parse_bool(&value).ok_or_else(|| {
                ConfigError::ParseError {
                    var: METHOD_TYPE_FALLBACK_VAR,
                    value: value.clone(),
                    expected: "boolean",
                }
            })?;
        }

        if let Some(value) = lookup(DISABLED_STRATEGIES_VAR) {
            config.registry.disabled_strategies = value
                .split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_lowercase)
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration
    ///
    /// # Errors
    ///
    /// Returns error if any section is invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.broadcast_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "store.broadcast_capacity must be > 0".to_string(),
            ));
        }
        self.registry.validate()
    }

    /// Runtime store configuration
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.store.broadcast_capacity)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
