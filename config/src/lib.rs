//! # Configuration Management for ProcHaus
//!
//! This crate provides centralized configuration structures for the
//! procedure invoker and the binding-strategy cache.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{CacheConfig, InvokerConfig};
//!
//! let invoker = InvokerConfig {
//!     system_error_code: 500,
//!     ..InvokerConfig::default()
//! };
//! let cache = CacheConfig::new(256, 16);
//! ```
//!
//! ### TOML File Configuration
//! ```toml
//! [invoker]
//! system_error_code = 999
//! system_error_prefix = "DAL error"
//! decimal_buffer_size = 40
//! default_string_size = 4000
//!
//! [cache]
//! initial_capacity = 64
//! shard_amount = 16
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from prochaus.toml or the path in PROCHAUS_CONFIG
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./prochaus.toml";
const CONFIG_PATH_VAR: &str = "PROCHAUS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub invoker: InvokerConfig,
    pub cache: CacheConfig,
}

/// Procedure invoker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Error code written to the error-code output when binding, execution
    /// or readback fails
    pub system_error_code: i32,
    /// Prefix of the error message written alongside `system_error_code`
    pub system_error_prefix: String,
    /// Buffer size of decimal outputs transmitted as strings
    pub decimal_buffer_size: usize,
    /// Buffer size given to string parameters that declare no size
    pub default_string_size: usize,
}

/// Binding-strategy cache configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub initial_capacity: usize,
    /// Must be a power of two greater than one
    pub shard_amount: usize,
}

impl AppConfig {
    /// Load configuration from the TOML file named in .env or the default path
    pub fn load() -> Result<Self, ConfigError> {
        let config = {
            // A missing .env file is fine; the variable may come from the process
            match dotenvy::dotenv() {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(e) => return Err(e.into()),
            }

            if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
                Self::from_file(&config_path)
            } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
                Self::from_file(DEFAULT_CONFIG_PATH)
            } else {
                Err(ConfigError::Invalid(format!(
                    "Config path must be specified in .env file as {} or in {} file",
                    CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
                )))
            }
        }?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.invoker.validate()?;
        self.cache.validate()
    }
}

impl InvokerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.system_error_code == 0 {
            return Err(ConfigError::Invalid(
                "Invoker system_error_code cannot be zero, zero means success".to_string(),
            ));
        }
        if self.decimal_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "Invoker decimal_buffer_size must be greater than 0".to_string(),
            ));
        }
        if self.default_string_size == 0 {
            return Err(ConfigError::Invalid(
                "Invoker default_string_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            system_error_code: 999,
            system_error_prefix: "DAL error".to_string(),
            decimal_buffer_size: 40,
            default_string_size: 4000,
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(initial_capacity: usize, shard_amount: usize) -> Self {
        Self {
            initial_capacity,
            shard_amount,
        }
    }

    /// Validate sizing; `DashMap` requires a power-of-two shard amount
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shard_amount <= 1 || !self.shard_amount.is_power_of_two() {
            return Err(ConfigError::Invalid(
                "Cache shard_amount must be a power of two greater than 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            shard_amount: 16,
        }
    }
}
