//! Error types for cache operations
//!
//! This module defines the errors that can occur while populating
//! the binding-strategy cache.

use config::ConfigError;
use thiserror::Error;
use type_mapping::TypeMappingError;

/// Cache system errors
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to derive binding strategy for {shape}: {source}")]
    Population {
        shape: String,
        #[source]
        source: TypeMappingError,
    },

    #[error("Invalid cache configuration: {0}")]
    Config(#[from] ConfigError),
}
