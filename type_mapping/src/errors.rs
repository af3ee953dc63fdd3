//! Error types for type mapping and value conversion

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypeMappingError {
    #[error("No database type is mapped for host type {0}; declare the type explicitly")]
    UnmappedType(String),

    #[error("Attempting to cast a database null to the non-nullable type {0}")]
    NullIntoNonNullable(String),

    #[error("Cannot convert a {from} value into {to}")]
    Conversion { from: &'static str, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
