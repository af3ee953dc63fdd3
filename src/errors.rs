//! Error types for the ProcHaus crate
//!
//! This module contains all error types that can be returned by ProcHaus operations.

use cache_system::CacheError;
use config::ConfigError;
use param_bag::BindError;
use thiserror::Error;
use type_mapping::TypeMappingError;

/// Failure reported by the connection collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a failed procedure invocation.
///
/// Both variants carry the values left in the error-code and error-message
/// outputs, and display as the combined diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The procedure ran and reported a non-zero error code
    #[error("{diagnostic}")]
    Procedure {
        procedure: String,
        code: i32,
        message: String,
        diagnostic: String,
    },

    /// Binding, execution or readback failed
    #[error("{diagnostic}")]
    System {
        procedure: String,
        code: i32,
        message: String,
        diagnostic: String,
    },
}

impl InvokeError {
    pub fn code(&self) -> i32 {
        match self {
            InvokeError::Procedure { code, .. } | InvokeError::System { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            InvokeError::Procedure { message, .. } | InvokeError::System { message, .. } => {
                message
            }
        }
    }

    pub fn procedure(&self) -> &str {
        match self {
            InvokeError::Procedure { procedure, .. } | InvokeError::System { procedure, .. } => {
                procedure
            }
        }
    }

    pub fn diagnostic(&self) -> &str {
        match self {
            InvokeError::Procedure { diagnostic, .. }
            | InvokeError::System { diagnostic, .. } => diagnostic,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, InvokeError::System { .. })
    }
}

/// Failures raised between binding and readback, before they are mapped
/// onto the error-code convention
#[derive(Error, Debug)]
pub(crate) enum SystemFault {
    #[error(transparent)]
    Bind(#[from] BindError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error(transparent)]
    Mapping(#[from] TypeMappingError),
}

#[derive(Error, Debug)]
pub enum ProcHausError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}
