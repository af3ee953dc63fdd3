//! Convenience re-exports for common ProcHaus usage
//!
//! ```rust
//! use prochaus::prelude::*;
//! ```

// Core ProcHaus components
pub use crate::capabilities::FeatureSupport;
pub use crate::connection::{Connection, ResultCursor};
pub use crate::core::ProcHaus;
pub use crate::errors::{DriverError, InvokeError, ProcHausError};
pub use crate::params::{CallParams, ERROR_CODE_PARAM, ERROR_MESSAGE_PARAM};
pub use crate::results::ResultSets;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, InvokerConfig};

// Binding and caching
pub use cache_system::prelude::*;
pub use param_bag::prelude::*;

// Value model
pub use type_mapping::{DbType, DbValue, FromDbValue, Row};
