//! # ProcHaus
//!
//! A stored-procedure invocation layer: dynamic parameter binding with a
//! shared binding-strategy cache, typed single and multi-result reads, and an
//! error-code output convention turned into typed errors.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prochaus::prelude::*;
//! use serde::Deserialize;
//! use std::sync::Arc;
//!
//! #[derive(Deserialize)]
//! struct Order {
//!     id: i64,
//!     status: String,
//! }
//!
//! fn open_orders(conn: &mut dyn Connection, customer: i64) -> Result<Vec<Order>, InvokeError> {
//!     let invoker = ProcHaus::new(Arc::new(StrategyCache::new()));
//!
//!     let mut params = CallParams::new()
//!         .with_input("@CustomerId", customer)
//!         .with_output("TotalCount", 0i32);
//!
//!     let orders = invoker.query::<Order, _>(conn, "usp_OpenOrders", &mut params)?;
//!     println!("total: {:?}", params.output_value("TotalCount"));
//!     Ok(orders)
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod capabilities;
pub mod connection;
pub mod core;
pub mod errors;
pub mod params;
pub mod prelude;
pub mod results;

// Re-export the main public types for convenience
pub use capabilities::FeatureSupport;
pub use connection::{Connection, ResultCursor};
pub use crate::core::ProcHaus;
pub use errors::{DriverError, InvokeError, ProcHausError};
pub use params::{CallParams, ParamMap, ERROR_CODE_PARAM, ERROR_MESSAGE_PARAM};
pub use results::ResultSets;

// Re-export centralized config
pub use config::{AppConfig, CacheConfig, InvokerConfig};

// Re-export internal crates used in the public API
pub use cache_system;
pub use param_bag;
pub use param_bag::param_template;
pub use type_mapping;
