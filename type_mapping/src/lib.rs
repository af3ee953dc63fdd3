//! Unified type mapping between Rust types and portable database types
//!
//! This crate provides the type registry, the runtime value model and the
//! row model shared by the rest of the prochaus workspace.

pub mod convert;
pub mod errors;
pub mod registry;
pub mod row;
pub mod types;

pub use convert::FromDbValue;
pub use errors::TypeMappingError;
pub use registry::{lookup_db_type, TypeRegistry};
pub use row::Row;
pub use types::{DbType, DbValue, HostType};

// Re-export value crates used in the public API
pub use chrono;
pub use rust_decimal;
pub use uuid;
