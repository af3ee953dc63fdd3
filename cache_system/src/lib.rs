//! Binding-strategy cache
//!
//! This crate provides the process-lifetime cache that maps a query identity
//! and template shape to a reusable parameter emission plan.

pub mod errors;
pub mod key;
pub mod manager;
pub mod prelude;
pub mod strategy;

// Re-export centralized config
pub use config::CacheConfig;

pub use errors::CacheError;
pub use key::{CacheKey, QueryIdentity, TemplateShape};
pub use manager::StrategyCache;
pub use strategy::{BindingStrategy, FieldPlan, TemplateField};
