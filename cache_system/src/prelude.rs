//! Convenience re-exports for common cache-system usage

pub use crate::errors::CacheError;
pub use crate::key::{CacheKey, QueryIdentity, TemplateShape};
pub use crate::manager::StrategyCache;
pub use crate::strategy::{BindingStrategy, FieldPlan, TemplateField};
pub use config::CacheConfig;
