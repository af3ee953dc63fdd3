//! Convenience re-exports for common parameter-bag usage

pub use crate::bag::{BindOptions, ParameterBag};
pub use crate::command::{Command, ParameterDirection, ParameterHandle, ProcedureCommand};
pub use crate::descriptor::ParamOptions;
pub use crate::errors::BindError;
pub use crate::template::{ParamSource, ParamTemplate};
pub use crate::param_template;

// Value model used by every parameter
pub use type_mapping::{DbType, DbValue, FromDbValue};
