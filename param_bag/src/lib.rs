//! Parameter Bag - dynamic parameter binding for stored procedures
//!
//! This crate provides the parameter descriptors, the bag that binds them to
//! a native command, and the command primitive drivers execute.

pub mod bag;
pub mod command;
pub mod descriptor;
pub mod errors;
pub mod prelude;
pub mod template;

pub use bag::{BindOptions, ParameterBag, DEFAULT_STRING_SIZE};
pub use command::{Command, NativeParameter, ParameterDirection, ParameterHandle, ProcedureCommand};
pub use descriptor::{clean_name, ParamDescriptor, ParamOptions};
pub use errors::BindError;
pub use template::{ParamSource, ParamTemplate};

// Used by `param_template!` expansions
pub use cache_system::{TemplateField, TemplateShape};
