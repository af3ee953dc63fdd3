//! Parameter descriptors

use crate::command::{ParameterDirection, ParameterHandle};
use type_mapping::{DbType, DbValue};

/// Strip one leading `@`, `:` or `?` marker from a parameter name
pub fn clean_name(name: &str) -> &str {
    match name.as_bytes().first() {
        Some(b'@' | b':' | b'?') => &name[1..],
        _ => name,
    }
}

/// Direction, type and size overrides for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParamOptions {
    pub direction: ParameterDirection,
    pub db_type: Option<DbType>,
    pub size: Option<usize>,
}

impl ParamOptions {
    pub fn input() -> Self {
        Self::default()
    }

    pub fn output() -> Self {
        Self::default().direction(ParameterDirection::Output)
    }

    pub fn direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn db_type(mut self, db_type: DbType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    pub fn size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ParamDescriptor {
    pub(crate) name: String,
    pub(crate) value: DbValue,
    pub(crate) options: ParamOptions,
    pub(crate) attached: Option<ParameterHandle>,
}

impl ParamDescriptor {
    pub(crate) fn new(name: &str, value: DbValue, options: ParamOptions) -> Self {
        Self {
            name: clean_name(name).to_string(),
            value,
            options,
            attached: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &DbValue {
        &self.value
    }

    pub fn direction(&self) -> ParameterDirection {
        self.options.direction
    }

    pub fn db_type(&self) -> Option<DbType> {
        self.options.db_type
    }

    pub fn size(&self) -> Option<usize> {
        self.options.size
    }

    /// Native handle, present once the descriptor has been bound
    pub fn attached(&self) -> Option<&ParameterHandle> {
        self.attached.as_ref()
    }
}
