//! Cache keys
//!
//! A strategy is reusable for one procedure on one kind of connection and
//! one template shape.

use std::fmt;
use type_mapping::HostType;

/// Identity of the query a bag is bound for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryIdentity {
    procedure: String,
    connection_kind: String,
}

impl QueryIdentity {
    pub fn new(procedure: impl Into<String>, connection_kind: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
            connection_kind: connection_kind.into(),
        }
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    pub fn connection_kind(&self) -> &str {
        &self.connection_kind
    }

    /// Key for a template shape bound under this identity
    pub fn for_template(&self, shape: TemplateShape) -> CacheKey {
        CacheKey {
            identity: self.clone(),
            shape,
        }
    }
}

impl fmt::Display for QueryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.procedure, self.connection_kind)
    }
}

/// Static shape of a template object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemplateShape(HostType);

impl TemplateShape {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(HostType::of::<T>())
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl fmt::Display for TemplateShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub identity: QueryIdentity,
    pub shape: TemplateShape,
}
