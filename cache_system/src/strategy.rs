//! Binding strategies
//!
//! A strategy is the emission plan for one template shape: which named
//! parameters it contributes and the type each one binds with.

use crate::errors::CacheError;
use crate::key::TemplateShape;
use type_mapping::{DbType, DbValue, HostType, TypeMappingError, TypeRegistry};

/// One named field of a template value, tagged with its host type
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateField {
    pub name: String,
    pub host: HostType,
    pub value: DbValue,
}

impl TemplateField {
    pub fn new<T>(name: impl Into<String>, value: &T) -> Self
    where
        T: Clone + Into<DbValue> + 'static,
    {
        Self {
            name: name.into(),
            host: HostType::of::<T>(),
            value: value.clone().into(),
        }
    }

    /// Registry tag for the field's host type. Raw `DbValue` fields carry
    /// no static tag and yield `None`.
    pub fn db_type(&self) -> Result<Option<DbType>, TypeMappingError> {
        match TypeRegistry::global().lookup_host(self.host) {
            Ok(db_type) => Ok(Some(db_type)),
            Err(_) if is_dynamic(self.host) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn is_dynamic(host: HostType) -> bool {
    host == HostType::of::<DbValue>()
        || host == HostType::of::<Option<DbValue>>()
        || host == HostType::of::<Vec<DbValue>>()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    pub name: String,
    /// `None` for raw value fields; the binder infers per call
    pub db_type: Option<DbType>,
}

#[derive(Debug, Clone)]
pub struct BindingStrategy {
    shape: TemplateShape,
    fields: Vec<FieldPlan>,
}

impl BindingStrategy {
    /// Derive a plan from the host types of one sample of the template's
    /// fields. Sample values never influence the plan.
    pub fn derive(shape: TemplateShape, sample: &[TemplateField]) -> Result<Self, CacheError> {
        let fields = sample
            .iter()
            .map(|field| {
                let db_type = field.db_type().map_err(|source| CacheError::Population {
                    shape: shape.to_string(),
                    source,
                })?;
                Ok(FieldPlan {
                    name: field.name.clone(),
                    db_type,
                })
            })
            .collect::<Result<Vec<_>, CacheError>>()?;

        Ok(Self { shape, fields })
    }

    pub fn shape(&self) -> TemplateShape {
        self.shape
    }

    pub fn fields(&self) -> &[FieldPlan] {
        &self.fields
    }
}
