//! Parameter bag
//!
//! A bag collects named parameter descriptors and deferred templates for one
//! invocation, binds them to a single command and reads output values back
//! through the handles recorded during binding.

use crate::command::{Command, ParameterDirection, ParameterHandle};
use crate::descriptor::{clean_name, ParamDescriptor, ParamOptions};
use crate::errors::BindError;
use crate::template::{ParamSource, ParamTemplate};
use cache_system::{BindingStrategy, QueryIdentity, StrategyCache, TemplateField};
use indexmap::IndexMap;
use std::fmt::Debug;
use std::sync::Arc;
use type_mapping::{DbType, DbValue, FromDbValue, TypeRegistry};

/// Default buffer size for string parameters without an explicit size
pub const DEFAULT_STRING_SIZE: usize = 4000;

/// Backend and configuration dependent binding rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Strings up to this many characters get this buffer size
    pub default_string_size: usize,
    /// Whether the backend accepts array-valued parameters
    pub arrays: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            default_string_size: DEFAULT_STRING_SIZE,
            arrays: false,
        }
    }
}

#[derive(Default)]
pub struct ParameterBag {
    parameters: IndexMap<String, ParamDescriptor>,
    templates: Vec<Arc<dyn ParamTemplate>>,
    bound: bool,
}

impl Debug for ParameterBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shapes: Vec<&str> = self.templates.iter().map(|t| t.shape().name()).collect();
        f.debug_struct("ParameterBag")
            .field("parameters", &self.parameters.keys().collect::<Vec<_>>())
            .field("templates", &shapes)
            .field("bound", &self.bound)
            .finish()
    }
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an input parameter
    pub fn add(&mut self, name: &str, value: impl Into<DbValue>) -> &mut Self {
        self.add_with(name, value, ParamOptions::input())
    }

    /// Add or replace a parameter with explicit direction, type or size
    pub fn add_with(
        &mut self,
        name: &str,
        value: impl Into<DbValue>,
        options: ParamOptions,
    ) -> &mut Self {
        let descriptor = ParamDescriptor::new(name, value.into(), options);
        self.parameters.insert(descriptor.name.clone(), descriptor);
        self
    }

    /// Defer a template whose fields become input parameters at bind time
    pub fn add_template<T: ParamTemplate + 'static>(&mut self, template: T) -> &mut Self {
        self.import_from(ParamSource::template(template))
    }

    /// Merge another bag, a flat name/value collection, or a template
    pub fn import_from(&mut self, source: impl Into<ParamSource>) -> &mut Self {
        match source.into() {
            ParamSource::Bag(other) => {
                for (name, mut descriptor) in other.parameters {
                    descriptor.attached = None;
                    self.parameters.insert(name, descriptor);
                }
                self.templates.extend(other.templates);
            }
            ParamSource::Values(values) => {
                for (name, value) in values {
                    self.add(&name, value);
                }
            }
            ParamSource::Template(template) => self.templates.push(template),
        }
        self
    }

    /// Attach every template field and descriptor to `command`.
    ///
    /// Handles are single-use: a bag binds exactly once.
    pub fn bind<C: Command + ?Sized>(
        &mut self,
        command: &mut C,
        identity: &QueryIdentity,
        cache: &StrategyCache,
        options: &BindOptions,
    ) -> Result<(), BindError> {
        if self.bound {
            return Err(BindError::AlreadyBound);
        }
        self.bound = true;

        for template in &self.templates {
            let fields = template.fields();
            let key = identity.for_template(template.shape());
            let strategy =
                cache.get_or_populate(&key, || BindingStrategy::derive(key.shape, &fields))?;
            emit_template(command, &strategy, fields, options)?;
        }

        for descriptor in self.parameters.values_mut() {
            let handle = attach(
                command,
                &descriptor.name,
                descriptor.value.clone(),
                descriptor.options,
                options,
            )?;
            descriptor.attached = Some(handle);
        }

        tracing::trace!(
            identity = %identity,
            parameters = self.parameters.len(),
            templates = self.templates.len(),
            "bound parameter bag"
        );
        Ok(())
    }

    /// Post-execution value of a bound parameter; a database null reads as `None`
    pub fn readback(&self, name: &str) -> Result<Option<DbValue>, BindError> {
        let handle = self.handle(name)?;
        Ok(match handle.value() {
            DbValue::Null => None,
            value => Some(value),
        })
    }

    /// Typed post-execution value of a bound parameter
    pub fn get<T: FromDbValue>(&self, name: &str) -> Result<T, BindError> {
        let value = self.handle(name)?.value();
        Ok(T::from_nullable(value)?)
    }

    fn handle(&self, name: &str) -> Result<&ParameterHandle, BindError> {
        let descriptor = self
            .parameters
            .get(clean_name(name))
            .ok_or_else(|| BindError::ParameterNotFound(name.to_string()))?;
        descriptor
            .attached
            .as_ref()
            .ok_or_else(|| BindError::NotBound(descriptor.name.clone()))
    }

    pub fn descriptor(&self, name: &str) -> Option<&ParamDescriptor> {
        self.parameters.get(clean_name(name))
    }

    /// Names of all explicit parameters in insertion order
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty() && self.templates.is_empty()
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }
}

fn emit_template<C: Command + ?Sized>(
    command: &mut C,
    strategy: &BindingStrategy,
    fields: Vec<TemplateField>,
    options: &BindOptions,
) -> Result<(), BindError> {
    let mut values: IndexMap<String, TemplateField> = fields
        .into_iter()
        .map(|field| (field.name.clone(), field))
        .collect();

    // Plan fields absent from this value contribute nothing
    for plan in strategy.fields() {
        if let Some(field) = values.shift_remove(&plan.name) {
            attach(command, &plan.name, field.value, input_of(plan.db_type), options)?;
        }
    }

    // Fields outside the plan, e.g. map keys the first sample lacked
    for (name, field) in values {
        let db_type = field.db_type()?;
        attach(command, &name, field.value, input_of(db_type), options)?;
    }
    Ok(())
}

fn input_of(db_type: Option<DbType>) -> ParamOptions {
    ParamOptions {
        direction: ParameterDirection::Input,
        db_type,
        size: None,
    }
}

fn resolve_type(
    name: &str,
    value: &DbValue,
    declared: Option<DbType>,
    options: &BindOptions,
) -> Result<Option<DbType>, BindError> {
    if let DbValue::Array(_) = value {
        if !options.arrays {
            return Err(BindError::ArraysUnsupported(name.to_string()));
        }
        return Ok(declared);
    }
    match declared {
        Some(db_type) => Ok(Some(db_type)),
        None => Ok(TypeRegistry::global().lookup_value(value)?),
    }
}

/// Create or reuse the same-named native parameter and apply value,
/// direction, size and type to it
fn attach<C: Command + ?Sized>(
    command: &mut C,
    name: &str,
    value: DbValue,
    param: ParamOptions,
    options: &BindOptions,
) -> Result<ParameterHandle, BindError> {
    let db_type = resolve_type(name, &value, param.db_type, options)?;

    let (handle, add) = match command.parameter(name) {
        Some(existing) => (existing, false),
        None => (command.create_parameter(name), true),
    };

    if let DbValue::String(s) = &value {
        if s.chars().count() <= options.default_string_size {
            handle.set_size(options.default_string_size);
        }
    }
    if let Some(size) = param.size {
        handle.set_size(size);
    }
    if let Some(db_type) = db_type {
        handle.set_db_type(db_type);
    }
    handle.set_value(value);
    handle.set_direction(param.direction);

    if add {
        command.add_parameter(handle.clone());
    }
    Ok(handle)
}
