//! Caller-facing call parameters
//!
//! [`CallParams`] holds the input values, the pre-seeded output values, an
//! optional return-value slot and output size overrides for one procedure
//! call. The error-code and error-message outputs are always present.

use indexmap::IndexMap;
use param_bag::ParamTemplate;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use type_mapping::DbValue;

/// Error-code output; zero means success
pub const ERROR_CODE_PARAM: &str = "O_ErrCode";
/// Free-text error message output
pub const ERROR_MESSAGE_PARAM: &str = "O_ErrMsg";
pub const ERROR_CODE_SIZE: usize = 2;
pub const ERROR_MESSAGE_SIZE: usize = 2000;
pub const SUCCESS_CODE: i32 = 0;

/// Ordered name to value map
pub type ParamMap = IndexMap<String, DbValue>;

pub struct CallParams {
    input: ParamMap,
    output: ParamMap,
    return_value: Option<(String, DbValue)>,
    out_size: HashMap<String, usize>,
    templates: Vec<Arc<dyn ParamTemplate>>,
}

impl Debug for CallParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallParams")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("return_value", &self.return_value)
            .field("out_size", &self.out_size)
            .field("templates", &self.templates.len())
            .finish()
    }
}

impl Default for CallParams {
    fn default() -> Self {
        Self::new()
    }
}

impl CallParams {
    /// Empty call parameters with the error outputs seeded to success
    pub fn new() -> Self {
        let mut output = ParamMap::new();
        output.insert(ERROR_CODE_PARAM.to_string(), DbValue::Int32(SUCCESS_CODE));
        output.insert(ERROR_MESSAGE_PARAM.to_string(), DbValue::String(String::new()));

        let mut out_size = HashMap::new();
        out_size.insert(ERROR_CODE_PARAM.to_string(), ERROR_CODE_SIZE);
        out_size.insert(ERROR_MESSAGE_PARAM.to_string(), ERROR_MESSAGE_SIZE);

        Self {
            input: ParamMap::new(),
            output,
            return_value: None,
            out_size,
            templates: Vec::new(),
        }
    }

    pub fn with_input(mut self, name: &str, value: impl Into<DbValue>) -> Self {
        self.add_input(name, value);
        self
    }

    pub fn add_input(&mut self, name: &str, value: impl Into<DbValue>) -> &mut Self {
        self.input.insert(name.to_string(), value.into());
        self
    }

    /// Declare an output; `default` fixes its type and is kept when the
    /// procedure leaves the parameter untouched
    pub fn with_output(mut self, name: &str, default: impl Into<DbValue>) -> Self {
        self.add_output(name, default);
        self
    }

    pub fn add_output(&mut self, name: &str, default: impl Into<DbValue>) -> &mut Self {
        self.output.insert(name.to_string(), default.into());
        self
    }

    /// Declare an output with an explicit buffer size
    pub fn with_output_sized(
        mut self,
        name: &str,
        default: impl Into<DbValue>,
        size: usize,
    ) -> Self {
        self.add_output(name, default);
        self.out_size.insert(name.to_string(), size);
        self
    }

    /// Declare the return-value slot, replacing any previous one
    pub fn with_return_value(mut self, name: &str, default: impl Into<DbValue>) -> Self {
        self.return_value = Some((name.to_string(), default.into()));
        self
    }

    /// Add a structure whose fields become input parameters
    pub fn with_template<T: ParamTemplate + 'static>(mut self, template: T) -> Self {
        self.templates.push(Arc::new(template));
        self
    }

    /// Overwrite an output value
    pub fn set_output(&mut self, name: &str, value: impl Into<DbValue>) {
        self.output.insert(name.to_string(), value.into());
    }

    pub(crate) fn set_return_value(&mut self, value: DbValue) {
        if let Some((_, slot)) = self.return_value.as_mut() {
            *slot = value;
        }
    }

    pub fn input(&self) -> &ParamMap {
        &self.input
    }

    pub fn output(&self) -> &ParamMap {
        &self.output
    }

    pub fn output_value(&self, name: &str) -> Option<&DbValue> {
        self.output.get(name)
    }

    pub fn return_value(&self) -> Option<(&str, &DbValue)> {
        self.return_value
            .as_ref()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn out_size(&self, name: &str) -> Option<usize> {
        self.out_size.get(name).copied()
    }

    pub fn templates(&self) -> &[Arc<dyn ParamTemplate>] {
        &self.templates
    }

    /// Current error code. A null code reads as success; a non-integer code
    /// reads as -1 so it is never mistaken for success.
    pub fn error_code(&self) -> i32 {
        match self.output.get(ERROR_CODE_PARAM) {
            None | Some(DbValue::Null) => SUCCESS_CODE,
            Some(value) => value
                .as_integer()
                .map(|code| code.clamp(i32::MIN.into(), i32::MAX.into()) as i32)
                .unwrap_or(-1),
        }
    }

    pub fn error_message(&self) -> String {
        self.output
            .get(ERROR_MESSAGE_PARAM)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub fn is_success(&self) -> bool {
        self.error_code() == SUCCESS_CODE
    }

    /// `name: value` pairs of every input, for diagnostics
    pub fn render_inputs(&self) -> String {
        self.input
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
