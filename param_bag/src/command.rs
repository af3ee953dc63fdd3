//! Native command primitive
//!
//! A [`ProcedureCommand`] is what a driver executes. Its parameters are
//! shared handles: the binder writes value, direction, size and type before
//! execution and the driver writes output values back through the same
//! handle.

use parking_lot::Mutex;
use std::sync::Arc;
use type_mapping::{DbType, DbValue};

/// Flow of a bound parameter between caller and procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl ParameterDirection {
    /// True when the procedure may write a value back
    pub fn is_output(&self) -> bool {
        !matches!(self, ParameterDirection::Input)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeParameter {
    pub name: String,
    pub value: DbValue,
    pub direction: ParameterDirection,
    pub size: Option<usize>,
    pub db_type: Option<DbType>,
}

impl NativeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: DbValue::Null,
            direction: ParameterDirection::Input,
            size: None,
            db_type: None,
        }
    }
}

/// Shared handle to a native parameter
#[derive(Debug, Clone)]
pub struct ParameterHandle(Arc<Mutex<NativeParameter>>);

impl ParameterHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(NativeParameter::new(name))))
    }

    pub fn name(&self) -> String {
        self.0.lock().name.clone()
    }

    pub fn value(&self) -> DbValue {
        self.0.lock().value.clone()
    }

    pub fn set_value(&self, value: DbValue) {
        self.0.lock().value = value;
    }

    pub fn direction(&self) -> ParameterDirection {
        self.0.lock().direction
    }

    pub fn set_direction(&self, direction: ParameterDirection) {
        self.0.lock().direction = direction;
    }

    pub fn size(&self) -> Option<usize> {
        self.0.lock().size
    }

    pub fn set_size(&self, size: usize) {
        self.0.lock().size = Some(size);
    }

    pub fn db_type(&self) -> Option<DbType> {
        self.0.lock().db_type
    }

    pub fn set_db_type(&self, db_type: DbType) {
        self.0.lock().db_type = Some(db_type);
    }

    /// Copy of the current parameter state
    pub fn snapshot(&self) -> NativeParameter {
        self.0.lock().clone()
    }

    /// True when both handles point at the same native parameter
    pub fn same_as(&self, other: &ParameterHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Parameter surface of a native command
pub trait Command {
    /// Create a detached parameter; it joins the command via `add_parameter`
    fn create_parameter(&self, name: &str) -> ParameterHandle;

    /// Parameter already attached under `name`
    fn parameter(&self, name: &str) -> Option<ParameterHandle>;

    fn add_parameter(&mut self, parameter: ParameterHandle);
}

/// Stored-procedure command handed to a connection
#[derive(Debug, Clone, Default)]
pub struct ProcedureCommand {
    procedure: String,
    parameters: Vec<ParameterHandle>,
}

impl ProcedureCommand {
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
            parameters: Vec::new(),
        }
    }

    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    pub fn parameters(&self) -> &[ParameterHandle] {
        &self.parameters
    }
}

impl Command for ProcedureCommand {
    fn create_parameter(&self, name: &str) -> ParameterHandle {
        ParameterHandle::new(name)
    }

    fn parameter(&self, name: &str) -> Option<ParameterHandle> {
        self.parameters
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    fn add_parameter(&mut self, parameter: ParameterHandle) {
        self.parameters.push(parameter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_writes_are_visible_through_clones() {
        let handle = ParameterHandle::new("O_Total");
        let driver_side = handle.clone();
        driver_side.set_value(DbValue::Int32(12));
        assert_eq!(handle.value(), DbValue::Int32(12));
        assert!(handle.same_as(&driver_side));
    }

    #[test]
    fn test_command_lookup_ignores_case() {
        let mut command = ProcedureCommand::new("usp_get_user");
        let handle = command.create_parameter("UserId");
        command.add_parameter(handle.clone());
        let found = command.parameter("userid").unwrap();
        assert!(found.same_as(&handle));
        assert!(command.parameter("Missing").is_none());
    }

    #[test]
    fn test_direction_is_output() {
        assert!(!ParameterDirection::Input.is_output());
        assert!(ParameterDirection::InputOutput.is_output());
        assert!(ParameterDirection::ReturnValue.is_output());
    }
}
