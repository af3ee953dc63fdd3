//! Scripted in-memory driver shared by the integration tests

#![allow(dead_code)]

use param_bag::{Command, NativeParameter, ProcedureCommand};
use prochaus::{Connection, DriverError, ResultCursor};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use type_mapping::{DbValue, Row};

/// Connection that records what was bound, writes scripted output values
/// and serves scripted result sets
pub struct FakeConnection {
    kind: String,
    outputs: Vec<(String, DbValue)>,
    result_sets: Vec<Vec<Row>>,
    failure: Option<String>,
    open_cursors: Arc<AtomicUsize>,
    bound: Vec<NativeParameter>,
    executions: usize,
}

impl FakeConnection {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            outputs: Vec::new(),
            result_sets: Vec::new(),
            failure: None,
            open_cursors: Arc::new(AtomicUsize::new(0)),
            bound: Vec::new(),
            executions: 0,
        }
    }

    pub fn sql_server() -> Self {
        Self::new("SqlServerConnection")
    }

    pub fn postgres() -> Self {
        Self::new("PgConnection")
    }

    /// Value the procedure writes into an output parameter
    pub fn with_output(mut self, name: &str, value: impl Into<DbValue>) -> Self {
        self.outputs.push((name.to_string(), value.into()));
        self
    }

    pub fn with_result_set(mut self, rows: Vec<Row>) -> Self {
        self.result_sets.push(rows);
        self
    }

    /// Fail every execution with a transport error
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    pub fn executions(&self) -> usize {
        self.executions
    }

    /// Parameters as they were bound at the last execution
    pub fn bound(&self) -> &[NativeParameter] {
        &self.bound
    }

    pub fn bound_parameter(&self, name: &str) -> Option<&NativeParameter> {
        self.bound.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }

    fn run(&mut self, command: &ProcedureCommand) -> Result<(), DriverError> {
        self.executions += 1;
        if let Some(message) = &self.failure {
            return Err(DriverError::new(message.clone()));
        }

        self.bound = command.parameters().iter().map(|p| p.snapshot()).collect();
        for (name, value) in &self.outputs {
            if let Some(handle) = command.parameter(name) {
                if handle.direction().is_output() {
                    handle.set_value(value.clone());
                }
            }
        }
        Ok(())
    }
}

impl Connection for FakeConnection {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn execute(&mut self, command: &ProcedureCommand) -> Result<u64, DriverError> {
        self.run(command)?;
        Ok(0)
    }

    fn query_multiple<'c>(
        &'c mut self,
        command: &ProcedureCommand,
    ) -> Result<Box<dyn ResultCursor + 'c>, DriverError> {
        self.run(command)?;

        let mut sets: VecDeque<Vec<Row>> = self.result_sets.iter().cloned().collect();
        let current = sets.pop_front().unwrap_or_default();
        self.open_cursors.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeCursor {
            sets,
            current: current.into_iter(),
            open_cursors: Arc::clone(&self.open_cursors),
        }))
    }
}

struct FakeCursor {
    sets: VecDeque<Vec<Row>>,
    current: std::vec::IntoIter<Row>,
    open_cursors: Arc<AtomicUsize>,
}

impl ResultCursor for FakeCursor {
    fn next_row(&mut self) -> Result<Option<Row>, DriverError> {
        Ok(self.current.next())
    }

    fn next_result(&mut self) -> Result<bool, DriverError> {
        match self.sets.pop_front() {
            Some(set) => {
                self.current = set.into_iter();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Drop for FakeCursor {
    fn drop(&mut self) {
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
    }
}
