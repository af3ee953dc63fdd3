//! Connection seam
//!
//! Drivers implement [`Connection`] and [`ResultCursor`]. A cursor is owned
//! by the caller that opened it and is closed when dropped.

use crate::errors::DriverError;
use param_bag::ProcedureCommand;
use type_mapping::Row;

/// Sequential reader over the result sets of one execution
pub trait ResultCursor {
    /// Next row of the current result set, `None` once the set is exhausted
    fn next_row(&mut self) -> Result<Option<Row>, DriverError>;

    /// Advance to the next result set; `false` when there are no more sets
    fn next_result(&mut self) -> Result<bool, DriverError>;
}

pub trait Connection {
    /// Concrete implementation identity, e.g. `"PgConnection"`
    fn kind(&self) -> &str;

    /// Execute without reading results; returns the affected row count
    fn execute(&mut self, command: &ProcedureCommand) -> Result<u64, DriverError>;

    /// Execute and open a cursor positioned on the first result set
    fn query_multiple<'c>(
        &'c mut self,
        command: &ProcedureCommand,
    ) -> Result<Box<dyn ResultCursor + 'c>, DriverError>;

    /// Execute for a single result set
    fn query<'c>(
        &'c mut self,
        command: &ProcedureCommand,
    ) -> Result<Box<dyn ResultCursor + 'c>, DriverError> {
        self.query_multiple(command)
    }
}

/// Drain the current result set
pub(crate) fn read_set(cursor: &mut dyn ResultCursor) -> Result<Vec<Row>, DriverError> {
    let mut rows = Vec::new();
    while let Some(row) = cursor.next_row()? {
        rows.push(row);
    }
    Ok(rows)
}

/// Drain `count` consecutive result sets in order
pub(crate) fn read_sets(
    cursor: &mut dyn ResultCursor,
    count: usize,
) -> Result<Vec<Vec<Row>>, DriverError> {
    let mut sets = Vec::with_capacity(count);
    for index in 0..count {
        if index > 0 && !cursor.next_result()? {
            return Err(DriverError::new(format!(
                "expected {} result sets but the procedure produced {}",
                count, index
            )));
        }
        sets.push(read_set(cursor)?);
    }
    Ok(sets)
}
