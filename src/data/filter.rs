//! Scope filtering over the loaded table.

use crate::api::Scope;

use super::error::{DataError, DataResult};
use super::table::Table;

/// Apply a geographic scope to the table.
///
/// The sentinel scope returns an identical table (same rows, same order).
/// A state scope returns exactly the rows whose state matches, preserving
/// original row order. An unknown state is a caller contract violation and
/// fails fast with [`DataError::InvalidScope`].
pub fn filter_scope(table: &Table, scope: &Scope) -> DataResult<Table> {
    let state = match scope {
        Scope::OverallIndia => return Ok(table.clone()),
        Scope::State(name) => name,
    };

    if !table.rows().iter().any(|r| &r.state == state) {
        return Err(DataError::InvalidScope(state.clone()));
    }

    let rows = table
        .rows()
        .iter()
        .filter(|r| &r.state == state)
        .cloned()
        .collect();
    Ok(Table::new(table.measure_columns().to_vec(), rows))
}
