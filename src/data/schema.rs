//! Schema inspection: the selectable options derived from the loaded table.
//!
//! UI widget selection indices depend on stable ordering, so both functions
//! must produce identical output for identical input.

use crate::api::OVERALL_SCOPE;

use super::table::Table;

/// Numeric measure columns, sorted ascending.
pub fn measure_columns(table: &Table) -> Vec<String> {
    let mut columns: Vec<String> = table.measure_columns().to_vec();
    columns.sort();
    columns
}

/// Distinct state names, sorted ascending.
pub fn distinct_states(table: &Table) -> Vec<String> {
    let mut states: Vec<String> = table.rows().iter().map(|r| r.state.clone()).collect();
    states.sort();
    states.dedup();
    states
}

/// Scope options offered to the user: the "whole dataset" sentinel followed
/// by the distinct states in ascending order.
pub fn scope_options(table: &Table) -> Vec<String> {
    let mut options = vec![OVERALL_SCOPE.to_string()];
    options.extend(distinct_states(table));
    options
}
