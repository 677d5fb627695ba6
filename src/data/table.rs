//! Immutable table model for the district dataset.
//!
//! A [`Table`] is loaded once and never mutated; every downstream operation
//! (filter, aggregate) produces a new derived table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{DataError, DataResult};

/// One row of the dataset: a district with its coordinates and measures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictRecord {
    /// State the district belongs to (never empty).
    pub state: String,
    /// District name (never empty).
    pub district: String,
    /// Latitude of the district centroid, degrees.
    pub latitude: f64,
    /// Longitude of the district centroid, degrees.
    pub longitude: f64,
    /// Numeric measure columns; `None` marks a missing value.
    pub measures: BTreeMap<String, Option<f64>>,
}

impl DistrictRecord {
    /// Value of one measure column, flattened over missing cells.
    pub fn measure(&self, column: &str) -> Option<f64> {
        self.measures.get(column).copied().flatten()
    }
}

/// The loaded dataset: an ordered sequence of district records plus the
/// set of numeric measure columns discovered at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    measure_columns: Vec<String>,
    rows: Vec<DistrictRecord>,
}

impl Table {
    pub fn new(measure_columns: Vec<String>, rows: Vec<DistrictRecord>) -> Self {
        Self {
            measure_columns,
            rows,
        }
    }

    pub fn rows(&self) -> &[DistrictRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Measure column names in load order (unsorted; see `schema` for the
    /// deterministic sorted view).
    pub fn measure_columns(&self) -> &[String] {
        &self.measure_columns
    }

    pub fn has_measure(&self, column: &str) -> bool {
        self.measure_columns.iter().any(|c| c == column)
    }

    /// Validate that a column is a known measure, or fail with
    /// `UnknownColumn`.
    pub fn require_measure(&self, column: &str) -> DataResult<()> {
        if self.has_measure(column) {
            Ok(())
        } else {
            Err(DataError::UnknownColumn(column.to_string()))
        }
    }

    /// All values of one measure column, in row order, missing cells as
    /// `None`.
    pub fn measure_values(&self, column: &str) -> DataResult<Vec<Option<f64>>> {
        self.require_measure(column)?;
        Ok(self.rows.iter().map(|r| r.measure(column)).collect())
    }

    /// (x, y) pairs for two measure columns, keeping only rows where both
    /// values are present. Row order is preserved.
    pub fn measure_pairs(&self, x_column: &str, y_column: &str) -> DataResult<Vec<(f64, f64)>> {
        self.require_measure(x_column)?;
        self.require_measure(y_column)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|r| match (r.measure(x_column), r.measure(y_column)) {
                (Some(x), Some(y)) => Some((x, y)),
                _ => None,
            })
            .collect())
    }
}
