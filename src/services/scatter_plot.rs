//! Scatter plot service: raw rows plotted over two chosen measures,
//! color-grouped by State (overall scope) or District (state scope).

use serde::{Deserialize, Serialize};

use crate::api::Scope;
use crate::data::aggregate::GroupKey;
use crate::data::table::Table;

use super::dispatch::ChartError;

/// One plotted row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterPoint {
    /// Color-group label (state or district name).
    pub group: String,
    /// Hover name.
    pub hover: String,
    pub x: f64,
    pub y: f64,
}

/// Complete scatter plot figure data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScatterPlotData {
    pub x_column: String,
    pub y_column: String,
    /// Which identifier provides the color groups.
    pub color_key: GroupKey,
    pub points: Vec<ScatterPoint>,
    /// Rows in the scoped table.
    pub total_count: usize,
    /// Rows dropped because either measure was missing.
    pub skipped_count: usize,
}

/// Compute scatter plot data from an already scope-filtered table.
pub fn compute_scatter_plot_data(
    table: &Table,
    scope: &Scope,
    x_column: &str,
    y_column: &str,
) -> Result<ScatterPlotData, ChartError> {
    table.require_measure(x_column)?;
    table.require_measure(y_column)?;

    let color_key = if scope.is_overall() {
        GroupKey::State
    } else {
        GroupKey::District
    };

    let total_count = table.len();
    let mut points = Vec::new();
    for record in table.rows() {
        let (x, y) = match (record.measure(x_column), record.measure(y_column)) {
            (Some(x), Some(y)) => (x, y),
            _ => continue,
        };
        let group = match color_key {
            GroupKey::State => record.state.clone(),
            GroupKey::District => record.district.clone(),
        };
        points.push(ScatterPoint {
            group,
            hover: record.district.clone(),
            x,
            y,
        });
    }
    let skipped_count = total_count - points.len();

    Ok(ScatterPlotData {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        color_key,
        points,
        total_count,
        skipped_count,
    })
}
