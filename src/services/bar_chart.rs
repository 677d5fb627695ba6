//! Bar chart service: top-N groups ranked by an aggregated measure.
//!
//! Whole-dataset scope groups by State; a single-state scope groups by
//! District, mirroring how the map drills down.

use serde::{Deserialize, Serialize};

use crate::api::Scope;
use crate::data::aggregate::{aggregate, AggregateFn, GroupKey};
use crate::data::table::Table;

use super::dispatch::ChartError;

/// One bar in the chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarEntry {
    /// Group name (state or district).
    pub name: String,
    /// Bar height: the aggregated ranking measure.
    pub value: Option<f64>,
    /// Bar color: the aggregated secondary measure.
    pub color_value: Option<f64>,
}

/// Complete bar chart figure data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarChartData {
    pub group_key: GroupKey,
    /// Measure that determines bar height and ranking.
    pub rank_column: String,
    /// Measure encoded as bar color.
    pub color_column: String,
    pub aggregate_fn: AggregateFn,
    /// Bars in rank order (descending, name-ascending on ties).
    pub bars: Vec<BarEntry>,
}

/// Compute bar chart data from an already scope-filtered table.
pub fn compute_bar_chart_data(
    table: &Table,
    scope: &Scope,
    primary: &str,
    secondary: &str,
    aggregate_fn: AggregateFn,
    top_n: usize,
) -> Result<BarChartData, ChartError> {
    let group_key = if scope.is_overall() {
        GroupKey::State
    } else {
        GroupKey::District
    };

    let mut measures = vec![primary.to_string()];
    if secondary != primary {
        measures.push(secondary.to_string());
    }

    let grouped = aggregate(table, group_key, &measures, aggregate_fn, primary, top_n)?;

    let bars = grouped
        .rows
        .iter()
        .map(|row| BarEntry {
            name: row.group.clone(),
            value: row.value(primary),
            color_value: row.value(secondary),
        })
        .collect();

    Ok(BarChartData {
        group_key,
        rank_column: primary.to_string(),
        color_column: secondary.to_string(),
        aggregate_fn,
        bars,
    })
}
