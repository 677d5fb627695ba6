//! Group-by aggregation for the bar chart and choropleth pipelines.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::error::{DataError, DataResult};
use super::table::{DistrictRecord, Table};

/// Upper bound on the result limit accepted by [`aggregate`].
pub const MAX_TOP_N: usize = 50;

/// Identifier column used as the group-by key.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    State,
    District,
}

impl GroupKey {
    fn of(&self, record: &DistrictRecord) -> String {
        match self {
            GroupKey::State => record.state.clone(),
            GroupKey::District => record.district.clone(),
        }
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::State => write!(f, "State"),
            GroupKey::District => write!(f, "District"),
        }
    }
}

/// Aggregation function applied independently per measure column.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateFn {
    Sum,
    Mean,
    Median,
    Min,
    Max,
}

impl AggregateFn {
    /// Apply the function to a non-empty value slice.
    fn apply(&self, values: &[f64]) -> f64 {
        match self {
            AggregateFn::Sum => values.iter().sum(),
            AggregateFn::Mean => values.iter().sum::<f64>() / values.len() as f64,
            AggregateFn::Median => median(values),
            AggregateFn::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            AggregateFn::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AggregateFn::Sum => "sum",
            AggregateFn::Mean => "mean",
            AggregateFn::Median => "median",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
        }
    }
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let count = sorted.len();
    if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    }
}

/// One aggregated group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedRow {
    /// Distinct value of the group key.
    pub group: String,
    /// Aggregate per measure column; `None` when every input value for the
    /// column was missing.
    pub values: BTreeMap<String, Option<f64>>,
}

impl GroupedRow {
    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().flatten()
    }
}

/// Result of a group-by aggregation, sorted and truncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupedResult {
    pub group_key: GroupKey,
    pub aggregate_fn: AggregateFn,
    pub rank_column: String,
    pub rows: Vec<GroupedRow>,
}

/// Group the table by `group_key`, aggregate each measure column with
/// `aggregate_fn`, sort descending by `rank_column` (ties broken by
/// ascending group name), and truncate to the first `top_n` rows.
///
/// Missing values are ignored per column; a group whose values are all
/// missing for a column yields a missing aggregate, never zero.
///
/// `top_n` outside `1..=MAX_TOP_N` is rejected with
/// [`DataError::InvalidParameter`] so a caller bug fails loudly instead of
/// being silently clamped.
pub fn aggregate(
    table: &Table,
    group_key: GroupKey,
    measure_columns: &[String],
    aggregate_fn: AggregateFn,
    rank_column: &str,
    top_n: usize,
) -> DataResult<GroupedResult> {
    if top_n == 0 || top_n > MAX_TOP_N {
        return Err(DataError::InvalidParameter(format!(
            "top_n must be between 1 and {}, got {}",
            MAX_TOP_N, top_n
        )));
    }
    if !measure_columns.iter().any(|c| c == rank_column) {
        return Err(DataError::InvalidParameter(format!(
            "rank column {:?} is not among the selected measures",
            rank_column
        )));
    }
    for column in measure_columns {
        table.require_measure(column)?;
    }

    // BTreeMap keeps groups in ascending name order, which the stable sort
    // below preserves for rank ties.
    let mut groups: BTreeMap<String, Vec<&DistrictRecord>> = BTreeMap::new();
    for record in table.rows() {
        groups.entry(group_key.of(record)).or_default().push(record);
    }

    let mut rows: Vec<GroupedRow> = groups
        .into_iter()
        .map(|(group, records)| {
            let values = measure_columns
                .iter()
                .map(|column| {
                    let present: Vec<f64> =
                        records.iter().filter_map(|r| r.measure(column)).collect();
                    let aggregated = if present.is_empty() {
                        None
                    } else {
                        Some(aggregate_fn.apply(&present))
                    };
                    (column.clone(), aggregated)
                })
                .collect();
            GroupedRow { group, values }
        })
        .collect();

    rows.sort_by(|a, b| rank_order(b.value(rank_column), a.value(rank_column)));
    rows.truncate(top_n);

    Ok(GroupedResult {
        group_key,
        aggregate_fn,
        rank_column: rank_column.to_string(),
        rows,
    })
}

/// Ordering for rank values: missing aggregates sort below any present one.
fn rank_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
