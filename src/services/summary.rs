//! Data summary service: descriptive statistics, a first-rows preview,
//! missing-value counts, and a correlation matrix over the measure columns.

use serde::{Deserialize, Serialize};

use crate::data::schema;
use crate::data::table::{DistrictRecord, Table};

use super::trend::{pearson_correlation, round2};

/// Number of rows included in the preview.
pub const PREVIEW_ROWS: usize = 5;

/// Descriptive statistics for one measure column (over present values).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    /// Count of present (non-missing) values.
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; `None` when fewer than two values.
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Missing-value count for one column. Only columns with at least one
/// missing value are reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Pearson correlation matrix over the measure columns.
///
/// `values[i][j]` is the correlation between `columns[i]` and `columns[j]`
/// over rows where both are present, rounded to two decimals; `None` when
/// fewer than two complete pairs exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

/// Complete data summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryData {
    pub row_count: usize,
    /// Per-column statistics in ascending column order.
    pub columns: Vec<ColumnSummary>,
    /// First rows of the dataset.
    pub preview: Vec<DistrictRecord>,
    /// Columns with at least one missing value, ascending column order.
    pub missing: Vec<MissingCount>,
    pub correlation: CorrelationMatrix,
}

/// Compute the summary over the full dataset.
pub fn compute_summary_data(table: &Table) -> SummaryData {
    let columns = schema::measure_columns(table);

    let column_summaries = columns
        .iter()
        .map(|column| {
            let values: Vec<f64> = table
                .rows()
                .iter()
                .filter_map(|r| r.measure(column))
                .collect();
            column_summary(column, &values)
        })
        .collect();

    let missing = columns
        .iter()
        .filter_map(|column| {
            let missing = table
                .rows()
                .iter()
                .filter(|r| r.measure(column).is_none())
                .count();
            (missing > 0).then(|| MissingCount {
                column: column.clone(),
                missing,
            })
        })
        .collect();

    let correlation = correlation_matrix(table, &columns);

    SummaryData {
        row_count: table.len(),
        columns: column_summaries,
        preview: table.rows().iter().take(PREVIEW_ROWS).cloned().collect(),
        missing,
        correlation,
    }
}

fn column_summary(column: &str, values: &[f64]) -> ColumnSummary {
    let count = values.len();
    if count == 0 {
        return ColumnSummary {
            column: column.to_string(),
            count: 0,
            mean: None,
            std_dev: None,
            min: None,
            q25: None,
            median: None,
            q75: None,
            max: None,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;

    // Sample standard deviation (n - 1 denominator).
    let std_dev = if count > 1 {
        let variance = values
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / (count - 1) as f64;
        Some(variance.sqrt())
    } else {
        None
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    ColumnSummary {
        column: column.to_string(),
        count,
        mean: Some(mean),
        std_dev,
        min: sorted.first().copied(),
        q25: Some(percentile(&sorted, 0.25)),
        median: Some(percentile(&sorted, 0.5)),
        q75: Some(percentile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolated percentile over an ascending-sorted slice.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

fn correlation_matrix(table: &Table, columns: &[String]) -> CorrelationMatrix {
    let values = columns
        .iter()
        .map(|a| {
            columns
                .iter()
                .map(|b| {
                    let pairs: Vec<(f64, f64)> = table
                        .rows()
                        .iter()
                        .filter_map(|r| match (r.measure(a), r.measure(b)) {
                            (Some(x), Some(y)) => Some((x, y)),
                            _ => None,
                        })
                        .collect();
                    if pairs.len() < 2 {
                        None
                    } else if a == b {
                        Some(1.0)
                    } else {
                        Some(round2(pearson_correlation(&pairs)))
                    }
                })
                .collect()
        })
        .collect();

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}
