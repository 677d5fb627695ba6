//! Trend service: raw scatter of two measures over the whole dataset, a
//! first-degree least-squares fit, and the Pearson correlation coefficient.

use serde::{Deserialize, Serialize};

use crate::data::table::Table;

use super::dispatch::ChartError;

/// A single (x, y) observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
}

/// Complete trend figure data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendData {
    pub x_column: String,
    pub y_column: String,
    pub points: Vec<TrendPoint>,
    /// Slope of the fitted line.
    pub slope: f64,
    /// Intercept of the fitted line.
    pub intercept: f64,
    /// Endpoints of the fitted line over the observed x range.
    pub line: [TrendPoint; 2],
    /// Pearson correlation coefficient, rounded to two decimal places.
    pub correlation: f64,
    /// Number of complete (x, y) observations used.
    pub sample_count: usize,
}

/// Compute trend data over the whole dataset.
///
/// Rows missing either measure are excluded; fewer than two remaining
/// observations is a degenerate regression input and fails with a
/// recoverable [`ChartError`].
pub fn compute_trend_data(
    table: &Table,
    x_column: &str,
    y_column: &str,
) -> Result<TrendData, ChartError> {
    let pairs = table.measure_pairs(x_column, y_column)?;
    if pairs.len() < 2 {
        return Err(ChartError::Construction(format!(
            "trend fit needs at least 2 complete observations, got {}",
            pairs.len()
        )));
    }

    let (slope, intercept) = linear_fit(&pairs)?;
    let correlation = round2(pearson_correlation(&pairs));

    let x_min = pairs.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let x_max = pairs
        .iter()
        .map(|(x, _)| *x)
        .fold(f64::NEG_INFINITY, f64::max);
    let line = [
        TrendPoint {
            x: x_min,
            y: slope * x_min + intercept,
        },
        TrendPoint {
            x: x_max,
            y: slope * x_max + intercept,
        },
    ];

    let sample_count = pairs.len();
    let points = pairs.into_iter().map(|(x, y)| TrendPoint { x, y }).collect();

    Ok(TrendData {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        points,
        slope,
        intercept,
        line,
        correlation,
        sample_count,
    })
}

/// Least-squares fit of a first-degree polynomial to the observations.
fn linear_fit(pairs: &[(f64, f64)]) -> Result<(f64, f64), ChartError> {
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        numerator += dx * (y - mean_y);
        denominator += dx * dx;
    }

    if denominator == 0.0 {
        return Err(ChartError::Construction(
            "trend fit is degenerate: all x values are identical".to_string(),
        ));
    }

    let slope = numerator / denominator;
    let intercept = mean_y - slope * mean_x;
    Ok((slope, intercept))
}

/// Pearson correlation coefficient between the paired observations.
///
/// Returns 0.0 when either variable has zero variance.
pub(crate) fn pearson_correlation(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Round to two decimal places for display.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
