//! Chart dispatcher: one exhaustive match from (mode, parameters) to a
//! constructed figure.
//!
//! Every construction failure is a recoverable, per-request [`ChartError`];
//! the caller reports it and the user retries with different parameters.

use serde::{Deserialize, Serialize};

use crate::api::{ChartMode, Scope};
use crate::data::aggregate::AggregateFn;
use crate::data::error::DataError;
use crate::data::filter::filter_scope;
use crate::data::table::Table;

use super::bar_chart::{compute_bar_chart_data, BarChartData};
use super::boundaries::BoundarySet;
use super::choropleth::{compute_choropleth_data, ChoroplethData};
use super::geo_scatter::{compute_geo_scatter_data, GeoScatterData};
use super::scatter_plot::{compute_scatter_plot_data, ScatterPlotData};
use super::trend::{compute_trend_data, TrendData};

/// Default bar-chart result limit when the request does not set one.
pub const DEFAULT_TOP_N: usize = 10;

/// Error type for chart construction and export.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// Invalid selection parameters or scope (caller contract violation).
    #[error(transparent)]
    Data(#[from] DataError),

    /// The figure could not be built from the given data.
    #[error("Chart construction failed: {0}")]
    Construction(String),

    /// The figure could not be serialized to an image.
    #[error("Chart export failed: {0}")]
    Render(String),
}

/// User selection parameters for one chart request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    pub mode: ChartMode,
    /// Geographic scope; defaults to the whole dataset.
    #[serde(default)]
    pub scope: Scope,
    /// Primary measure column (size / bar height / X axis / fill value).
    pub primary: String,
    /// Secondary measure column (color / Y axis); required by every mode
    /// except choropleth.
    #[serde(default)]
    pub secondary: Option<String>,
    /// Aggregation function, bar mode only.
    #[serde(default)]
    pub aggregate: Option<AggregateFn>,
    /// Result limit, bar mode only (1..=50).
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl ChartRequest {
    fn secondary(&self) -> Result<&str, ChartError> {
        self.secondary.as_deref().ok_or_else(|| {
            ChartError::Data(DataError::InvalidParameter(format!(
                "{} mode requires a secondary parameter",
                self.mode
            )))
        })
    }
}

/// The constructed chart artifact: a closed set of figure variants.
///
/// Immutable once built; rendered for display and independently serialized
/// to image bytes by the export adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Figure {
    GeoScatter(GeoScatterData),
    Bar(BarChartData),
    Scatter(ScatterPlotData),
    Choropleth(ChoroplethData),
    Trend(TrendData),
}

impl Figure {
    pub fn mode(&self) -> ChartMode {
        match self {
            Figure::GeoScatter(_) => ChartMode::GeoScatter,
            Figure::Bar(_) => ChartMode::Bar,
            Figure::Scatter(_) => ChartMode::Scatter,
            Figure::Choropleth(_) => ChartMode::Choropleth,
            Figure::Trend(_) => ChartMode::Trend,
        }
    }
}

/// Build the figure for one request.
///
/// `boundaries` is only consulted by the choropleth mode; passing `None`
/// for that mode is a construction error. Trend and choropleth always run
/// over the whole dataset; the other modes apply the requested scope first.
pub fn build_chart(
    table: &Table,
    boundaries: Option<&BoundarySet>,
    request: &ChartRequest,
) -> Result<Figure, ChartError> {
    match request.mode {
        ChartMode::GeoScatter => {
            let scoped = filter_scope(table, &request.scope)?;
            let data = compute_geo_scatter_data(
                &scoped,
                &request.scope,
                &request.primary,
                request.secondary()?,
            )?;
            Ok(Figure::GeoScatter(data))
        }
        ChartMode::Bar => {
            let scoped = filter_scope(table, &request.scope)?;
            let data = compute_bar_chart_data(
                &scoped,
                &request.scope,
                &request.primary,
                request.secondary()?,
                request.aggregate.unwrap_or(AggregateFn::Sum),
                request.top_n.unwrap_or(DEFAULT_TOP_N),
            )?;
            Ok(Figure::Bar(data))
        }
        ChartMode::Scatter => {
            let scoped = filter_scope(table, &request.scope)?;
            let data = compute_scatter_plot_data(
                &scoped,
                &request.scope,
                &request.primary,
                request.secondary()?,
            )?;
            Ok(Figure::Scatter(data))
        }
        ChartMode::Choropleth => {
            let boundaries = boundaries.ok_or_else(|| {
                ChartError::Construction("boundary data unavailable".to_string())
            })?;
            let data = compute_choropleth_data(table, boundaries, &request.primary)?;
            Ok(Figure::Choropleth(data))
        }
        ChartMode::Trend => {
            let data = compute_trend_data(table, &request.primary, request.secondary()?)?;
            Ok(Figure::Trend(data))
        }
    }
}
