//! Data Transfer Objects for the HTTP API.
//!
//! The figure and summary DTOs are re-exported from the service layer since
//! they already derive Serialize/Deserialize; this module only adds the
//! surface-specific request and response shapes.

use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{
    // Bar
    BarChartData, BarEntry,
    // Choropleth
    ChoroplethData, ChoroplethRegion,
    // Dispatch
    ChartRequest, Figure,
    // Geo scatter
    GeoPoint, GeoScatterData,
    // Scatter
    ScatterPlotData, ScatterPoint,
    // Summary
    ColumnSummary, CorrelationMatrix, MissingCount, SummaryData,
    // Trend
    TrendData, TrendPoint,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Number of rows in the loaded dataset
    pub dataset_rows: usize,
}

/// Response for the schema endpoint: everything the parameter-selection UI
/// needs to populate its controls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    /// Scope options: the whole-dataset sentinel followed by the states.
    pub scopes: Vec<String>,
    /// Numeric measure columns, ascending order.
    pub measure_columns: Vec<String>,
    pub row_count: usize,
}

/// Query parameters for the export endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExportQuery {
    /// Image width in pixels (optional, default 1200)
    #[serde(default)]
    pub width: Option<u32>,
    /// Image height in pixels (optional, default 700)
    #[serde(default)]
    pub height: Option<u32>,
}
