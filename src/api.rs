//! Public API surface for the Rust backend.
//!
//! This file consolidates the DTO types for the HTTP API and defines the
//! shared selection-parameter types. All types derive Serialize/Deserialize
//! for JSON serialization.

pub use crate::data::aggregate::{AggregateFn, GroupKey, GroupedResult, GroupedRow};
pub use crate::data::table::{DistrictRecord, Table};
pub use crate::services::bar_chart::{BarChartData, BarEntry};
pub use crate::services::boundaries::BoundarySet;
pub use crate::services::choropleth::{ChoroplethData, ChoroplethRegion};
pub use crate::services::dispatch::{ChartError, ChartRequest, Figure};
pub use crate::services::geo_scatter::{GeoPoint, GeoScatterData};
pub use crate::services::scatter_plot::{ScatterPlotData, ScatterPoint};
pub use crate::services::summary::{ColumnSummary, CorrelationMatrix, MissingCount, SummaryData};
pub use crate::services::trend::{TrendData, TrendPoint};

use serde::{Deserialize, Serialize};

/// Sentinel scope label meaning "no geographic filter".
pub const OVERALL_SCOPE: &str = "Overall India";

/// Geographic scope selected by the user: the whole dataset or one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Scope {
    /// The whole dataset (sentinel value).
    OverallIndia,
    /// Rows belonging to one specific state.
    State(String),
}

impl Scope {
    /// The label shown in the UI and used on the wire.
    pub fn label(&self) -> &str {
        match self {
            Scope::OverallIndia => OVERALL_SCOPE,
            Scope::State(name) => name,
        }
    }

    pub fn is_overall(&self) -> bool {
        matches!(self, Scope::OverallIndia)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::OverallIndia
    }
}

impl From<String> for Scope {
    fn from(label: String) -> Self {
        if label == OVERALL_SCOPE {
            Scope::OverallIndia
        } else {
            Scope::State(label)
        }
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.label().to_string()
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The five supported chart modes.
///
/// A closed enum rather than a lookup table: adding or removing a mode is a
/// compile-time-checked change in the dispatcher's exhaustive match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartMode {
    GeoScatter,
    Bar,
    Scatter,
    Choropleth,
    Trend,
}

impl ChartMode {
    /// Stem used for export filenames, e.g. `india_geo_scatter.png`.
    pub fn filename_stem(&self) -> &'static str {
        match self {
            ChartMode::GeoScatter => "geo_scatter",
            ChartMode::Bar => "bar_chart",
            ChartMode::Scatter => "scatter_plot",
            ChartMode::Choropleth => "choropleth",
            ChartMode::Trend => "trend",
        }
    }
}

impl std::fmt::Display for ChartMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartMode::GeoScatter => "geo-scatter",
            ChartMode::Bar => "bar",
            ChartMode::Scatter => "scatter",
            ChartMode::Choropleth => "choropleth",
            ChartMode::Trend => "trend",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_round_trip_sentinel() {
        let scope = Scope::from(OVERALL_SCOPE.to_string());
        assert_eq!(scope, Scope::OverallIndia);
        assert_eq!(String::from(scope), OVERALL_SCOPE);
    }

    #[test]
    fn test_scope_round_trip_state() {
        let scope = Scope::from("Kerala".to_string());
        assert_eq!(scope, Scope::State("Kerala".to_string()));
        assert_eq!(scope.label(), "Kerala");
        assert!(!scope.is_overall());
    }

    #[test]
    fn test_scope_serde_as_plain_string() {
        let json = serde_json::to_string(&Scope::OverallIndia).unwrap();
        assert_eq!(json, format!("\"{}\"", OVERALL_SCOPE));

        let parsed: Scope = serde_json::from_str("\"Punjab\"").unwrap();
        assert_eq!(parsed, Scope::State("Punjab".to_string()));
    }

    #[test]
    fn test_chart_mode_serde_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ChartMode::GeoScatter).unwrap(),
            "\"geo-scatter\""
        );
        let parsed: ChartMode = serde_json::from_str("\"choropleth\"").unwrap();
        assert_eq!(parsed, ChartMode::Choropleth);
    }

    #[test]
    fn test_chart_mode_filename_stems_unique() {
        let stems = [
            ChartMode::GeoScatter.filename_stem(),
            ChartMode::Bar.filename_stem(),
            ChartMode::Scatter.filename_stem(),
            ChartMode::Choropleth.filename_stem(),
            ChartMode::Trend.filename_stem(),
        ];
        let unique: std::collections::HashSet<_> = stems.iter().collect();
        assert_eq!(unique.len(), stems.len());
    }
}
