//! Geo-scatter service: every district plotted at its coordinates, with
//! point size encoding the primary measure and point color the secondary.

use serde::{Deserialize, Serialize};

use crate::api::Scope;
use crate::data::table::Table;

use super::dispatch::ChartError;

/// Map zoom for the whole-dataset view.
pub const OVERALL_ZOOM: f64 = 4.0;
/// Tighter zoom used when the scope is a single state.
pub const STATE_ZOOM: f64 = 6.0;

// Fallback view box when no row has both measures present (roughly the
// India bounding box, matching the default map extent of the frontend).
const DEFAULT_LAT_RANGE: (f64, f64) = (6.0, 37.0);
const DEFAULT_LON_RANGE: (f64, f64) = (68.0, 98.0);

/// One plotted district.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub state: String,
    /// Hover name shown on the map.
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Primary measure value (encoded as point size).
    pub size: f64,
    /// Secondary measure value (encoded as point color).
    pub color: f64,
}

/// Complete geo-scatter figure data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoScatterData {
    pub points: Vec<GeoPoint>,
    /// Measure encoded as point size.
    pub primary: String,
    /// Measure encoded as point color.
    pub secondary: String,
    pub zoom: f64,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    /// Rows in the scoped table.
    pub total_count: usize,
    /// Rows dropped because either measure was missing.
    pub skipped_count: usize,
}

/// Compute geo-scatter data from an already scope-filtered table.
pub fn compute_geo_scatter_data(
    table: &Table,
    scope: &Scope,
    primary: &str,
    secondary: &str,
) -> Result<GeoScatterData, ChartError> {
    table.require_measure(primary)?;
    table.require_measure(secondary)?;

    let total_count = table.len();
    let mut points = Vec::new();
    for record in table.rows() {
        let (size, color) = match (record.measure(primary), record.measure(secondary)) {
            (Some(size), Some(color)) => (size, color),
            _ => continue,
        };
        points.push(GeoPoint {
            state: record.state.clone(),
            district: record.district.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            size,
            color,
        });
    }
    let skipped_count = total_count - points.len();

    let (lat_min, lat_max, lon_min, lon_max) = if points.is_empty() {
        (
            DEFAULT_LAT_RANGE.0,
            DEFAULT_LAT_RANGE.1,
            DEFAULT_LON_RANGE.0,
            DEFAULT_LON_RANGE.1,
        )
    } else {
        let mut lat_min = f64::MAX;
        let mut lat_max = f64::MIN;
        let mut lon_min = f64::MAX;
        let mut lon_max = f64::MIN;
        for p in &points {
            lat_min = lat_min.min(p.latitude);
            lat_max = lat_max.max(p.latitude);
            lon_min = lon_min.min(p.longitude);
            lon_max = lon_max.max(p.longitude);
        }
        (lat_min, lat_max, lon_min, lon_max)
    };

    let zoom = if scope.is_overall() {
        OVERALL_ZOOM
    } else {
        STATE_ZOOM
    };

    Ok(GeoScatterData {
        points,
        primary: primary.to_string(),
        secondary: secondary.to_string(),
        zoom,
        lat_min,
        lat_max,
        lon_min,
        lon_max,
        total_count,
        skipped_count,
    })
}
