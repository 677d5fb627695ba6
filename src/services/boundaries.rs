//! State boundary provider for the choropleth mode.
//!
//! Boundaries come from an externally hosted GeoJSON FeatureCollection keyed
//! by a state-name property. The collection is fetched once on first use and
//! cached for the process lifetime.

use std::collections::BTreeMap;
use std::sync::Arc;

use geojson::{GeoJson, Value};
use log::warn;
use parking_lot::Mutex;

use super::dispatch::ChartError;

/// Feature property holding the state name in the common India-states
/// GeoJSON distributions.
pub const DEFAULT_NAME_PROPERTY: &str = "ST_NM";

/// Boundary polygons keyed by state name.
///
/// Each region is a list of rings; each ring a list of `[longitude,
/// latitude]` positions.
#[derive(Debug, Clone)]
pub struct BoundarySet {
    regions: BTreeMap<String, Vec<Vec<[f64; 2]>>>,
}

impl BoundarySet {
    /// Parse a GeoJSON FeatureCollection, keying each feature by
    /// `name_property`. Features without the property or without polygon
    /// geometry are skipped with a warning.
    pub fn from_geojson_str(raw: &str, name_property: &str) -> Result<Self, ChartError> {
        let geojson: GeoJson = raw.parse().map_err(|e| {
            ChartError::Construction(format!("invalid boundary GeoJSON: {}", e))
        })?;

        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => {
                return Err(ChartError::Construction(
                    "boundary GeoJSON must be a FeatureCollection".to_string(),
                ))
            }
        };

        let mut regions = BTreeMap::new();
        for feature in collection.features {
            let name = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(name_property))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            let Some(name) = name else {
                warn!("Boundary feature without {:?} property, skipping", name_property);
                continue;
            };

            let Some(geometry) = feature.geometry else {
                warn!("Boundary feature {:?} has no geometry, skipping", name);
                continue;
            };

            let rings = match geometry.value {
                Value::Polygon(polygon) => polygon_rings(&polygon),
                Value::MultiPolygon(multi) => {
                    multi.iter().flat_map(|p| polygon_rings(p)).collect()
                }
                other => {
                    warn!(
                        "Boundary feature {:?} has unsupported geometry {:?}, skipping",
                        name,
                        other.type_name()
                    );
                    continue;
                }
            };

            regions.insert(name, rings);
        }

        Ok(Self { regions })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.regions.contains_key(name)
    }

    pub fn rings(&self, name: &str) -> Option<&Vec<Vec<[f64; 2]>>> {
        self.regions.get(name)
    }

    /// Regions in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Vec<[f64; 2]>>)> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Exterior ring of each polygon; interior holes are not rendered.
fn polygon_rings(polygon: &[Vec<Vec<f64>>]) -> Vec<Vec<[f64; 2]>> {
    polygon
        .first()
        .map(|ring| {
            vec![ring
                .iter()
                .filter(|pos| pos.len() >= 2)
                .map(|pos| [pos[0], pos[1]])
                .collect::<Vec<[f64; 2]>>()]
        })
        .unwrap_or_default()
}

/// Fetch and parse the boundary collection from its URL.
pub async fn fetch_boundaries(
    url: &str,
    name_property: &str,
) -> Result<BoundarySet, ChartError> {
    let response = reqwest::get(url).await.map_err(|e| {
        ChartError::Construction(format!("failed to fetch boundaries from {}: {}", url, e))
    })?;
    let body = response.text().await.map_err(|e| {
        ChartError::Construction(format!("failed to read boundary response: {}", e))
    })?;
    BoundarySet::from_geojson_str(&body, name_property)
}

/// Process-wide cache around [`fetch_boundaries`]: the collection is
/// downloaded at most once and shared by reference afterwards.
#[derive(Debug, Default)]
pub struct BoundaryCache {
    cached: Mutex<Option<Arc<BoundarySet>>>,
}

impl BoundaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached boundary set, fetching it on first use.
    pub async fn get_or_fetch(
        &self,
        url: &str,
        name_property: &str,
    ) -> Result<Arc<BoundarySet>, ChartError> {
        if let Some(cached) = self.cached.lock().clone() {
            return Ok(cached);
        }

        // The fetch happens outside the lock; a concurrent first request may
        // fetch twice, the second result simply replaces the first.
        let fetched = Arc::new(fetch_boundaries(url, name_property).await?);
        *self.cached.lock() = Some(Arc::clone(&fetched));
        Ok(fetched)
    }

    /// Seed the cache directly, bypassing the fetch. Used by tests and by
    /// deployments shipping a bundled boundary file.
    pub fn seed(&self, boundaries: BoundarySet) -> Arc<BoundarySet> {
        let arc = Arc::new(boundaries);
        *self.cached.lock() = Some(Arc::clone(&arc));
        arc
    }
}
