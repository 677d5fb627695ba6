//! Choropleth service: one fill region per state, colored by the mean of
//! the chosen measure.
//!
//! State names in the table must match the boundary collection's name key
//! exactly; a mismatch leaves the region unfilled and is reported, never
//! fatal.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::table::Table;

use super::boundaries::BoundarySet;
use super::dispatch::ChartError;

/// One boundary region with its fill value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoroplethRegion {
    pub state: String,
    /// Mean of the measure for this state; `None` renders unfilled.
    pub value: Option<f64>,
    /// Boundary rings as `[longitude, latitude]` positions.
    pub rings: Vec<Vec<[f64; 2]>>,
}

/// Complete choropleth figure data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoroplethData {
    /// Measure whose per-state mean drives the fill color.
    pub measure: String,
    /// Regions in ascending state-name order.
    pub regions: Vec<ChoroplethRegion>,
    /// Table states with no matching boundary feature.
    pub unmatched_states: Vec<String>,
    /// Fill value range over the matched regions, when any region has data.
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
}

/// Compute choropleth data: mean of `measure` per state, joined against the
/// boundary collection by state name.
pub fn compute_choropleth_data(
    table: &Table,
    boundaries: &BoundarySet,
    measure: &str,
) -> Result<ChoroplethData, ChartError> {
    table.require_measure(measure)?;

    let means = state_means(table, measure);

    let mut regions = Vec::new();
    let mut value_min: Option<f64> = None;
    let mut value_max: Option<f64> = None;
    for (state, rings) in boundaries.iter() {
        let value = means.get(state).copied().flatten();
        if let Some(v) = value {
            value_min = Some(value_min.map_or(v, |m| m.min(v)));
            value_max = Some(value_max.map_or(v, |m| m.max(v)));
        }
        regions.push(ChoroplethRegion {
            state: state.clone(),
            value,
            rings: rings.clone(),
        });
    }

    let unmatched_states: Vec<String> = means
        .keys()
        .filter(|state| !boundaries.contains(state))
        .cloned()
        .collect();
    for state in &unmatched_states {
        warn!("State {:?} has no boundary feature; region left unfilled", state);
    }

    Ok(ChoroplethData {
        measure: measure.to_string(),
        regions,
        unmatched_states,
        value_min,
        value_max,
    })
}

/// Mean of one measure per state, missing values ignored. A state whose
/// values are all missing maps to `None`.
fn state_means(table: &Table, measure: &str) -> BTreeMap<String, Option<f64>> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    let mut seen: BTreeMap<String, ()> = BTreeMap::new();
    for record in table.rows() {
        seen.insert(record.state.clone(), ());
        if let Some(value) = record.measure(measure) {
            let entry = sums.entry(record.state.clone()).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }

    seen.into_keys()
        .map(|state| {
            let mean = sums.get(&state).map(|(sum, count)| sum / *count as f64);
            (state, mean)
        })
        .collect()
}
