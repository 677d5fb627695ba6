//! Application state for the HTTP server.

use std::env;
use std::sync::Arc;

use crate::data::table::Table;
use crate::services::boundaries::{BoundaryCache, DEFAULT_NAME_PROPERTY};

/// Environment variable overriding the boundary GeoJSON URL.
pub const BOUNDARIES_URL_ENV: &str = "IDV_BOUNDARIES_URL";

/// Hosted India states FeatureCollection keyed by `ST_NM`.
pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://gist.githubusercontent.com/jbrobst/56c13bbbf9d97d187fea01ca62ea5112/raw/e388c4cae20aa53cb5090210a42ebb9b765c0a36/india_states.geojson";

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The loaded dataset, shared read-only across requests.
    pub table: Arc<Table>,
    /// Lazily fetched state boundary collection.
    pub boundaries: Arc<BoundaryCache>,
    pub boundaries_url: String,
    /// Feature property carrying the state name.
    pub name_property: String,
}

impl AppState {
    /// Create a new application state over the given dataset. The boundary
    /// URL comes from `IDV_BOUNDARIES_URL` when set.
    pub fn new(table: Arc<Table>) -> Self {
        let boundaries_url =
            env::var(BOUNDARIES_URL_ENV).unwrap_or_else(|_| DEFAULT_BOUNDARIES_URL.to_string());
        Self {
            table,
            boundaries: Arc::new(BoundaryCache::new()),
            boundaries_url,
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}
