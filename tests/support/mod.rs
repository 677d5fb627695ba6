//! Shared fixtures for integration tests: a small three-state dataset and a
//! matching boundary collection.

use idv_rust::api::BoundarySet;
use idv_rust::data::{loader, Table};

/// Three states, eight districts, one missing SexRatio cell.
pub const SAMPLE_CSV: &str = "\
State,District,Latitude,Longitude,Population,Literacy,SexRatio
Kerala,Ernakulam,9.98,76.28,3282388,95.9,1028
Kerala,Kollam,8.88,76.59,2635375,94.1,1113
Kerala,Thrissur,10.52,76.21,3121200,95.1,1108
Punjab,Amritsar,31.63,74.87,2490656,76.3,
Punjab,Ludhiana,30.90,75.85,3498739,82.2,873
Maharashtra,Mumbai,19.08,72.88,12442373,89.2,832
Maharashtra,Pune,18.52,73.86,9429408,86.2,915
Maharashtra,Nagpur,21.15,79.09,4653570,88.4,951
";

pub fn sample_table() -> Table {
    loader::read_table(SAMPLE_CSV.as_bytes()).expect("fixture CSV must parse")
}

/// FeatureCollection with one polygon per fixture state, keyed by `ST_NM`.
pub fn sample_geojson() -> String {
    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ST_NM": "Kerala" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[76.0, 8.0], [77.0, 8.0], [77.0, 12.0], [76.0, 8.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ST_NM": "Punjab" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[74.0, 30.0], [76.0, 30.0], [76.0, 32.0], [74.0, 30.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ST_NM": "Maharashtra" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[72.0, 18.0], [80.0, 18.0], [80.0, 22.0], [72.0, 18.0]]]
                    ]
                }
            }
        ]
    })
    .to_string()
}

pub fn sample_boundaries() -> BoundarySet {
    BoundarySet::from_geojson_str(&sample_geojson(), "ST_NM").expect("fixture GeoJSON must parse")
}
