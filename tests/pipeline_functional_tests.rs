//! Functional tests for the full analytics pipeline.
//!
//! These tests exercise the complete flow from CSV ingestion through scope
//! filtering, aggregation, and chart dispatch to image export, validating
//! end-to-end behavior over a realistic fixture.

mod support;

use std::io::Write;

use idv_rust::api::{AggregateFn, ChartMode, ChartRequest, Figure, GroupKey, Scope};
use idv_rust::data::aggregate::aggregate;
use idv_rust::data::error::DataError;
use idv_rust::data::filter::filter_scope;
use idv_rust::data::{loader, schema, Table};
use idv_rust::export::{export_with_size, ImageFormat};
use idv_rust::services::dispatch::{build_chart, ChartError};
use idv_rust::services::compute_summary_data;

use support::{sample_boundaries, sample_table, SAMPLE_CSV};

fn request(mode: ChartMode) -> ChartRequest {
    ChartRequest {
        mode,
        scope: Scope::OverallIndia,
        primary: "Population".to_string(),
        secondary: Some("Literacy".to_string()),
        aggregate: None,
        top_n: None,
    }
}

// =========================================================
// Loading and Schema
// =========================================================

#[test]
fn test_load_from_disk_and_inspect_schema() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
    let table = loader::load_table(file.path()).unwrap();

    assert_eq!(table.len(), 8);
    assert_eq!(
        schema::measure_columns(&table),
        vec!["Literacy", "Population", "SexRatio"]
    );
    assert_eq!(
        schema::distinct_states(&table),
        vec!["Kerala", "Maharashtra", "Punjab"]
    );

    // Scope options: sentinel first, then states in ascending order.
    let scopes = schema::scope_options(&table);
    assert_eq!(scopes[0], "Overall India");
    assert_eq!(&scopes[1..], ["Kerala", "Maharashtra", "Punjab"]);
}

// =========================================================
// Scope Filtering
// =========================================================

#[test]
fn test_scope_filter_subset_and_order() {
    let table = sample_table();
    let scoped = filter_scope(&table, &Scope::State("Kerala".to_string())).unwrap();

    assert_eq!(scoped.len(), 3);
    assert!(scoped.rows().iter().all(|r| r.state == "Kerala"));
    // Input order is preserved.
    let districts: Vec<&str> = scoped.rows().iter().map(|r| r.district.as_str()).collect();
    assert_eq!(districts, vec!["Ernakulam", "Kollam", "Thrissur"]);
}

#[test]
fn test_overall_scope_is_identity() {
    let table = sample_table();
    let scoped = filter_scope(&table, &Scope::OverallIndia).unwrap();
    assert_eq!(scoped.len(), table.len());
}

#[test]
fn test_unknown_state_is_rejected() {
    let table = sample_table();
    let err = filter_scope(&table, &Scope::State("Atlantis".to_string())).unwrap_err();
    assert!(matches!(err, DataError::InvalidScope(_)));
}

// =========================================================
// Aggregation
// =========================================================

#[test]
fn test_state_aggregation_ranks_descending() {
    let table = sample_table();
    let result = aggregate(
        &table,
        GroupKey::State,
        &["Population".to_string()],
        AggregateFn::Sum,
        "Population",
        10,
    )
    .unwrap();

    let names: Vec<&str> = result.rows.iter().map(|r| r.group.as_str()).collect();
    // Maharashtra (26.5M) > Kerala (9.0M) > Punjab (6.0M).
    assert_eq!(names, vec!["Maharashtra", "Kerala", "Punjab"]);
}

#[test]
fn test_top_n_truncates_after_ranking() {
    let table = sample_table();
    let result = aggregate(
        &table,
        GroupKey::State,
        &["Population".to_string()],
        AggregateFn::Sum,
        "Population",
        1,
    )
    .unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].group, "Maharashtra");
}

#[test]
fn test_top_n_out_of_range_is_rejected() {
    let table = sample_table();
    for bad in [0, 51] {
        let err = aggregate(
            &table,
            GroupKey::State,
            &["Population".to_string()],
            AggregateFn::Sum,
            "Population",
            bad,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::InvalidParameter(_)));
    }
}

#[test]
fn test_tied_ranks_break_by_ascending_name() {
    let csv = "\
State,District,Latitude,Longitude,Metric
Beta,b1,0.0,0.0,100
Alpha,a1,0.0,0.0,100
Gamma,g1,0.0,0.0,200
";
    let table = loader::read_table(csv.as_bytes()).unwrap();
    let result = aggregate(
        &table,
        GroupKey::State,
        &["Metric".to_string()],
        AggregateFn::Sum,
        "Metric",
        10,
    )
    .unwrap();
    let names: Vec<&str> = result.rows.iter().map(|r| r.group.as_str()).collect();
    assert_eq!(names, vec!["Gamma", "Alpha", "Beta"]);
}

#[test]
fn test_all_missing_group_aggregates_to_none() {
    let csv = "\
State,District,Latitude,Longitude,Metric
Alpha,a1,0.0,0.0,5
Beta,b1,0.0,0.0,
Beta,b2,0.0,0.0,
";
    let table = loader::read_table(csv.as_bytes()).unwrap();
    let result = aggregate(
        &table,
        GroupKey::State,
        &["Metric".to_string()],
        AggregateFn::Mean,
        "Metric",
        10,
    )
    .unwrap();

    let beta = result.rows.iter().find(|r| r.group == "Beta").unwrap();
    assert_eq!(beta.value("Metric"), None);
    // Missing aggregates sort after present ones.
    assert_eq!(result.rows.last().unwrap().group, "Beta");
}

// =========================================================
// Dispatch
// =========================================================

#[test]
fn test_every_mode_dispatches_from_loaded_csv() {
    let table = sample_table();
    let boundaries = sample_boundaries();

    for mode in [
        ChartMode::GeoScatter,
        ChartMode::Bar,
        ChartMode::Scatter,
        ChartMode::Choropleth,
        ChartMode::Trend,
    ] {
        let figure = build_chart(&table, Some(&boundaries), &request(mode)).unwrap();
        assert_eq!(figure.mode(), mode);
    }
}

#[test]
fn test_bar_defaults_applied_by_dispatcher() {
    let table = sample_table();
    let figure = build_chart(&table, None, &request(ChartMode::Bar)).unwrap();
    let Figure::Bar(data) = figure else {
        panic!("expected bar figure");
    };
    assert_eq!(data.aggregate_fn, AggregateFn::Sum);
    assert_eq!(data.group_key, GroupKey::State);
    assert_eq!(data.bars.len(), 3);
}

#[test]
fn test_state_scope_drills_down_to_districts() {
    let table = sample_table();
    let mut req = request(ChartMode::Bar);
    req.scope = Scope::State("Maharashtra".to_string());
    let Figure::Bar(data) = build_chart(&table, None, &req).unwrap() else {
        panic!("expected bar figure");
    };
    assert_eq!(data.group_key, GroupKey::District);
    assert_eq!(data.bars[0].name, "Mumbai");
}

#[test]
fn test_trend_ignores_scope() {
    let table = sample_table();
    let mut req = request(ChartMode::Trend);
    req.scope = Scope::State("Kerala".to_string());
    let Figure::Trend(data) = build_chart(&table, None, &req).unwrap() else {
        panic!("expected trend figure");
    };
    // All eight rows have both Population and Literacy.
    assert_eq!(data.sample_count, 8);
}

#[test]
fn test_choropleth_join_and_unmatched_state() {
    let csv = format!("{}Sikkim,Gangtok,27.33,88.61,610577,81.4,890\n", SAMPLE_CSV);
    let table = loader::read_table(csv.as_bytes()).unwrap();
    let boundaries = sample_boundaries();

    let mut req = request(ChartMode::Choropleth);
    req.primary = "Literacy".to_string();
    let Figure::Choropleth(data) = build_chart(&table, Some(&boundaries), &req).unwrap() else {
        panic!("expected choropleth figure");
    };

    // Sikkim has data but no boundary: reported, not fatal.
    assert_eq!(data.unmatched_states, vec!["Sikkim"]);
    assert_eq!(data.regions.len(), 3);
    let kerala = data.regions.iter().find(|r| r.state == "Kerala").unwrap();
    let expected = (95.9 + 94.1 + 95.1) / 3.0;
    assert!((kerala.value.unwrap() - expected).abs() < 1e-9);
}

// =========================================================
// Export
// =========================================================

#[test]
fn test_export_produces_png_for_all_modes() {
    let table = sample_table();
    let boundaries = sample_boundaries();

    for mode in [
        ChartMode::GeoScatter,
        ChartMode::Bar,
        ChartMode::Scatter,
        ChartMode::Choropleth,
        ChartMode::Trend,
    ] {
        let figure = build_chart(&table, Some(&boundaries), &request(mode)).unwrap();
        let image = export_with_size(&figure, 320, 200).unwrap();
        assert_eq!(image.format, ImageFormat::Png, "mode {}", mode);
        assert_eq!(&image.bytes[..4], &[0x89, b'P', b'N', b'G']);
    }
}

#[test]
fn test_export_falls_back_to_svg_when_raster_fails() {
    let table = sample_table();
    let figure = build_chart(&table, None, &request(ChartMode::Scatter)).unwrap();

    let image = export_with_size(&figure, 0, 0).unwrap();
    assert_eq!(image.format, ImageFormat::Svg);
    assert!(String::from_utf8(image.bytes).unwrap().contains("<svg"));
}

// =========================================================
// Summary
// =========================================================

#[test]
fn test_summary_over_loaded_table() {
    let table = sample_table();
    let summary = compute_summary_data(&table);

    assert_eq!(summary.row_count, 8);
    assert_eq!(summary.missing.len(), 1);
    assert_eq!(summary.missing[0].column, "SexRatio");
    assert_eq!(summary.missing[0].missing, 1);

    let population = summary
        .columns
        .iter()
        .find(|c| c.column == "Population")
        .unwrap();
    assert_eq!(population.count, 8);
    assert_eq!(population.max, Some(12442373.0));
}

// =========================================================
// Error Paths
// =========================================================

#[test]
fn test_unknown_measure_fails_across_pipeline() {
    let table = sample_table();
    let mut req = request(ChartMode::GeoScatter);
    req.primary = "Gdp".to_string();
    let err = build_chart(&table, None, &req).unwrap_err();
    assert!(matches!(
        err,
        ChartError::Data(DataError::UnknownColumn(_))
    ));
}

#[test]
fn test_missing_dataset_file_is_terminal() {
    let err = loader::load_table("/no/such/dataset.csv").unwrap_err();
    assert!(matches!(err, DataError::Load { .. }));
}

#[test]
fn test_single_row_trend_is_recoverable() {
    let csv = "\
State,District,Latitude,Longitude,A,B
Kerala,Ernakulam,9.98,76.28,1,2
";
    let table: Table = loader::read_table(csv.as_bytes()).unwrap();
    let mut req = request(ChartMode::Trend);
    req.primary = "A".to_string();
    req.secondary = Some("B".to_string());
    let err = build_chart(&table, None, &req).unwrap_err();
    assert!(matches!(err, ChartError::Construction(_)));
}
