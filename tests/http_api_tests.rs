//! Functional tests for the HTTP handlers.
//!
//! Handlers are invoked directly with application state, exercising the
//! same code paths as the router without binding a socket.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use idv_rust::api::{AggregateFn, ChartMode, ChartRequest, Figure, Scope};
use idv_rust::http::dto::ExportQuery;
use idv_rust::http::error::AppError;
use idv_rust::http::{handlers, AppState};

use support::{sample_boundaries, sample_table};

fn app_state() -> AppState {
    AppState::new(Arc::new(sample_table()))
}

/// State with the boundary cache pre-seeded so choropleth requests never
/// touch the network.
fn app_state_with_boundaries() -> AppState {
    let state = app_state();
    state.boundaries.seed(sample_boundaries());
    state
}

fn chart_request(mode: ChartMode) -> ChartRequest {
    ChartRequest {
        mode,
        scope: Scope::OverallIndia,
        primary: "Population".to_string(),
        secondary: Some("Literacy".to_string()),
        aggregate: None,
        top_n: None,
    }
}

#[tokio::test]
async fn test_health_reports_dataset() {
    let response = handlers::health_check(State(app_state())).await.unwrap();
    assert_eq!(response.0.status, "ok");
    assert_eq!(response.0.version, "v1");
    assert_eq!(response.0.dataset_rows, 8);
}

#[tokio::test]
async fn test_schema_endpoint_lists_scopes_and_measures() {
    let response = handlers::get_schema(State(app_state())).await.unwrap();
    assert_eq!(response.0.scopes[0], "Overall India");
    assert_eq!(
        &response.0.scopes[1..],
        ["Kerala", "Maharashtra", "Punjab"]
    );
    assert_eq!(
        response.0.measure_columns,
        vec!["Literacy", "Population", "SexRatio"]
    );
    assert_eq!(response.0.row_count, 8);
}

#[tokio::test]
async fn test_charts_endpoint_builds_bar_figure() {
    let mut request = chart_request(ChartMode::Bar);
    request.aggregate = Some(AggregateFn::Mean);
    request.top_n = Some(2);

    let response = handlers::build_chart(State(app_state()), Json(request))
        .await
        .unwrap();
    let Figure::Bar(data) = response.0 else {
        panic!("expected bar figure");
    };
    assert_eq!(data.aggregate_fn, AggregateFn::Mean);
    assert_eq!(data.bars.len(), 2);
}

#[tokio::test]
async fn test_charts_endpoint_serves_choropleth_from_seeded_cache() {
    let state = app_state_with_boundaries();
    let response = handlers::build_chart(State(state), Json(chart_request(ChartMode::Choropleth)))
        .await
        .unwrap();
    let Figure::Choropleth(data) = response.0 else {
        panic!("expected choropleth figure");
    };
    assert_eq!(data.regions.len(), 3);
    assert!(data.unmatched_states.is_empty());
}

#[tokio::test]
async fn test_invalid_scope_maps_to_bad_request() {
    let mut request = chart_request(ChartMode::Scatter);
    request.scope = Scope::State("Atlantis".to_string());

    let err = handlers::build_chart(State(app_state()), Json(request))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_degenerate_trend_maps_to_unprocessable() {
    // Single-district dataset cannot support a regression.
    let csv = "State,District,Latitude,Longitude,A,B\nKerala,Ernakulam,9.98,76.28,1,2\n";
    let table = idv_rust::data::loader::read_table(csv.as_bytes()).unwrap();
    let state = AppState::new(Arc::new(table));

    let mut request = chart_request(ChartMode::Trend);
    request.primary = "A".to_string();
    request.secondary = Some("B".to_string());

    let err = handlers::build_chart(State(state), Json(request))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unprocessable(_)));
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_export_endpoint_returns_png_attachment() {
    let query = ExportQuery {
        width: Some(320),
        height: Some(200),
    };
    let response = handlers::export_chart(
        State(app_state()),
        Query(query),
        Json(chart_request(ChartMode::Bar)),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type, "image/png");
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("india_bar_chart.png"));
}

#[tokio::test]
async fn test_export_endpoint_falls_back_to_svg() {
    let query = ExportQuery {
        width: Some(0),
        height: Some(0),
    };
    let response = handlers::export_chart(
        State(app_state()),
        Query(query),
        Json(chart_request(ChartMode::Scatter)),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
    assert_eq!(content_type, "image/svg+xml");
}

#[tokio::test]
async fn test_export_endpoint_rejects_oversized_dimensions() {
    // Query-supplied dimensions are bounded before any buffer is allocated.
    let query = ExportQuery {
        width: Some(70_000),
        height: Some(70_000),
    };
    let err = handlers::export_chart(
        State(app_state()),
        Query(query),
        Json(chart_request(ChartMode::Bar)),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Unprocessable(_)));
    let response = err.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_summary_endpoint() {
    let response = handlers::get_summary(State(app_state())).await.unwrap();
    assert_eq!(response.0.row_count, 8);
    assert_eq!(response.0.missing.len(), 1);
    assert_eq!(response.0.correlation.columns.len(), 3);
}
