//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for the actual computation.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{ExportQuery, HealthResponse, SchemaResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{ChartMode, ChartRequest, Figure, SummaryData};
use crate::data::schema;
use crate::export::{self, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::services;
use crate::services::boundaries::BoundarySet;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running and the dataset
/// is loaded.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        dataset_rows: state.table.len(),
    }))
}

/// GET /v1/schema
///
/// Scope options and measure columns for populating selection controls.
pub async fn get_schema(State(state): State<AppState>) -> HandlerResult<SchemaResponse> {
    Ok(Json(SchemaResponse {
        scopes: schema::scope_options(&state.table),
        measure_columns: schema::measure_columns(&state.table),
        row_count: state.table.len(),
    }))
}

/// POST /v1/charts
///
/// Build the figure for the given selection parameters.
pub async fn build_chart(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> HandlerResult<Figure> {
    let boundaries = boundaries_for(&state, &request).await?;
    let figure = services::build_chart(&state.table, boundaries.as_deref(), &request)?;
    Ok(Json(figure))
}

/// POST /v1/charts/export
///
/// Build the figure and serialize it to image bytes. Responds with the
/// image body, its content type, and a download filename.
pub async fn export_chart(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
    Json(request): Json<ChartRequest>,
) -> Result<Response, AppError> {
    let boundaries = boundaries_for(&state, &request).await?;
    let figure = services::build_chart(&state.table, boundaries.as_deref(), &request)?;

    let width = query.width.unwrap_or(DEFAULT_WIDTH);
    let height = query.height.unwrap_or(DEFAULT_HEIGHT);

    // Rasterization is CPU-bound; keep it off the async workers.
    let image = tokio::task::spawn_blocking(move || export::export_with_size(&figure, width, height))
        .await
        .map_err(|e| AppError::Internal(format!("export task failed: {}", e)))??;

    let filename = format!(
        "india_{}.{}",
        request.mode.filename_stem(),
        image.format.extension()
    );
    let headers = [
        (header::CONTENT_TYPE, image.format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, image.bytes).into_response())
}

/// GET /v1/summary
///
/// Descriptive statistics, preview, missing counts, and correlation matrix
/// over the whole dataset.
pub async fn get_summary(State(state): State<AppState>) -> HandlerResult<SummaryData> {
    Ok(Json(services::compute_summary_data(&state.table)))
}

/// Boundary collection for the request, fetched lazily and only for the
/// mode that needs it.
async fn boundaries_for(
    state: &AppState,
    request: &ChartRequest,
) -> Result<Option<Arc<BoundarySet>>, AppError> {
    if request.mode != ChartMode::Choropleth {
        return Ok(None);
    }
    let boundaries = state
        .boundaries
        .get_or_fetch(&state.boundaries_url, &state.name_property)
        .await?;
    Ok(Some(boundaries))
}
