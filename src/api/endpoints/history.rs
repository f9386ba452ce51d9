//! History endpoints.
//!
//! - `GET /api/predictions/history` — paged prediction summaries
//! - `GET /api/predictions/stats` — aggregate prediction statistics
//! - `GET /api/predictions/:id` — one stored prediction
//! - `GET /api/reports/history` — paged report summaries

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, PageQuery};
use crate::history::{
    normalize_paging, Page, PredictionRecord, PredictionStats, PredictionSummary, ReportSummary,
};

pub async fn predictions(
    State(ctx): State<ApiContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<PredictionSummary>>, ApiError> {
    let (page, page_size) = normalize_paging(query.page, query.page_size);
    Ok(Json(ctx.history.prediction_page(page, page_size)?))
}

pub async fn prediction_detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid prediction id: {id}")))?;
    ctx.history
        .prediction(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Prediction {id}")))
}

pub async fn stats(State(ctx): State<ApiContext>) -> Result<Json<PredictionStats>, ApiError> {
    Ok(Json(ctx.history.prediction_stats()?))
}

pub async fn reports(
    State(ctx): State<ApiContext>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ReportSummary>>, ApiError> {
    let (page, page_size) = normalize_paging(query.page, query.page_size);
    Ok(Json(ctx.history.report_page(page, page_size)?))
}
