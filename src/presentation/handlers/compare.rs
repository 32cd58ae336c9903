use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use super::error::{ApiError, parse_job_id};
use crate::domain::DiffMetrics;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct CompareResponse {
    pub comparison_id: String,
    pub metrics: DiffMetrics,
}

#[tracing::instrument(skip(state))]
pub async fn compare_handler(
    State(state): State<AppState>,
    Path((baseline, damaged)): Path<(String, String)>,
) -> Result<Json<CompareResponse>, ApiError> {
    let baseline = parse_job_id(&baseline)?;
    let damaged = parse_job_id(&damaged)?;
    let outcome = state.job_service.compare(baseline, damaged).await?;

    Ok(Json(CompareResponse {
        comparison_id: outcome.comparison_id.to_string(),
        metrics: outcome.metrics,
    }))
}
