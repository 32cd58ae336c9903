use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::JobStatus;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub queued: usize,
    pub processing: usize,
    pub available_permits: usize,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let queued = state.job_repository.list_by_status(JobStatus::Queued).await;
    let processing = state
        .job_repository
        .list_by_status(JobStatus::Processing)
        .await;

    match (queued, processing) {
        (Ok(queued), Ok(processing)) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                queued: queued.len(),
                processing: processing.len(),
                available_permits: state.gate.available_permits(),
            }),
        ),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Health check could not read the job store");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    queued: 0,
                    processing: 0,
                    available_permits: state.gate.available_permits(),
                }),
            )
        }
    }
}
