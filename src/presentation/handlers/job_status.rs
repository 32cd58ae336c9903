use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use super::error::{ApiError, parse_job_id};
use crate::domain::{Job, JobOrigin};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub status: String,
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compared: Option<[String; 2]>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Job> for JobStatusResponse {
    fn from(job: &Job) -> Self {
        let compared = match &job.origin {
            JobOrigin::Comparison { baseline, damaged } => {
                Some([baseline.to_string(), damaged.to_string()])
            }
            JobOrigin::Upload { .. } => None,
        };
        Self {
            id: job.id.to_string(),
            status: job.status().as_str().to_string(),
            filename: job.filename().map(str::to_string),
            error: job.error_message().map(str::to_string),
            compared,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let id = parse_job_id(&job_id)?;
    let job = state.job_service.status(id).await?;
    Ok(Json(JobStatusResponse::from(&job)))
}
