use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::JobServiceError;
use crate::domain::JobId;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by handlers; renders as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// A path segment that is not a job id names no job.
    pub fn unknown_job(raw: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("job not found: {}", raw))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JobServiceError> for ApiError {
    fn from(err: JobServiceError) -> Self {
        let status = match &err {
            JobServiceError::UnsupportedFormat(_)
            | JobServiceError::ResolutionOutOfRange { .. }
            | JobServiceError::NotCompleted { .. } => StatusCode::BAD_REQUEST,
            JobServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            JobServiceError::QueueUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            JobServiceError::Repository(_) | JobServiceError::Staging(_) => {
                tracing::error!(error = %err, "Job service failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn parse_job_id(raw: &str) -> Result<JobId, ApiError> {
    JobId::parse(raw).ok_or_else(|| ApiError::unknown_job(raw))
}
