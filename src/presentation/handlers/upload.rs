use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::presentation::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    pub resolution: Option<u32>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub job_id: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let field = match multipart.next_field().await {
        Ok(Some(f)) => f,
        Ok(None) => {
            tracing::warn!("Upload request with no file");
            return Err(ApiError::bad_request("No file uploaded"));
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read multipart");
            return Err(ApiError::bad_request(format!(
                "Failed to read multipart: {}",
                e
            )));
        }
    };

    let filename = field.file_name().unwrap_or("unknown").to_string();
    tracing::debug!(filename = %filename, "Processing file upload");

    let data = field.bytes().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read file bytes");
        ApiError::bad_request(format!("Failed to read file: {}", e))
    })?;

    let job_id = state
        .job_service
        .submit(&filename, data, params.resolution)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadResponse {
            job_id: job_id.to_string(),
        }),
    ))
}
