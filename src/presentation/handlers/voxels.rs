use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};

use super::error::{ApiError, parse_job_id};
use crate::domain::VoxelSet;
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn voxels_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Arc<VoxelSet>>, ApiError> {
    let id = parse_job_id(&job_id)?;
    let voxels = state.job_service.result(id).await?;
    tracing::debug!(voxels = voxels.len(), "Serving voxel set");
    Ok(Json(voxels))
}
