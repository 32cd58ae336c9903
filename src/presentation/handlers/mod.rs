mod compare;
mod error;
mod health;
mod job_status;
mod upload;
mod voxels;

pub use compare::{CompareResponse, compare_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::{HealthResponse, health_handler};
pub use job_status::{JobStatusResponse, job_status_handler};
pub use upload::{UploadParams, UploadResponse, upload_handler};
pub use voxels::voxels_handler;
