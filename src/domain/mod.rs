mod job;
mod job_id;
mod job_status;
mod source_format;
mod storage_path;
mod voxel;

pub use job::{InvalidTransition, Job, JobOrigin, JobState};
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use source_format::{SourceFormat, SourceKind, UnsupportedFormat};
pub use storage_path::StoragePath;
pub use voxel::{DiffMetrics, Rgb, Voxel, VoxelSet, VoxelStatus};
