mod admission_gate;
mod job_retention;
mod job_service;
mod processing_worker;
mod voxel_diff;

pub use admission_gate::{AdmissionGate, AdmissionPermit, GateClosed};
pub use job_retention::{evict_expired_jobs, spawn_retention_sweeper};
pub use job_service::{ComparisonOutcome, JobServiceError, ResolutionLimits, VoxelJobService};
pub use processing_worker::{ProcessingError, ProcessingMessage, ProcessingWorker};
pub use voxel_diff::{DEBRIS_COLOR, IMPACT_COLOR, SpatialKey, compare_voxel_sets, spatial_key};
