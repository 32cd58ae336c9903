mod job_repository;
mod repository_error;
mod staging_store;
mod voxelizer;

pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
pub use staging_store::{StagingStore, StagingStoreError};
pub use voxelizer::{VoxelizeError, Voxelizer};
