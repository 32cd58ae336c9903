use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Job, JobId, JobState, JobStatus};

use super::RepositoryError;

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Inserts a new job; fails if the id is already present.
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    /// Inserts or overwrites a job.
    async fn replace(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn update_state(&self, id: JobId, state: JobState) -> Result<(), RepositoryError>;

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError>;

    /// Removes terminal jobs last updated before `cutoff`, returning how many went.
    async fn evict_terminal_before(&self, cutoff: DateTime<Utc>) -> Result<usize, RepositoryError>;
}
