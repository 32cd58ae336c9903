use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, RepositoryError, StagingStore, StagingStoreError};
use crate::domain::{
    DiffMetrics, Job, JobId, JobState, JobStatus, SourceFormat, StoragePath, UnsupportedFormat,
    VoxelSet,
};

use super::processing_worker::ProcessingMessage;
use super::voxel_diff::compare_voxel_sets;

#[derive(Debug, Clone, Copy)]
pub struct ResolutionLimits {
    pub default_resolution: u32,
    pub max_resolution: u32,
}

impl Default for ResolutionLimits {
    fn default() -> Self {
        Self {
            default_resolution: 128,
            max_resolution: 256,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonOutcome {
    pub comparison_id: JobId,
    pub metrics: DiffMetrics,
}

/// Submission, lookup and comparison of voxelization jobs.
///
/// Submitting never waits for processing: the job is recorded as queued and
/// handed to the processing worker, and callers poll for its status.
pub struct VoxelJobService {
    job_repository: Arc<dyn JobRepository>,
    staging_store: Arc<dyn StagingStore>,
    sender: mpsc::Sender<ProcessingMessage>,
    limits: ResolutionLimits,
}

impl VoxelJobService {
    pub fn new(
        job_repository: Arc<dyn JobRepository>,
        staging_store: Arc<dyn StagingStore>,
        sender: mpsc::Sender<ProcessingMessage>,
        limits: ResolutionLimits,
    ) -> Self {
        Self {
            job_repository,
            staging_store,
            sender,
            limits,
        }
    }

    pub fn limits(&self) -> ResolutionLimits {
        self.limits
    }

    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn submit(
        &self,
        filename: &str,
        data: Bytes,
        resolution: Option<u32>,
    ) -> Result<JobId, JobServiceError> {
        let format = SourceFormat::from_filename(filename)?;
        let resolution = self.resolve_resolution(resolution)?;

        let job = Job::new(format, filename.to_string());
        let job_id = job.id;
        let storage_path = StoragePath::new(&job_id, format);

        let upload = stream::once(async move { Ok::<_, std::io::Error>(data) }).boxed();
        self.staging_store.store(&storage_path, upload).await?;

        if let Err(e) = self.job_repository.create(&job).await {
            self.discard_upload(&storage_path).await;
            return Err(e.into());
        }

        let msg = ProcessingMessage {
            job_id,
            format,
            storage_path: storage_path.clone(),
            resolution,
        };

        if self.sender.send(msg).await.is_err() {
            tracing::error!(job_id = %job_id, "Processing worker unavailable");
            let failed = JobState::Failed("processing worker unavailable".to_string());
            if let Err(e) = self.job_repository.update_state(job_id, failed).await {
                tracing::warn!(error = %e, job_id = %job_id, "Failed to mark job as failed");
            }
            self.discard_upload(&storage_path).await;
            return Err(JobServiceError::QueueUnavailable);
        }

        tracing::info!(job_id = %job_id, format = %format, resolution, "Voxelization job queued");
        Ok(job_id)
    }

    pub async fn status(&self, id: JobId) -> Result<Job, JobServiceError> {
        self.job_repository
            .get_by_id(id)
            .await?
            .ok_or(JobServiceError::NotFound(id))
    }

    pub async fn result(&self, id: JobId) -> Result<Arc<VoxelSet>, JobServiceError> {
        let job = self.status(id).await?;
        job.result()
            .cloned()
            .ok_or(JobServiceError::NotCompleted {
                id,
                status: job.status(),
            })
    }

    /// Diffs two completed jobs and stores the result as a completed pseudo-job.
    #[tracing::instrument(skip_all, fields(baseline = %baseline, damaged = %damaged))]
    pub async fn compare(
        &self,
        baseline: JobId,
        damaged: JobId,
    ) -> Result<ComparisonOutcome, JobServiceError> {
        let baseline_job = self.job_repository.get_by_id(baseline).await?;
        let damaged_job = self.job_repository.get_by_id(damaged).await?;

        let (baseline_job, damaged_job) = match (baseline_job, damaged_job) {
            (Some(a), Some(b)) => (a, b),
            (None, _) => return Err(JobServiceError::NotFound(baseline)),
            (_, None) => return Err(JobServiceError::NotFound(damaged)),
        };

        let baseline_set = completed_result(&baseline_job)?;
        let damaged_set = completed_result(&damaged_job)?;

        let diff = compare_voxel_sets(baseline_set, damaged_set);
        let metrics = diff.metrics().unwrap_or_default();
        let comparison = Job::completed_comparison(baseline, damaged, diff);
        let comparison_id = comparison.id;
        self.job_repository.replace(&comparison).await?;

        tracing::info!(
            comparison_id = %comparison_id,
            lost = metrics.lost,
            added = metrics.added,
            matching = metrics.matching,
            "Comparison stored"
        );

        Ok(ComparisonOutcome {
            comparison_id,
            metrics,
        })
    }

    fn resolve_resolution(&self, requested: Option<u32>) -> Result<u32, JobServiceError> {
        let resolution = requested.unwrap_or(self.limits.default_resolution);
        if resolution == 0 || resolution > self.limits.max_resolution {
            return Err(JobServiceError::ResolutionOutOfRange {
                requested: resolution,
                max: self.limits.max_resolution,
            });
        }
        Ok(resolution)
    }

    async fn discard_upload(&self, path: &StoragePath) {
        if let Err(e) = self.staging_store.delete(path).await {
            tracing::warn!(error = %e, path = %path, "Failed to delete staged upload");
        }
    }
}

fn completed_result(job: &Job) -> Result<&VoxelSet, JobServiceError> {
    job.result()
        .map(|set| set.as_ref())
        .ok_or(JobServiceError::NotCompleted {
            id: job.id,
            status: job.status(),
        })
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),
    #[error("resolution {requested} is outside the supported range 1..={max}")]
    ResolutionOutOfRange { requested: u32, max: u32 },
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job {id} is {status}; it must be completed")]
    NotCompleted { id: JobId, status: JobStatus },
    #[error("job store: {0}")]
    Repository(#[from] RepositoryError),
    #[error("staging store: {0}")]
    Staging(#[from] StagingStoreError),
    #[error("processing queue unavailable")]
    QueueUnavailable,
}
