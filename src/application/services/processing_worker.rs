use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::application::ports::{
    JobRepository, RepositoryError, StagingStore, StagingStoreError, VoxelizeError, Voxelizer,
};
use crate::domain::{JobId, JobState, SourceFormat, StoragePath, VoxelSet};

use super::admission_gate::{AdmissionGate, GateClosed};

pub struct ProcessingMessage {
    pub job_id: JobId,
    pub format: SourceFormat,
    pub storage_path: StoragePath,
    pub resolution: u32,
}

/// Receives submitted jobs and runs them through the admission gate.
///
/// Every message gets its own task so that queued jobs wait on the gate
/// rather than on the channel; the gate alone decides what executes.
pub struct ProcessingWorker {
    receiver: mpsc::Receiver<ProcessingMessage>,
    runner: Arc<JobRunner>,
}

struct JobRunner {
    gate: AdmissionGate,
    voxelizer: Arc<dyn Voxelizer>,
    job_repository: Arc<dyn JobRepository>,
    staging_store: Arc<dyn StagingStore>,
    delete_after_processing: bool,
}

impl ProcessingWorker {
    pub fn new(
        receiver: mpsc::Receiver<ProcessingMessage>,
        gate: AdmissionGate,
        voxelizer: Arc<dyn Voxelizer>,
        job_repository: Arc<dyn JobRepository>,
        staging_store: Arc<dyn StagingStore>,
        delete_after_processing: bool,
    ) -> Self {
        Self {
            receiver,
            runner: Arc::new(JobRunner {
                gate,
                voxelizer,
                job_repository,
                staging_store,
                delete_after_processing,
            }),
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Processing worker started");
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => {
                        let span = tracing::info_span!(
                            "voxelization_job",
                            job_id = %msg.job_id,
                            format = %msg.format,
                            resolution = msg.resolution,
                        );
                        let runner = Arc::clone(&self.runner);
                        in_flight.spawn(
                            async move {
                                if let Err(e) = runner.process(msg).await {
                                    tracing::error!(error = %e, "Voxelization job failed");
                                }
                            }
                            .instrument(span),
                        );
                    }
                    None => break,
                },
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(e) = joined {
                        tracing::error!(error = %e, "Job task terminated abnormally");
                    }
                }
            }
        }

        while in_flight.join_next().await.is_some() {}
        tracing::info!("Processing worker stopped: channel closed");
    }
}

impl JobRunner {
    async fn process(&self, msg: ProcessingMessage) -> Result<(), ProcessingError> {
        let job_id = msg.job_id;

        let permit = match self.gate.admit().await {
            Ok(permit) => permit,
            Err(closed) => {
                let reason = ProcessingError::from(closed);
                self.update_state(job_id, JobState::Failed(reason.to_string()))
                    .await?;
                self.discard_upload(&msg.storage_path).await;
                return Err(reason);
            }
        };

        self.update_state(job_id, JobState::Processing).await?;

        let outcome = self.execute(&msg).await;
        let recorded = match &outcome {
            Ok(voxels) => {
                tracing::info!(voxels = voxels.len(), "Voxelization completed");
                JobState::Completed(Arc::clone(voxels))
            }
            Err(e) => JobState::Failed(e.to_string()),
        };
        let update = self.update_state(job_id, recorded).await;

        // The slot is only released once the terminal state is visible.
        drop(permit);

        self.discard_upload(&msg.storage_path).await;
        update?;
        outcome.map(|_| ())
    }

    async fn execute(&self, msg: &ProcessingMessage) -> Result<Arc<VoxelSet>, ProcessingError> {
        let data = self
            .staging_store
            .fetch(&msg.storage_path)
            .await
            .map_err(ProcessingError::Staging)?;

        tracing::debug!(bytes = data.len(), "Starting voxelization");

        let voxelizer = Arc::clone(&self.voxelizer);
        let format = msg.format;
        let resolution = msg.resolution;
        let result =
            tokio::task::spawn_blocking(move || voxelizer.voxelize(&data, format, resolution))
                .await
                .map_err(|e| ProcessingError::Aborted(e.to_string()))?;

        Ok(Arc::new(result?))
    }

    async fn discard_upload(&self, path: &StoragePath) {
        if !self.delete_after_processing {
            return;
        }
        if let Err(e) = self.staging_store.delete(path).await {
            tracing::warn!(error = %e, path = %path, "Failed to delete staged upload");
        }
    }

    async fn update_state(&self, job_id: JobId, state: JobState) -> Result<(), ProcessingError> {
        tracing::debug!(status = %state.status(), "Job status transition");
        self.job_repository
            .update_state(job_id, state)
            .await
            .map_err(ProcessingError::Repository)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("{0}")]
    Voxelization(#[from] VoxelizeError),
    #[error("staged upload unavailable: {0}")]
    Staging(StagingStoreError),
    #[error("voxelization aborted: {0}")]
    Aborted(String),
    #[error("{0}")]
    GateClosed(#[from] GateClosed),
    #[error("repository: {0}")]
    Repository(RepositoryError),
}
