use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{JobId, JobStatus, SourceFormat, VoxelSet};

/// Where a job's voxel set comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOrigin {
    Upload {
        format: SourceFormat,
        filename: String,
    },
    Comparison {
        baseline: JobId,
        damaged: JobId,
    },
}

/// Lifecycle state. The voxel set exists exactly when the job is completed.
#[derive(Debug, Clone, PartialEq)]
pub enum JobState {
    Queued,
    Processing,
    Completed(Arc<VoxelSet>),
    Failed(String),
}

impl JobState {
    pub fn status(&self) -> JobStatus {
        match self {
            JobState::Queued => JobStatus::Queued,
            JobState::Processing => JobStatus::Processing,
            JobState::Completed(_) => JobStatus::Completed,
            JobState::Failed(_) => JobStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid job transition {from} -> {to}")]
pub struct InvalidTransition {
    pub from: JobStatus,
    pub to: JobStatus,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub origin: JobOrigin,
    state: JobState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(format: SourceFormat, filename: String) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            origin: JobOrigin::Upload { format, filename },
            state: JobState::Queued,
            created_at: now,
            updated_at: now,
        }
    }

    /// Comparison results are computed synchronously and stored already completed.
    pub fn completed_comparison(baseline: JobId, damaged: JobId, result: VoxelSet) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::for_comparison(baseline, damaged),
            origin: JobOrigin::Comparison { baseline, damaged },
            state: JobState::Completed(Arc::new(result)),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn status(&self) -> JobStatus {
        self.state.status()
    }

    pub fn filename(&self) -> Option<&str> {
        match &self.origin {
            JobOrigin::Upload { filename, .. } => Some(filename),
            JobOrigin::Comparison { .. } => None,
        }
    }

    pub fn format(&self) -> Option<SourceFormat> {
        match &self.origin {
            JobOrigin::Upload { format, .. } => Some(*format),
            JobOrigin::Comparison { .. } => None,
        }
    }

    pub fn result(&self) -> Option<&Arc<VoxelSet>> {
        match &self.state {
            JobState::Completed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            JobState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Applies a lifecycle transition.
    ///
    /// Allowed: `Queued -> Processing`, `Processing -> Completed | Failed`, and
    /// `Queued -> Failed` for jobs that could never be handed to the gate.
    /// Terminal states accept nothing.
    pub fn transition(&mut self, next: JobState) -> Result<(), InvalidTransition> {
        let from = self.status();
        let to = next.status();
        let allowed = matches!(
            (from, to),
            (JobStatus::Queued, JobStatus::Processing)
                | (JobStatus::Queued, JobStatus::Failed)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        );
        if !allowed {
            return Err(InvalidTransition { from, to });
        }
        self.state = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
