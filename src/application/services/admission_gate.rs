use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limits how many voxelizations may execute at once.
///
/// Admission is independent of how many jobs have been accepted: submitters
/// never touch the gate, only the processing worker does.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// Held for the whole execution of one job; dropping it re-opens the slot.
#[derive(Debug)]
pub struct AdmissionPermit {
    _permit: OwnedSemaphorePermit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("admission gate is closed")]
pub struct GateClosed;

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// The single-slot gate used by the service.
    pub fn exclusive() -> Self {
        Self::new(1)
    }

    pub fn try_admit(&self) -> Option<AdmissionPermit> {
        Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| AdmissionPermit { _permit: permit })
    }

    pub async fn admit(&self) -> Result<AdmissionPermit, GateClosed> {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map(|permit| AdmissionPermit { _permit: permit })
            .map_err(|_| GateClosed)
    }

    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Wakes every waiter with [`GateClosed`]; permits already handed out stay valid.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::exclusive()
    }
}
