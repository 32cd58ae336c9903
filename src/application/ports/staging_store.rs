use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::StoragePath;

/// Holds uploaded bytes between submission and processing.
///
/// A staged upload is written once by the job service and read at most once
/// by the processing worker, which may delete it afterwards.
#[async_trait::async_trait]
pub trait StagingStore: Send + Sync {
    /// Drains `stream` into `path`, returning the number of bytes staged.
    /// Nothing is written when the stream yields an error.
    async fn store(
        &self,
        path: &StoragePath,
        stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, StagingStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StagingStoreError {
    #[error("could not stage upload: {0}")]
    Write(String),
    #[error("no staged upload at {0}")]
    NotFound(String),
    #[error("could not read staged upload: {0}")]
    Read(String),
    #[error("could not remove staged upload: {0}")]
    Delete(String),
    #[error("upload stream interrupted: {0}")]
    Io(#[from] io::Error),
}
