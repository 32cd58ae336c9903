use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Staging backed by any `object_store` implementation: a local upload
/// directory in production, memory in tests.
pub struct ObjectStagingStore {
    inner: Arc<dyn ObjectStore>,
}

impl ObjectStagingStore {
    pub fn local(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path).map_err(StagingStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| StagingStoreError::Write(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(InMemory::new()),
        }
    }
}

#[async_trait::async_trait]
impl StagingStore for ObjectStagingStore {
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<u64, StagingStoreError> {
        let mut parts = Vec::new();
        let mut total_bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            total_bytes += bytes.len() as u64;
            parts.push(bytes);
        }

        let store_path = StorePath::from(path.as_str());
        self.inner
            .put(&store_path, PutPayload::from_iter(parts))
            .await
            .map_err(|e| StagingStoreError::Write(e.to_string()))?;

        tracing::debug!(path = %path, bytes = total_bytes, "Upload staged");
        Ok(total_bytes)
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        let result = self
            .inner
            .get(&store_path)
            .await
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => StagingStoreError::NotFound(path.to_string()),
                other => StagingStoreError::Read(other.to_string()),
            })?;

        result
            .bytes()
            .await
            .map_err(|e| StagingStoreError::Read(e.to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        let store_path = StorePath::from(path.as_str());
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| StagingStoreError::Delete(e.to_string()))
    }
}
