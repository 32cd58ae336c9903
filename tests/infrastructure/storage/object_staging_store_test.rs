use std::io;

use bytes::Bytes;
use futures::stream;

use voxsure::application::ports::{StagingStore, StagingStoreError};
use voxsure::domain::{JobId, SourceFormat, StoragePath};
use voxsure::infrastructure::storage::{ObjectStagingStore, StagingStoreFactory};
use voxsure::presentation::config::{StorageProviderSetting, StorageSettings};

fn create_test_store() -> (tempfile::TempDir, ObjectStagingStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = ObjectStagingStore::local(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

fn path() -> StoragePath {
    StoragePath::new(&JobId::new(), SourceFormat::Stl)
}

#[tokio::test]
async fn given_valid_stream_when_storing_then_file_is_persisted() {
    let (dir, store) = create_test_store();
    let path = path();

    let chunks = vec![Ok(Bytes::from("solid ")), Ok(Bytes::from("cube"))];
    let size = store
        .store(&path, Box::pin(stream::iter(chunks)))
        .await
        .unwrap();

    assert_eq!(size, 10);
    assert!(dir.path().join(path.as_str()).exists());
}

#[tokio::test]
async fn given_stored_file_when_fetching_then_bytes_match_original() {
    let (_dir, store) = create_test_store();
    let path = path();

    let content = b"test content";
    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from(&content[..]))]));
    store.store(&path, byte_stream).await.unwrap();

    let fetched = store.fetch(&path).await.unwrap();
    assert_eq!(fetched, &content[..]);
}

#[tokio::test]
async fn given_stored_file_when_deleting_then_fetch_returns_not_found() {
    let (_dir, store) = create_test_store();
    let path = path();

    let byte_stream = Box::pin(stream::iter(vec![Ok(Bytes::from("data"))]));
    store.store(&path, byte_stream).await.unwrap();
    store.delete(&path).await.unwrap();

    let result = store.fetch(&path).await;
    assert!(matches!(result, Err(StagingStoreError::NotFound(_))));
}

#[tokio::test]
async fn given_stream_error_when_storing_then_nothing_is_staged() {
    let (_dir, store) = create_test_store();
    let path = path();

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from("partial")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "network drop")),
    ];
    let result = store.store(&path, Box::pin(stream::iter(chunks))).await;

    assert!(matches!(result, Err(StagingStoreError::Io(_))));
    assert!(store.fetch(&path).await.is_err());
}

#[tokio::test]
async fn given_memory_provider_when_creating_store_then_round_trips_bytes() {
    let settings = StorageSettings {
        provider: StorageProviderSetting::Memory,
        ..StorageSettings::default()
    };
    let store = StagingStoreFactory::create(&settings).unwrap();
    let path = path();

    store
        .store(&path, Box::pin(stream::iter(vec![Ok(Bytes::from("abc"))])))
        .await
        .unwrap();

    assert_eq!(store.fetch(&path).await.unwrap(), "abc");
}
