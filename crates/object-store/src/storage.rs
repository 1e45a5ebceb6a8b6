//! Object storage backend abstraction (S3/MinIO/local filesystem/memory).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StorageError};
use crate::reference::ObjectRef;

/// Configuration for the object storage backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectStoreConfig {
    /// In-memory storage, one store per bucket (for testing)
    #[default]
    Memory,

    /// Local filesystem storage, one directory per bucket
    Local {
        /// Directory holding the bucket directories
        path: PathBuf,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    ///
    /// Credentials and any unset options are read from the standard
    /// `AWS_*` environment variables.
    S3 {
        /// Endpoint override (e.g., "http://localhost:9000" for MinIO)
        endpoint: Option<String>,
        /// Region override
        region: Option<String>,
    },
}

/// Reads and writes text objects in any bucket reachable through the
/// configured backend.
///
/// Each bucket's store is built once, on first use, and shared by every
/// later call.
#[derive(Debug, Clone)]
pub struct Storage {
    config: ObjectStoreConfig,
    // `AWS_*` environment captured at construction, only for `ObjectStoreConfig::S3`
    s3: Option<AmazonS3Builder>,
    stores: Arc<Mutex<HashMap<String, Arc<dyn ObjectStore>>>>,
}

impl Storage {
    /// Create a new storage backend from configuration.
    pub fn new(config: ObjectStoreConfig) -> Result<Self> {
        let s3 = match &config {
            ObjectStoreConfig::S3 { endpoint, region } => {
                let mut builder = AmazonS3Builder::from_env();
                if let Some(endpoint) = endpoint {
                    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                        return Err(StorageError::InvalidConfig(format!(
                            "S3 endpoint must be an http(s) URL, got '{}'",
                            endpoint
                        )));
                    }
                    builder = builder
                        .with_endpoint(endpoint)
                        .with_allow_http(endpoint.starts_with("http://"));
                }
                if let Some(region) = region {
                    builder = builder.with_region(region);
                }
                Some(builder)
            }
            _ => None,
        };

        Ok(Self {
            config,
            s3,
            stores: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    pub fn config(&self) -> &ObjectStoreConfig {
        &self.config
    }

    /// Store scoped to `bucket`, built on first use.
    ///
    /// With `create` unset a missing local bucket directory is `NotFound`
    /// and nothing is created on disk.
    async fn bucket_store(&self, bucket: &str, create: bool) -> Result<Arc<dyn ObjectStore>> {
        let cached = self.stores.lock().get(bucket).cloned();
        if let Some(store) = cached {
            return Ok(store);
        }

        let store: Arc<dyn ObjectStore> = match &self.config {
            ObjectStoreConfig::Memory => Arc::new(InMemory::new()),

            ObjectStoreConfig::Local { path } => {
                let bucket_path = path.join(bucket);
                if create {
                    tokio::fs::create_dir_all(&bucket_path)
                        .await
                        .map_err(|e| StorageError::Backend(e.to_string()))?;
                } else if !tokio::fs::try_exists(&bucket_path)
                    .await
                    .map_err(|e| StorageError::Backend(e.to_string()))?
                {
                    return Err(StorageError::NotFound(format!(
                        "bucket '{}' does not exist",
                        bucket
                    )));
                }
                Arc::new(
                    LocalFileSystem::new_with_prefix(&bucket_path)
                        .map_err(|e| StorageError::InvalidConfig(e.to_string()))?,
                )
            }

            ObjectStoreConfig::S3 { .. } => {
                let builder = self.s3.clone().ok_or_else(|| {
                    StorageError::InvalidConfig("S3 client was not initialized".to_string())
                })?;
                Arc::new(
                    builder
                        .with_bucket_name(bucket)
                        .build()
                        .map_err(|e| StorageError::InvalidConfig(e.to_string()))?,
                )
            }
        };
        tracing::debug!(bucket, "created bucket store");

        // a concurrent first use may have won the race; keep whichever landed first
        let mut stores = self.stores.lock();
        Ok(stores
            .entry(bucket.to_string())
            .or_insert(store)
            .clone())
    }

    /// Fetch an object and decode it as UTF-8 text.
    pub async fn get_text(&self, object: &ObjectRef) -> Result<String> {
        let store = self.bucket_store(object.bucket(), false).await?;
        let result = store.get(object.location()).await?;
        let bytes = result.bytes().await?;
        tracing::debug!(object = %object, size = bytes.len(), "fetched object");
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Put an object, replacing whatever was stored under the same key.
    pub async fn put_text(&self, object: &ObjectRef, content: &str) -> Result<()> {
        self.put_bytes(object, Bytes::from(content.to_owned())).await
    }

    async fn put_bytes(&self, object: &ObjectRef, data: Bytes) -> Result<()> {
        let store = self.bucket_store(object.bucket(), true).await?;
        let size = data.len();
        store.put(object.location(), data.into()).await?;
        tracing::debug!(object = %object, size, "stored object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = Storage::new(ObjectStoreConfig::Memory).unwrap();
        let object = ObjectRef::parse_uri("s3://bucket/notes/today.txt").unwrap();

        storage.put_text(&object, "hello world").await.unwrap();
        let retrieved = storage.get_text(&object).await.unwrap();
        assert_eq!(retrieved, "hello world");

        // Put replaces the previous body entirely
        storage.put_text(&object, "bye").await.unwrap();
        assert_eq!(storage.get_text(&object).await.unwrap(), "bye");
    }

    #[tokio::test]
    async fn test_missing_object() {
        let storage = Storage::new(ObjectStoreConfig::Memory).unwrap();
        let object = ObjectRef::parse_uri("s3://bucket/missing.txt").unwrap();

        let result = storage.get_text(&object).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_buckets_are_isolated() {
        let storage = Storage::new(ObjectStoreConfig::Memory).unwrap();
        let first = ObjectRef::parse_uri("s3://first/key.txt").unwrap();
        let second = ObjectRef::parse_uri("s3://second/key.txt").unwrap();

        storage.put_text(&first, "in first").await.unwrap();

        assert_eq!(storage.get_text(&first).await.unwrap(), "in first");
        assert!(matches!(
            storage.get_text(&second).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_utf8_body() {
        let storage = Storage::new(ObjectStoreConfig::Memory).unwrap();
        let object = ObjectRef::in_bucket("bucket", "blob.bin").unwrap();

        storage
            .put_bytes(&object, Bytes::from_static(&[0xff, 0xfe, 0x00]))
            .await
            .unwrap();

        let result = storage.get_text(&object).await;
        assert!(matches!(result, Err(StorageError::Decode(_))));
    }

    #[tokio::test]
    async fn test_local_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ObjectStoreConfig::Local {
            path: temp_dir.path().to_path_buf(),
        };

        let storage = Storage::new(config).unwrap();
        let object = ObjectRef::in_bucket("docs", "nested/readme.txt").unwrap();

        storage.put_text(&object, "test data").await.unwrap();
        let retrieved = storage.get_text(&object).await.unwrap();
        assert_eq!(retrieved, "test data");

        // Verify file exists on disk
        let file_path = temp_dir.path().join("docs").join("nested").join("readme.txt");
        assert!(file_path.exists());
    }

    #[tokio::test]
    async fn test_local_read_of_missing_bucket_creates_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(ObjectStoreConfig::Local {
            path: temp_dir.path().to_path_buf(),
        })
        .unwrap();
        let object = ObjectRef::parse_uri("s3://nosuchbucket/x.txt").unwrap();

        let result = storage.get_text(&object).await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert!(!temp_dir.path().join("nosuchbucket").exists());

        // the first write creates the bucket, after which reads see it
        storage.put_text(&object, "now here").await.unwrap();
        assert_eq!(storage.get_text(&object).await.unwrap(), "now here");
    }

    #[tokio::test]
    async fn test_bucket_store_is_built_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let configs = [
            ObjectStoreConfig::Memory,
            ObjectStoreConfig::Local {
                path: temp_dir.path().to_path_buf(),
            },
            ObjectStoreConfig::S3 {
                endpoint: Some("http://localhost:9000".to_string()),
                region: Some("us-east-1".to_string()),
            },
        ];

        for config in configs {
            let storage = Storage::new(config.clone()).unwrap();
            let first = storage.bucket_store("b", true).await.unwrap();
            let second = storage.bucket_store("b", false).await.unwrap();
            assert!(Arc::ptr_eq(&first, &second), "store rebuilt for {config:?}");

            let other = storage.bucket_store("c", true).await.unwrap();
            assert!(!Arc::ptr_eq(&first, &other));

            // clones share the cache
            let cloned = storage.clone();
            let third = cloned.bucket_store("b", false).await.unwrap();
            assert!(Arc::ptr_eq(&first, &third));
        }
    }

    #[test]
    fn test_rejects_non_http_endpoint() {
        let result = Storage::new(ObjectStoreConfig::S3 {
            endpoint: Some("localhost:9000".to_string()),
            region: None,
        });
        assert!(matches!(result, Err(StorageError::InvalidConfig(_))));
    }
}
