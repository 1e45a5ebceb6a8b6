use async_trait::async_trait;
use object_store::{is_object_uri, ObjectRef, Storage};

use super::{BackendConfig, BackendKind, FileBackend};
use crate::dispatch::DispatchMode;
use crate::error::FileError;

/// How a reference is turned into a bucket and key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectMode {
    /// The reference is a full `s3://bucket/key` URI
    Uri,
    /// The reference is a key inside this bucket; `None` means the bucket
    ///  was never configured and every call fails
    FixedBucket(Option<String>),
}

#[derive(Debug, Clone)]
pub struct ObjectBackend {
    storage: Storage,
    mode: ObjectMode,
}

impl ObjectBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, FileError> {
        let storage = Storage::new(config.object_store.clone())?;
        let mode = match config.mode {
            DispatchMode::Dual => ObjectMode::Uri,
            DispatchMode::FixedBucket => ObjectMode::FixedBucket(config.bucket.clone()),
        };
        Ok(Self::with_storage(storage, mode))
    }

    pub fn with_storage(storage: Storage, mode: ObjectMode) -> Self {
        Self { storage, mode }
    }

    pub fn mode(&self) -> &ObjectMode {
        &self.mode
    }

    fn object_ref(&self, reference: &str) -> Result<ObjectRef, FileError> {
        match &self.mode {
            ObjectMode::Uri => Ok(ObjectRef::parse_uri(reference)?),
            ObjectMode::FixedBucket(None) => Err(FileError::BackendNotConfigured(
                "no object storage bucket configured (S3_BUCKET)".to_string(),
            )),
            ObjectMode::FixedBucket(Some(bucket)) if is_object_uri(reference) => {
                // A full URI is tolerated as long as it names the configured bucket
                let object = ObjectRef::parse_uri(reference)?;
                if object.bucket() != bucket {
                    return Err(FileError::InvalidReference(format!(
                        "bucket '{}' is not the configured bucket '{}'",
                        object.bucket(),
                        bucket
                    )));
                }
                Ok(object)
            }
            ObjectMode::FixedBucket(Some(bucket)) => Ok(ObjectRef::in_bucket(bucket, reference)?),
        }
    }
}

#[async_trait]
impl FileBackend for ObjectBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::ObjectStorage
    }

    async fn read(&self, reference: &str) -> Result<String, FileError> {
        let object = self.object_ref(reference)?;
        tracing::debug!(object = %object, "reading object");
        self.storage.get_text(&object).await.map_err(|e| {
            tracing::warn!(object = %object, error = %e, "object read failed");
            FileError::from(e)
        })
    }

    async fn write(&self, reference: &str, content: &str) -> Result<(), FileError> {
        let object = self.object_ref(reference)?;
        self.storage.put_text(&object, content).await.map_err(|e| {
            tracing::warn!(object = %object, error = %e, "object write failed");
            FileError::from(e)
        })?;
        tracing::info!(object = %object, bytes = content.len(), "wrote object");
        Ok(())
    }
}
