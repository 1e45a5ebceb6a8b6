use std::fmt;
use std::str::FromStr;

use object_store::is_object_uri;
use serde::{Deserialize, Serialize};

use crate::backend::{BackendConfig, FileBackend, LocalBackend, ObjectBackend};
use crate::error::FileError;

/// Which backends a deployment serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// `s3://` references go to object storage, everything else is local
    #[default]
    Dual,
    /// Every reference is an object key in the configured bucket
    FixedBucket,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchMode::Dual => write!(f, "dual"),
            DispatchMode::FixedBucket => write!(f, "fixed-bucket"),
        }
    }
}

impl FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dual" => Ok(DispatchMode::Dual),
            "fixed-bucket" => Ok(DispatchMode::FixedBucket),
            other => Err(format!(
                "unknown storage mode '{}', expected 'dual' or 'fixed-bucket'",
                other
            )),
        }
    }
}

/// Picks the backend for a file reference.
///
/// The choice depends only on the reference prefix and the static
/// [`DispatchMode`]; validation of the reference is left to the backend.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    mode: DispatchMode,
    local: LocalBackend,
    object: ObjectBackend,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode, local: LocalBackend, object: ObjectBackend) -> Self {
        Self {
            mode,
            local,
            object,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, FileError> {
        Ok(Self::new(
            config.mode,
            LocalBackend::new(config),
            ObjectBackend::new(config)?,
        ))
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn dispatch(&self, reference: &str) -> &dyn FileBackend {
        match self.mode {
            DispatchMode::FixedBucket => &self.object,
            DispatchMode::Dual if is_object_uri(reference) => &self.object,
            DispatchMode::Dual => &self.local,
        }
    }

    pub fn local(&self) -> &LocalBackend {
        &self.local
    }

    pub async fn read(&self, reference: &str) -> Result<String, FileError> {
        let backend = self.dispatch(reference);
        tracing::info!(reference, backend = %backend.kind(), "reading file");
        backend.read(reference).await
    }

    pub async fn write(&self, reference: &str, content: &str) -> Result<(), FileError> {
        let backend = self.dispatch(reference);
        tracing::info!(reference, backend = %backend.kind(), "writing file");
        backend.write(reference, content).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use object_store::{ObjectStoreConfig, Storage};

    use super::*;
    use crate::backend::{BackendKind, ObjectMode};
    use crate::fs::OsFilesystem;
    use crate::sandbox::Sandbox;

    fn dispatcher(mode: DispatchMode, root: &std::path::Path) -> Dispatcher {
        let local = LocalBackend::with_filesystem(Sandbox::new(root), Arc::new(OsFilesystem));
        let object_mode = match mode {
            DispatchMode::Dual => ObjectMode::Uri,
            DispatchMode::FixedBucket => ObjectMode::FixedBucket(Some("tools".to_string())),
        };
        let storage = Storage::new(ObjectStoreConfig::Memory).unwrap();
        Dispatcher::new(mode, local, ObjectBackend::with_storage(storage, object_mode))
    }

    #[test]
    fn test_dual_mode_routes_by_prefix() {
        let temp = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(DispatchMode::Dual, temp.path());

        for reference in ["s3://bucket/key.txt", "s3://b/k", "s3://", "s3://bucket"] {
            assert_eq!(
                dispatcher.dispatch(reference).kind(),
                BackendKind::ObjectStorage,
                "{reference}"
            );
        }

        for reference in [
            "requirements.txt",
            "docs/readme.md",
            "S3://bucket/key",
            "s3:/bucket/key",
            "gs://bucket/key",
            "./s3://bucket/key",
            "../etc/passwd",
            "",
        ] {
            assert_eq!(
                dispatcher.dispatch(reference).kind(),
                BackendKind::Local,
                "{reference}"
            );
        }
    }

    #[test]
    fn test_fixed_bucket_mode_routes_everything_to_object_storage() {
        let temp = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(DispatchMode::FixedBucket, temp.path());

        for reference in ["folder/file.txt", "s3://tools/file.txt", "file.txt"] {
            assert_eq!(
                dispatcher.dispatch(reference).kind(),
                BackendKind::ObjectStorage
            );
        }
    }

    #[tokio::test]
    async fn test_dual_mode_reads_and_writes_each_medium() {
        let temp = tempfile::tempdir().unwrap();
        let dispatcher = dispatcher(DispatchMode::Dual, temp.path());

        dispatcher.write("local.txt", "on disk").await.unwrap();
        dispatcher
            .write("s3://bucket/remote.txt", "in bucket")
            .await
            .unwrap();

        assert_eq!(dispatcher.read("local.txt").await.unwrap(), "on disk");
        assert_eq!(
            dispatcher.read("s3://bucket/remote.txt").await.unwrap(),
            "in bucket"
        );
        assert!(temp.path().join("local.txt").exists());
        assert!(!temp.path().join("remote.txt").exists());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("dual".parse::<DispatchMode>().unwrap(), DispatchMode::Dual);
        assert_eq!(
            "fixed-bucket".parse::<DispatchMode>().unwrap(),
            DispatchMode::FixedBucket
        );
        assert!("both".parse::<DispatchMode>().is_err());
        assert_eq!(DispatchMode::FixedBucket.to_string(), "fixed-bucket");
    }
}
