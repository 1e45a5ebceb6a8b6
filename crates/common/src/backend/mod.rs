//! Storage backends
//!
//! A backend reads and writes UTF-8 text identified by a caller-supplied
//! reference string:
//!
//! - **[`LocalBackend`]**: a path relative to the sandbox root on local disk
//! - **[`ObjectBackend`]**: an `s3://bucket/key` URI, or a bare key against
//!   the configured bucket
//!
//! Which one serves a reference is decided by the
//! [`Dispatcher`](crate::dispatch::Dispatcher).

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use object_store::ObjectStoreConfig;

use crate::dispatch::DispatchMode;
use crate::error::FileError;

mod local;
mod object;

pub use local::LocalBackend;
pub use object::{ObjectBackend, ObjectMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Local,
    ObjectStorage,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::ObjectStorage => write!(f, "object-storage"),
        }
    }
}

#[async_trait]
pub trait FileBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Read the whole file as UTF-8 text.
    async fn read(&self, reference: &str) -> Result<String, FileError>;

    /// Create or fully overwrite the file with `content`.
    async fn write(&self, reference: &str, content: &str) -> Result<(), FileError>;
}

/// Static storage configuration, loaded once at startup and handed to the
/// backend constructors.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub mode: DispatchMode,
    /// Directory local references are confined to
    pub root: PathBuf,
    pub object_store: ObjectStoreConfig,
    /// Bucket used for bare keys in fixed-bucket mode
    pub bucket: Option<String>,
}
