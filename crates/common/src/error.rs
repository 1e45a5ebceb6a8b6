use std::path::PathBuf;

use object_store::StorageError;

/// Failures of a file read or write, whichever backend served it.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Absolute path, `..` segment, or otherwise unusable path
    #[error("invalid file path: {0}")]
    InvalidPath(String),

    /// The path resolved (after following symlinks) outside the root
    #[error("file path is outside the allowed directory: {}", .0.display())]
    PathEscapesRoot(PathBuf),

    /// An object reference that does not split into bucket and key
    #[error("invalid object reference: {0}")]
    InvalidReference(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("path is not a file: {0}")]
    NotAFile(String),

    #[error("file is not valid UTF-8: {0}")]
    Decode(String),

    /// The sandbox root itself could not be resolved
    #[error("storage root is unavailable: {0}")]
    RootUnavailable(String),

    #[error("could not read file: {0}")]
    Read(String),

    #[error("could not write to file: {0}")]
    Write(String),

    /// Object storage was selected but no bucket is configured
    #[error("object storage is not configured: {0}")]
    BackendNotConfigured(String),

    #[error("storage credentials missing or invalid: {0}")]
    Unauthenticated(String),

    /// Any other failure reported by the storage service
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StorageError> for FileError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidReference(msg) => FileError::InvalidReference(msg),
            StorageError::NotFound(path) => FileError::NotFound(path),
            StorageError::Unauthenticated(msg) => FileError::Unauthenticated(msg),
            StorageError::Decode(e) => FileError::Decode(e.to_string()),
            StorageError::InvalidConfig(msg) => FileError::BackendNotConfigured(msg),
            StorageError::Backend(msg) => FileError::Backend(msg),
        }
    }
}
