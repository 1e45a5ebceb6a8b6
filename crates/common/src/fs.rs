use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// What a path points at, after following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

/// The handful of filesystem calls the local backend needs.
///
/// Everything goes through this trait so path resolution can be tested
/// against a fake that records (or refuses) calls.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Resolve symlinks and relative segments. Fails if `path` does not exist.
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Whether `path` itself is a symlink (without following it).
    /// A missing path is not a symlink.
    async fn is_symlink(&self, path: &Path) -> io::Result<bool>;

    async fn kind(&self, path: &Path) -> io::Result<FileKind>;

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create or truncate `path` and write `contents`.
    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// [`Filesystem`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

#[async_trait]
impl Filesystem for OsFilesystem {
    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::canonicalize(path).await
    }

    async fn is_symlink(&self, path: &Path) -> io::Result<bool> {
        match tokio::fs::symlink_metadata(path).await {
            Ok(meta) => Ok(meta.file_type().is_symlink()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn kind(&self, path: &Path) -> io::Result<FileKind> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(if meta.is_file() {
            FileKind::File
        } else if meta.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        })
    }

    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        tokio::fs::create_dir_all(path).await
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }
}
