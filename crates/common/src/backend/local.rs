use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::{BackendConfig, BackendKind, FileBackend};
use crate::error::FileError;
use crate::fs::{FileKind, Filesystem, OsFilesystem};
use crate::sandbox::Sandbox;

/// Files on local disk, confined to a root directory.
#[derive(Clone)]
pub struct LocalBackend {
    sandbox: Sandbox,
    fs: Arc<dyn Filesystem>,
}

impl std::fmt::Debug for LocalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBackend")
            .field("root", &self.sandbox.root())
            .finish()
    }
}

impl LocalBackend {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_filesystem(Sandbox::new(&config.root), Arc::new(OsFilesystem))
    }

    pub fn with_filesystem(sandbox: Sandbox, fs: Arc<dyn Filesystem>) -> Self {
        Self { sandbox, fs }
    }

    pub fn root(&self) -> &Path {
        self.sandbox.root()
    }
}

#[async_trait]
impl FileBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn read(&self, reference: &str) -> Result<String, FileError> {
        let path = self.sandbox.resolve(self.fs.as_ref(), reference).await?;

        match self.fs.kind(&path).await {
            Ok(FileKind::File) => {}
            Ok(_) => {
                tracing::warn!(path = %path.display(), "local path is not a file");
                return Err(FileError::NotAFile(reference.to_string()));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "local file not found");
                return Err(FileError::NotFound(reference.to_string()));
            }
            Err(e) => return Err(FileError::Read(format!("{}: {}", reference, e))),
        }

        let bytes = self
            .fs
            .read(&path)
            .await
            .map_err(|e| FileError::Read(format!("{}: {}", reference, e)))?;

        String::from_utf8(bytes).map_err(|e| FileError::Decode(format!("{}: {}", reference, e)))
    }

    async fn write(&self, reference: &str, content: &str) -> Result<(), FileError> {
        let path = self.sandbox.resolve(self.fs.as_ref(), reference).await?;

        if let Some(parent) = path.parent() {
            self.fs
                .create_dir_all(parent)
                .await
                .map_err(|e| FileError::Write(e.to_string()))?;
        }

        self.fs
            .write(&path, content.as_bytes())
            .await
            .map_err(|e| FileError::Write(e.to_string()))?;

        tracing::info!(path = %path.display(), bytes = content.len(), "wrote local file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(root: &Path) -> LocalBackend {
        LocalBackend::with_filesystem(Sandbox::new(root), Arc::new(OsFilesystem))
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp = tempfile::tempdir().unwrap();
        let local = backend(temp.path());

        let content = "line one\nline two, naïve café ✓\n";
        local.write("notes/today.md", content).await.unwrap();

        assert_eq!(local.read("notes/today.md").await.unwrap(), content);
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let temp = tempfile::tempdir().unwrap();
        let local = backend(temp.path());

        local.write("a.txt", "a much longer first version").await.unwrap();
        local.write("a.txt", "short").await.unwrap();

        assert_eq!(local.read("a.txt").await.unwrap(), "short");
    }

    #[tokio::test]
    async fn test_write_empty_content() {
        let temp = tempfile::tempdir().unwrap();
        let local = backend(temp.path());

        local.write("empty.txt", "").await.unwrap();
        assert_eq!(local.read("empty.txt").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_read_missing() {
        let temp = tempfile::tempdir().unwrap();
        let local = backend(temp.path());

        let result = local.read("nope.txt").await;
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_directory() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("dir")).unwrap();
        let local = backend(temp.path());

        let result = local.read("dir").await;
        assert!(matches!(result, Err(FileError::NotAFile(_))));
    }

    #[tokio::test]
    async fn test_read_invalid_utf8() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("blob.bin"), [0xc3, 0x28]).unwrap();
        let local = backend(temp.path());

        let result = local.read("blob.bin").await;
        assert!(matches!(result, Err(FileError::Decode(_))));
    }

    #[tokio::test]
    async fn test_traversal_rejected_and_nothing_written() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("root");
        std::fs::create_dir(&root).unwrap();
        let local = backend(&root);

        let result = local.write("../outside.txt", "x").await;
        assert!(matches!(result, Err(FileError::InvalidPath(_))));
        assert!(!parent.path().join("outside.txt").exists());

        let result = local.read("../root/../root/x").await;
        assert!(matches!(result, Err(FileError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_write_into_file_as_directory() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("plain.txt"), "x").unwrap();
        let local = backend(temp.path());

        let result = local.write("plain.txt/child.txt", "y").await;
        assert!(result.is_err());
    }
}
