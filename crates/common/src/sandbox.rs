//! Confinement of caller-supplied relative paths to a root directory.
//!
//! Resolution happens in two stages:
//!
//! 1. A lexical check that rejects absolute paths and any `..` segment
//!    without touching the filesystem.
//! 2. Canonicalization of `root/relative` (following symlinks) and a
//!    component-wise prefix check against the canonical root.
//!
//! Canonicalization is "soft": the deepest existing ancestor is resolved
//! and the not-yet-existing tail is appended, so a path for a file that is
//! about to be created still resolves.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::FileError;
use crate::fs::Filesystem;

#[derive(Debug, Clone)]
pub struct Sandbox {
    root: PathBuf,
}

impl Sandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Purely lexical validation of a caller-supplied path.
    pub fn check_relative(relative: &str) -> Result<&Path, FileError> {
        if relative.is_empty() {
            return Err(FileError::InvalidPath("path must not be empty".to_string()));
        }
        if relative.contains('\0') {
            return Err(FileError::InvalidPath(format!(
                "path contains a NUL byte: {:?}",
                relative
            )));
        }

        // Backslashes are checked too so a Windows-style traversal never
        //  reaches the filesystem on any platform
        if relative.split(['/', '\\']).any(|segment| segment == "..") {
            return Err(FileError::InvalidPath(format!(
                "path must not contain '..': {}",
                relative
            )));
        }

        let path = Path::new(relative);
        if path.is_absolute() || path.has_root() || relative.starts_with('\\') {
            return Err(FileError::InvalidPath(format!(
                "path must be relative: {}",
                relative
            )));
        }
        if path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FileError::InvalidPath(format!(
                "path must be relative: {}",
                relative
            )));
        }

        Ok(path)
    }

    /// Resolve `relative` to a canonical path inside the root.
    pub async fn resolve(
        &self,
        fs: &dyn Filesystem,
        relative: &str,
    ) -> Result<PathBuf, FileError> {
        let relative_path = Self::check_relative(relative)?;

        let real_root = fs.canonicalize(&self.root).await.map_err(|e| {
            FileError::RootUnavailable(format!("{}: {}", self.root.display(), e))
        })?;

        let mut joined = real_root.clone();
        for component in relative_path.components() {
            if let Component::Normal(part) = component {
                joined.push(part);
            }
        }

        let real_path = soft_canonicalize(fs, &joined).await?;

        if !real_path.starts_with(&real_root) {
            tracing::warn!(
                path = %relative,
                resolved = %real_path.display(),
                "path escapes sandbox root"
            );
            return Err(FileError::PathEscapesRoot(real_path));
        }

        Ok(real_path)
    }
}

/// Canonicalize the deepest existing ancestor of `path` and re-append the rest.
async fn soft_canonicalize(fs: &dyn Filesystem, path: &Path) -> Result<PathBuf, FileError> {
    let mut existing = path.to_path_buf();
    let mut tail: Vec<OsString> = Vec::new();

    loop {
        match fs.canonicalize(&existing).await {
            Ok(mut canonical) => {
                for part in tail.iter().rev() {
                    canonical.push(part);
                }
                return Ok(canonical);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // A dangling symlink cannot be proven to stay inside the root
                if fs.is_symlink(&existing).await.unwrap_or(true) {
                    return Err(FileError::PathEscapesRoot(existing));
                }
                let Some(name) = existing.file_name() else {
                    return Err(FileError::RootUnavailable(format!(
                        "{}: {}",
                        path.display(),
                        e
                    )));
                };
                tail.push(name.to_os_string());
                existing.pop();
            }
            // e.g. a regular file used as a directory
            Err(e) => {
                return Err(FileError::InvalidPath(format!(
                    "cannot resolve {}: {}",
                    existing.display(),
                    e
                )));
            }
        }
    }
}
