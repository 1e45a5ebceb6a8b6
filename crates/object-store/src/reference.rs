use std::fmt;

use object_store::path::Path as ObjectPath;

use crate::error::{Result, StorageError};

/// URI scheme prefix that marks a reference as an object in a bucket.
pub const S3_SCHEME: &str = "s3://";

/// Whether `reference` is an object-storage URI rather than a local path.
pub fn is_object_uri(reference: &str) -> bool {
    reference.starts_with(S3_SCHEME)
}

/// Split `bucket/key...` at the first `/`.
///
/// Both halves must be non-empty; the key may itself contain further `/`.
pub fn split_bucket_key(bucket_and_key: &str) -> Result<(&str, &str)> {
    let (bucket, key) = bucket_and_key.split_once('/').ok_or_else(|| {
        StorageError::InvalidReference(format!(
            "expected <bucket>/<key>, got '{}'",
            bucket_and_key
        ))
    })?;

    if bucket.is_empty() {
        return Err(StorageError::InvalidReference(format!(
            "missing bucket name in '{}'",
            bucket_and_key
        )));
    }
    if key.is_empty() {
        return Err(StorageError::InvalidReference(format!(
            "missing object key in '{}'",
            bucket_and_key
        )));
    }

    Ok((bucket, key))
}

/// A bucket plus a validated object key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    bucket: String,
    key: String,
    location: ObjectPath,
}

impl ObjectRef {
    /// Parse an `s3://bucket/key` URI.
    pub fn parse_uri(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix(S3_SCHEME).ok_or_else(|| {
            StorageError::InvalidReference(format!("'{}' must start with {}", uri, S3_SCHEME))
        })?;
        let (bucket, key) = split_bucket_key(rest)?;
        Self::in_bucket(bucket, key)
    }

    /// Address `key` inside an already known bucket.
    pub fn in_bucket(bucket: &str, key: &str) -> Result<Self> {
        if bucket.is_empty() {
            return Err(StorageError::InvalidReference(
                "bucket name must not be empty".to_string(),
            ));
        }
        if bucket == "." || bucket == ".." || bucket.contains(['/', '\\']) {
            return Err(StorageError::InvalidReference(format!(
                "invalid bucket name '{}'",
                bucket
            )));
        }
        if key.is_empty() {
            return Err(StorageError::InvalidReference(
                "object key must not be empty".to_string(),
            ));
        }

        // Reject keys the store would silently rewrite (empty, '.' or '..' segments)
        let location = ObjectPath::parse(key)
            .map_err(|e| StorageError::InvalidReference(format!("invalid key '{}': {}", key, e)))?;
        if location.as_ref().is_empty() {
            return Err(StorageError::InvalidReference(format!(
                "object key '{}' names no object",
                key
            )));
        }
        // a leading or trailing '/' is trimmed by the parser, so `/a` and `a/` would alias `a`
        if location.as_ref() != key {
            return Err(StorageError::InvalidReference(format!(
                "object key '{}' is not in canonical form (would be stored as '{}')",
                key, location
            )));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            location,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn location(&self) -> &ObjectPath {
        &self.location
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", S3_SCHEME, self.bucket, self.key)
    }
}
