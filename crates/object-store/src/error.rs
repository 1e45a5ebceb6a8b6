//! Error types for object storage access.

/// Errors that can occur when reading or writing objects.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The reference could not be split into a bucket and a key
    #[error("invalid object reference: {0}")]
    InvalidReference(String),

    /// The object does not exist
    #[error("object not found: {0}")]
    NotFound(String),

    /// Credentials are missing or were rejected by the service
    #[error("object storage credentials missing or invalid: {0}")]
    Unauthenticated(String),

    /// The object body is not valid UTF-8
    #[error("object is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The store could not be built from configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Any other failure reported by the storage service
    #[error("object storage error: {0}")]
    Backend(String),
}

impl From<object_store::Error> for StorageError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::NotFound { path, .. } => StorageError::NotFound(path),
            object_store::Error::Unauthenticated { source, .. }
            | object_store::Error::PermissionDenied { source, .. } => {
                StorageError::Unauthenticated(source.to_string())
            }
            other => {
                // The AWS credential chain reports a missing or broken credential
                //  source as a generic error.
                let msg = other.to_string();
                if mentions_credentials(&msg) {
                    StorageError::Unauthenticated(msg)
                } else {
                    StorageError::Backend(msg)
                }
            }
        }
    }
}

fn mentions_credentials(msg: &str) -> bool {
    let msg = msg.to_ascii_lowercase();
    msg.contains("credential")
        || msg.contains("invalidaccesskeyid")
        || msg.contains("signaturedoesnotmatch")
        || msg.contains("expiredtoken")
}

/// Result type alias for object storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_not_found() {
        let err = object_store::Error::NotFound {
            path: "data/missing.txt".to_string(),
            source: "no such key".into(),
        };
        assert!(matches!(
            StorageError::from(err),
            StorageError::NotFound(path) if path == "data/missing.txt"
        ));
    }

    #[test]
    fn test_permission_denied_maps_to_unauthenticated() {
        let err = object_store::Error::PermissionDenied {
            path: "secret.txt".to_string(),
            source: "AccessDenied".into(),
        };
        assert!(matches!(
            StorageError::from(err),
            StorageError::Unauthenticated(_)
        ));
    }

    #[test]
    fn test_generic_credential_failure_maps_to_unauthenticated() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "Error getting credentials from provider".into(),
        };
        assert!(matches!(
            StorageError::from(err),
            StorageError::Unauthenticated(_)
        ));
    }

    #[test]
    fn test_other_generic_failure_keeps_detail() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "SlowDown: please reduce your request rate".into(),
        };
        match StorageError::from(err) {
            StorageError::Backend(msg) => assert!(msg.contains("SlowDown")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
