//! Object storage access for ferry
//!
//! This crate owns everything the service knows about object storage:
//!
//! - [`ObjectRef`]: a parsed `(bucket, key)` pair, built either from an
//!   `s3://bucket/key` URI or from a key against a configured bucket
//! - [`Storage`]: reads and writes UTF-8 text objects through the
//!   [`object_store`] crate (S3/MinIO, a local directory, or memory)
//!
//! References are validated before any network call is made.
//!
//! # Example
//!
//! ```rust,no_run
//! use ferry_object_store::{ObjectRef, ObjectStoreConfig, Storage};
//!
//! # async fn example() -> Result<(), ferry_object_store::StorageError> {
//! let storage = Storage::new(ObjectStoreConfig::Memory)?;
//! let object = ObjectRef::parse_uri("s3://reports/2024/q1.txt")?;
//!
//! storage.put_text(&object, "hello").await?;
//! assert_eq!(storage.get_text(&object).await?, "hello");
//! # Ok(())
//! # }
//! ```

mod error;
mod reference;
mod storage;

pub use error::{Result, StorageError};
pub use reference::{is_object_uri, split_bucket_key, ObjectRef, S3_SCHEME};
pub use storage::{ObjectStoreConfig, Storage};
