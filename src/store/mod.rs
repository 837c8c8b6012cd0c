//! Object-store boundary.
//!
//! [`ObjectStore`] is the narrow contract the pipeline consumes: list keys under
//! a prefix, fetch one object's bytes, write one object back. [`S3Store`] is the
//! production implementation; [`MemoryStore`] backs tests and local development.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

pub use memory::MemoryStore;
pub use s3::S3Store;

/// One remote object as seen by a listing. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    /// POSIX-style object key, e.g. `"articles/on-writing.yaml"`.
    pub key: String,
    /// Remote last-modified timestamp, used for the recency sort.
    pub last_modified: DateTime<Utc>,
}

/// Remote key/value blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Every object whose key starts with `prefix`, most recently modified
    /// first. A listing may include the bucket's own prefix marker (the empty
    /// "directory" object); callers filter it.
    ///
    /// Fails with [`Error::StoreUnavailable`](crate::Error::StoreUnavailable)
    /// if the bucket is missing or unreachable.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectRef>>;

    /// The full content of one object.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) if the key does
    /// not exist.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Write one object, replacing any existing content under `key`.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Cheap connectivity probe. `Ok(())` means the store answered.
    async fn health(&self) -> Result<()>;
}

/// Sort refs most recently modified first. Listing order for every store
/// implementation is normalized through this.
pub(crate) fn sort_by_recency(refs: &mut [ObjectRef]) {
    refs.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
}
