//! In-memory object store for tests and local development.
//!
//! Objects live in a mutex-guarded map; `last_modified` timestamps are
//! synthesized from insertion order (later inserts are newer) unless set
//! explicitly, so listings have the same most-recent-first shape as S3.
//! A fetch counter makes download behavior observable in tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::{sort_by_recency, ObjectRef, ObjectStore};
use crate::error::{Error, Result};

#[derive(Debug)]
struct StoredObject {
    bytes: Vec<u8>,
    last_modified: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    fetches: AtomicUsize,
    sequence: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object with a synthesized timestamp newer than every
    /// previous insert.
    pub fn insert(&self, key: &str, bytes: impl Into<Vec<u8>>) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) as i64;
        let last_modified = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(seq);
        self.insert_at(key, bytes, last_modified);
    }

    /// Insert an object with an explicit last-modified timestamp.
    pub fn insert_at(
        &self,
        key: &str,
        bytes: impl Into<Vec<u8>>,
        last_modified: DateTime<Utc>,
    ) {
        let mut objects = self.objects.lock().expect("store mutex poisoned");
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.into(),
                last_modified,
            },
        );
    }

    pub fn remove(&self, key: &str) {
        let mut objects = self.objects.lock().expect("store mutex poisoned");
        objects.remove(key);
    }

    /// Number of `get` calls served so far. Listings and uploads don't count.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectRef>> {
        let objects = self.objects.lock().expect("store mutex poisoned");
        let mut refs: Vec<ObjectRef> = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| ObjectRef {
                key: key.clone(),
                last_modified: object.last_modified,
            })
            .collect();
        sort_by_recency(&mut refs);
        Ok(refs)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.lock().expect("store mutex poisoned");
        objects
            .get(key)
            .map(|object| object.bytes.clone())
            .ok_or_else(|| Error::NotFound(format!("object {key} does not exist")))
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.insert(key, bytes);
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        Ok(())
    }
}
