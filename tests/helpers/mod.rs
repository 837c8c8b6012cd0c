#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tempfile::TempDir;

use folio::collection::Library;
use folio::document::{self, Article, Document, ReadingListEntry};
use folio::store::{MemoryStore, ObjectRef, ObjectStore};
use folio::Result;

/// A fresh library over an in-memory store and a temp cache directory.
/// Keep the `TempDir` alive for the duration of the test.
pub fn library() -> (Arc<MemoryStore>, Library, TempDir) {
    let store = Arc::new(MemoryStore::new());
    let cache_dir = TempDir::new().expect("temp dir");
    let library = Library::new(store.clone(), cache_dir.path());
    (store, library, cache_dir)
}

/// Build an article record with the given metadata.
pub fn article(title: &str, date: &str, tags: &[&str], body: &str) -> Article {
    Article {
        document: Document {
            title: title.into(),
            body: body.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Document::default()
        },
        date: date.into(),
    }
}

/// Build a reading-list record with the given metadata.
pub fn book(title: &str, author: &str, tags: &[&str]) -> ReadingListEntry {
    ReadingListEntry {
        document: Document {
            title: title.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Document::default()
        },
        author: author.into(),
        ..ReadingListEntry::default()
    }
}

/// Insert a record into the store as YAML under `key`.
pub fn seed<T: serde::Serialize>(store: &MemoryStore, key: &str, record: &T) {
    let yaml = document::encode(record).expect("encode seed record");
    store.insert(key, yaml);
}

/// A store whose `get` never completes. Listing works, so pipelines reach the
/// download step and hang there — used to exercise cancellation.
pub struct PendingStore;

#[async_trait]
impl ObjectStore for PendingStore {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectRef>> {
        Ok(vec![ObjectRef {
            key: format!("{prefix}pending.yaml"),
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
        }])
    }

    async fn get(&self, _key: &str) -> Result<Vec<u8>> {
        std::future::pending().await
    }

    async fn put(&self, _key: &str, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        Ok(())
    }
}
