//! Collection assembler.
//!
//! [`Library`] orchestrates the whole retrieval pipeline: list refs under a
//! type's prefix, mirror each object locally, decode it, assign its positional
//! id, render its body, fold its tags into the vocabulary, then filter and
//! order the result. Every document-type page goes through here.

use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::MirrorCache;
use crate::config::FolioConfig;
use crate::document::{self, Record};
use crate::error::{Error, Result};
use crate::store::{ObjectStore, S3Store};

/// The one explicit "which documents" predicate. `All` replaces both of the
/// legacy no-filter sentinels (`""` and `"all"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagFilter {
    All,
    Tagged(String),
}

impl TagFilter {
    /// Compatibility constructor for the legacy string form: both `""` and
    /// `"all"` mean no filter.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "all" => TagFilter::All,
            tag => TagFilter::Tagged(tag.to_string()),
        }
    }

    pub fn matches(&self, tags: &[String]) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Tagged(tag) => tags.iter().any(|t| t == tag),
        }
    }
}

/// What a listing does when one object fails to fetch, decode, or render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// First error aborts the whole call. All-or-nothing listings are the
    /// contract existing callers rely on.
    #[default]
    Abort,
    /// Skip the broken object, report it in [`DocumentSet::skipped`].
    /// Store-down and cancellation still abort.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub failure_mode: FailureMode,
}

/// A broken object a best-effort listing stepped over.
#[derive(Debug, Clone)]
pub struct SkippedObject {
    pub key: String,
    pub reason: String,
}

/// An assembled collection: ordered documents, the deduplicated tag
/// vocabulary of the listing, and whatever was skipped in best-effort mode.
#[derive(Debug, Default)]
pub struct DocumentSet<T> {
    pub documents: Vec<T>,
    pub tags: Vec<String>,
    pub skipped: Vec<SkippedObject>,
}

pub struct Library {
    store: Arc<dyn ObjectStore>,
    cache: MirrorCache,
}

impl Library {
    pub fn new(store: Arc<dyn ObjectStore>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            cache: MirrorCache::new(cache_root),
        }
    }

    /// Wire up the production S3 store from config.
    pub async fn connect(config: &FolioConfig) -> Result<Self> {
        let store = S3Store::connect(&config.store).await?;
        Ok(Self::new(Arc::new(store), config.resolved_cache_root()))
    }

    pub fn cache(&self) -> &MirrorCache {
        &self.cache
    }

    /// All documents of type `T` matching `filter`, fully rendered and
    /// deterministically ordered.
    ///
    /// Refs are processed in listing order (most recently modified first);
    /// ids are the ref's positional index in that listing, so they are stable
    /// only until the underlying listing changes. Date-bearing types are then
    /// re-sorted descending by date; others keep listing order.
    pub async fn list<T: Record>(
        &self,
        filter: &TagFilter,
        options: &ListOptions,
        cancel: &CancellationToken,
    ) -> Result<DocumentSet<T>> {
        let refs = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = self.store.list(T::PREFIX) => result?,
        };

        let mut set = DocumentSet::default();

        for (position, object) in refs.iter().enumerate() {
            // The bucket's own prefix marker is not a document.
            if object.key == T::PREFIX {
                continue;
            }

            match self.fetch::<T>(&object.key, position, cancel).await {
                Ok(record) => {
                    document::aggregate_tags(&record, &mut set.tags);
                    if filter.matches(record.tags()) {
                        set.documents.push(record);
                    }
                }
                Err(err) if options.failure_mode == FailureMode::Skip && err.is_skippable() => {
                    warn!(key = %object.key, error = %err, "skipping broken object");
                    set.skipped.push(SkippedObject {
                        key: object.key.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        sort_documents(&mut set.documents);

        debug!(
            prefix = T::PREFIX,
            matched = set.documents.len(),
            tags = set.tags.len(),
            skipped = set.skipped.len(),
            "assembled collection"
        );
        Ok(set)
    }

    /// The single document whose assigned id equals `id`.
    ///
    /// Runs the full unfiltered listing and scans for the id, so the lookup is
    /// only stable between two calls if the listing has not changed in
    /// between. A missing id is [`Error::NotFound`], never a zero-valued
    /// document.
    pub async fn get_by_id<T: Record>(&self, id: &str, cancel: &CancellationToken) -> Result<T> {
        let set = self
            .list::<T>(&TagFilter::All, &ListOptions::default(), cancel)
            .await?;

        set.documents
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "no {} document with id {id}",
                    T::PREFIX.trim_end_matches('/')
                ))
            })
    }

    /// Write path: encode `fields` as a YAML document, mirror it into the
    /// cache directory, and upload it under `key`. Returns the mirrored path.
    pub async fn store_document<V: Serialize>(
        &self,
        key: &str,
        fields: &V,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let yaml = document::encode(fields)?;

        tokio::fs::create_dir_all(self.cache.root()).await?;
        let local_path = self.cache.local_path(key)?;
        tokio::fs::write(&local_path, yaml.as_bytes()).await?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = self.store.put(key, yaml.as_bytes()) => result?,
        };

        Ok(local_path)
    }

    /// Mirror an image object and return its root-relative serving path.
    pub async fn ensure_image(&self, key: &str, cancel: &CancellationToken) -> Result<String> {
        self.cache
            .ensure_image(self.store.as_ref(), key, cancel)
            .await
    }

    /// Store connectivity probe for the page layer's health endpoint.
    pub async fn health(&self) -> Result<()> {
        self.store.health().await
    }

    /// Mirror, decode, and render one object. Runs the repair path when a
    /// previously cached copy fails to decode: the file may be a corrupt
    /// half-written entry, so it is re-downloaded once and decoded again.
    async fn fetch<T: Record>(
        &self,
        key: &str,
        position: usize,
        cancel: &CancellationToken,
    ) -> Result<T> {
        let was_cached = self.cache.contains(key);
        let path = self.cache.ensure(self.store.as_ref(), key, cancel).await?;
        let bytes = tokio::fs::read(&path).await?;

        let mut record = match document::decode::<T>(&bytes, key) {
            Ok(record) => record,
            Err(Error::Decode(reason)) if was_cached => {
                warn!(key, %reason, "cached copy failed to decode, re-downloading");
                let path = self.cache.refresh(self.store.as_ref(), key, cancel).await?;
                let bytes = tokio::fs::read(&path).await?;
                document::decode::<T>(&bytes, key)?
            }
            Err(err) => return Err(err),
        };

        record.set_source_key(key.to_string());
        record.set_id(position.to_string());
        document::render_body(&mut record)?;
        Ok(record)
    }
}

/// Stable descending date sort. Records without a sort date compare equal, so
/// non-date-bearing types keep their listing order.
fn sort_documents<T: Record>(documents: &mut [T]) {
    documents.sort_by(|a, b| match (a.sort_date(), b.sort_date()) {
        (Some(a), Some(b)) => b.cmp(a),
        _ => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Article, Document};

    #[test]
    fn empty_and_all_sentinels_both_mean_no_filter() {
        assert_eq!(TagFilter::parse(""), TagFilter::All);
        assert_eq!(TagFilter::parse("all"), TagFilter::All);
        assert_eq!(
            TagFilter::parse("rust"),
            TagFilter::Tagged("rust".to_string())
        );
    }

    #[test]
    fn all_filter_matches_everything_including_untagged() {
        assert!(TagFilter::All.matches(&[]));
        assert!(TagFilter::All.matches(&["x".to_string()]));
        assert!(!TagFilter::Tagged("x".into()).matches(&[]));
        assert!(TagFilter::Tagged("x".into()).matches(&["y".to_string(), "x".to_string()]));
    }

    #[test]
    fn dated_documents_sort_descending() {
        let mut articles: Vec<Article> = ["2024-01-01", "2024-03-01", "2023-12-31"]
            .iter()
            .map(|date| Article {
                document: Document::default(),
                date: date.to_string(),
            })
            .collect();

        sort_documents(&mut articles);

        let dates: Vec<&str> = articles.iter().map(|a| a.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-01-01", "2023-12-31"]);
    }
}
