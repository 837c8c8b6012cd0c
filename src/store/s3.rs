//! S3-backed object store.
//!
//! Thin wrapper over `aws-sdk-s3`: paginated `ListObjectsV2` for prefix
//! listings, `GetObject`/`PutObject` for single objects, `ListBuckets` as the
//! health probe. Credentials and endpoint come from the ambient AWS
//! environment the way the SDK resolves them.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};

use super::{sort_by_recency, ObjectRef, ObjectStore};
use crate::config::StoreConfig;
use crate::error::{Error, Result};

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from config. Fails fast when no bucket is configured
    /// rather than erroring on the first list call.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        if config.bucket.is_empty() {
            return Err(Error::StoreUnavailable(
                "no bucket configured (set store.bucket or FOLIO_BUCKET)".into(),
            ));
        }

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        let client = Client::new(&sdk_config);

        tracing::info!(bucket = %config.bucket, region = %config.region, "S3 store ready");

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectRef>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut refs = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|err| {
                let service = err.into_service_error();
                if service.is_no_such_bucket() {
                    Error::StoreUnavailable(format!("bucket {} does not exist", self.bucket))
                } else {
                    Error::StoreUnavailable(format!("listing {prefix}: {service}"))
                }
            })?;

            for object in page.contents() {
                let Some(key) = object.key() else { continue };
                let last_modified = object
                    .last_modified()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                refs.push(ObjectRef {
                    key: key.to_string(),
                    last_modified,
                });
            }
        }

        sort_by_recency(&mut refs);
        tracing::debug!(prefix, count = refs.len(), "listed objects");
        Ok(refs)
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service = err.into_service_error();
                if service.is_no_such_key() {
                    Error::NotFound(format!("object {key} does not exist"))
                } else {
                    Error::StoreUnavailable(format!("fetching {key}: {service}"))
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|err| Error::StoreUnavailable(format!("reading body of {key}: {err}")))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|err| {
                Error::StoreUnavailable(format!(
                    "uploading {key}: {}",
                    err.into_service_error()
                ))
            })?;

        tracing::info!(key, bytes = bytes.len(), "uploaded object");
        Ok(())
    }

    async fn health(&self) -> Result<()> {
        self.client
            .list_buckets()
            .send()
            .await
            .map_err(|err| Error::StoreUnavailable(err.into_service_error().to_string()))?;
        Ok(())
    }
}
