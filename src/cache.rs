//! Local mirror cache.
//!
//! Read-through cache mapping a remote key to one file under the cache root,
//! named by the key's base filename. A file that exists is trusted as-is —
//! remote updates are not detected within a process lifetime; the accepted
//! staleness trade-off. The one repair path is [`MirrorCache::refresh`], which
//! the assembler invokes when a cached copy fails to decode.
//!
//! Downloads go through a per-key async lock so concurrent requests for the
//! same uncached key coalesce into a single fetch, and land via a
//! temp-file-then-rename sequence so readers never observe a partial write.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::ObjectStore;

pub struct MirrorCache {
    root: PathBuf,
    // Lock entries are never removed; the map is bounded by the number of
    // distinct keys seen, which tracks the remote object count.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MirrorCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The deterministic local path for a key: `<root>/<basename(key)>`.
    pub fn local_path(&self, key: &str) -> Result<PathBuf> {
        let name = Path::new(key)
            .file_name()
            .ok_or_else(|| Error::NotFound(format!("invalid object key {key:?}")))?;
        Ok(self.root.join(name))
    }

    /// Whether a mirrored copy of `key` already exists locally.
    pub fn contains(&self, key: &str) -> bool {
        self.local_path(key).map(|p| p.exists()).unwrap_or(false)
    }

    /// Return the local path for `key`, downloading the object first if no
    /// mirrored copy exists. A hit never contacts the store.
    pub async fn ensure(
        &self,
        store: &dyn ObjectStore,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let path = self.local_path(key)?;
        if path.exists() {
            debug!(key, "cache hit");
            return Ok(path);
        }

        let lock = self.key_lock(key).await;
        let _guard = lock.lock().await;

        // Lost the race: another task fetched it while we waited.
        if path.exists() {
            debug!(key, "cache hit after coalesced fetch");
            return Ok(path);
        }

        self.download(store, key, &path, cancel).await?;
        Ok(path)
    }

    /// Unconditionally re-download `key`, replacing any local copy. Used when
    /// a decode failure suggests the cached file is corrupt or half-written.
    pub async fn refresh(
        &self,
        store: &dyn ObjectStore,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let path = self.local_path(key)?;

        let lock = self.key_lock(key).await;
        let _guard = lock.lock().await;

        self.download(store, key, &path, cancel).await?;
        Ok(path)
    }

    /// Mirror an image object and return its root-relative serving path
    /// (`"/<cache-dir>/<basename>"`), the shape the page layer links to.
    pub async fn ensure_image(
        &self,
        store: &dyn ObjectStore,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let path = self.ensure(store, key, cancel).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = self
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("/{dir}/{name}"))
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(key.to_string()).or_default().clone()
    }

    /// Fetch `key` and write it to `dest` via temp file + rename.
    async fn download(
        &self,
        store: &dyn ObjectStore,
        key: &str,
        dest: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            result = store.get(key) => result?,
        };

        // Stage under `<full file name>.tmp` so keys with a shared stem
        // (post.yaml / post.yml) never collide on one staging path.
        let mut tmp_name = dest.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp_path, dest).await?;

        info!(key, path = %dest.display(), bytes = bytes.len(), "mirrored object");
        Ok(())
    }
}
