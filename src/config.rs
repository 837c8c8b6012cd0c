use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FolioConfig {
    pub store: StoreConfig,
    pub cache: CacheConfig,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub bucket: String,
    pub region: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    pub root: String,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            log_level: "info".into(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: "us-east-1".into(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        let root = default_folio_dir()
            .join("cache")
            .to_string_lossy()
            .into_owned();
        Self { root }
    }
}

/// Returns `~/.folio/`
pub fn default_folio_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".folio")
}

/// Returns the default config file path: `~/.folio/config.toml`
pub fn default_config_path() -> PathBuf {
    default_folio_dir().join("config.toml")
}

impl FolioConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)
                .map_err(|err| Error::Decode(format!("config {}: {err}", path.display())))?
        } else {
            info!("no config file at {}, using defaults", path.display());
            FolioConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (FOLIO_BUCKET, FOLIO_REGION,
    /// FOLIO_CACHE_DIR, FOLIO_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FOLIO_BUCKET") {
            self.store.bucket = val;
        }
        if let Ok(val) = std::env::var("FOLIO_REGION") {
            self.store.region = val;
        }
        if let Ok(val) = std::env::var("FOLIO_CACHE_DIR") {
            self.cache.root = val;
        }
        if let Ok(val) = std::env::var("FOLIO_LOG_LEVEL") {
            self.log_level = val;
        }
    }

    /// Resolve the cache root, expanding `~` if needed.
    pub fn resolved_cache_root(&self) -> PathBuf {
        expand_tilde(&self.cache.root)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
