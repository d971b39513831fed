//! Deployment-scoped key-value storage backed by JSON files.
//!
//! This is the engine-side face of the site's asynchronous storage service:
//! string keys, JSON values, and reads that degrade to "no data" instead of
//! failing. Each key maps to one file under the store root.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

/// Directory under the user's data dir used for the default store root.
pub const DEFAULT_STORE_DIR: &str = "gamedex/store";

/// Asynchronous JSON key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_root() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_STORE_DIR)
    }

    /// Read and deserialize the value stored under `key`.
    ///
    /// A missing key reads as `None`. So does a value that no longer
    /// deserializes: storage read failures must never block rendering.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(_) => return None,
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Discarding unreadable value for key {key}: {err}");
                None
            }
        }
    }

    /// Serialize and persist `value` under `key`, creating the store root
    /// on first use.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        let path = self.key_path(key);
        let serialised = serde_json::to_vec_pretty(value)
            .with_context(|| format!("failed to serialize value for key {key}"))?;
        tokio::fs::write(&path, serialised)
            .await
            .with_context(|| format!("failed to write {}", path.display()))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn sanitize_key(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
            result.push(ch);
        }
    }
    if result.is_empty() {
        "key".to_string()
    } else {
        result
    }
}
