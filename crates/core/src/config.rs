//! Application configuration.
//!
//! Layered lookup: compiled-in defaults, then an on-disk JSON file under the
//! user's config directory, then `GAMEDEX_*` environment variables.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::query::pages::DEFAULT_PAGE_SIZE;
use crate::{prefs::Prefs, storage::JsonStore};

/// Configuration for the catalog engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL the game index and per-game documents are fetched from.
    pub catalog_url: String,
    /// Webhook endpoint for game submissions.
    pub webhook_url: String,
    /// Root directory of the deployment-scoped key-value store.
    pub data_root: PathBuf,
    /// Path of the profile-local preferences file.
    pub prefs_path: PathBuf,
    /// Cards per page in grid views.
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_url: "https://gamedex.example.net/config".to_string(),
            webhook_url: String::new(),
            data_root: JsonStore::default_root(),
            prefs_path: Prefs::default_path(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file and environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_file_path())
    }

    /// Load configuration layered over the given file path.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let mut builder = config::Config::builder().add_source(
            config::Config::try_from(&AppConfig::default())
                .context("failed to build default configuration")?,
        );
        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("GAMEDEX"))
            .build()
            .context("failed to load configuration")?;
        settings
            .try_deserialize()
            .context("failed to parse configuration")
    }
}

/// Location of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gamedex/config.json")
}

/// Write a default configuration file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    let path = config_file_path();
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let serialised = serde_json::to_vec_pretty(&AppConfig::default())
        .context("failed to serialize default configuration")?;
    fs::write(&path, serialised).with_context(|| format!("failed to write {}", path.display()))
}
