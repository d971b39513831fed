//! Browser-profile preferences: theme and favorites.
//!
//! Kept separate from the deployment-scoped [`crate::storage::JsonStore`],
//! matching the split the site makes between its storage service and the
//! profile-local store. Reads are synchronous and degrade to defaults.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// File name under the user's config directory.
pub const DEFAULT_PREFS_FILE: &str = "gamedex/prefs.json";

/// Light/dark theme toggle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Dark theme (the default).
    #[default]
    Dark,
    /// Light theme.
    Light,
}

impl ThemeMode {
    /// The opposite mode.
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }
}

/// Profile-local preferences persisted as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefs {
    /// Active theme mode.
    #[serde(default)]
    pub theme: ThemeMode,
    /// Named accent colour scheme.
    #[serde(default)]
    pub accent: Option<String>,
    /// Favourited game ids.
    #[serde(default)]
    pub favorites: BTreeSet<String>,
}

impl Prefs {
    /// Default prefs path under the user's config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_PREFS_FILE)
    }

    /// Load preferences, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(prefs) => prefs,
                Err(err) => {
                    warn!("Resetting unreadable prefs {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("Failed to read prefs {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Persist preferences, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialised = serde_json::to_vec_pretty(self).context("failed to serialize prefs")?;
        fs::write(path, serialised).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Flip the theme and return the new mode.
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme = self.theme.toggled();
        self.theme
    }

    /// Toggle a game in the favorite set: add if absent, remove if present.
    /// Returns whether the game is a favorite afterwards.
    pub fn toggle_favorite(&mut self, game_id: &str) -> bool {
        if self.favorites.remove(game_id) {
            false
        } else {
            self.favorites.insert(game_id.to_string());
            true
        }
    }

    /// Whether a game is currently favourited.
    pub fn is_favorite(&self, game_id: &str) -> bool {
        self.favorites.contains(game_id)
    }
}
