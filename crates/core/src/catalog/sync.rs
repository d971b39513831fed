//! Network load of the game index and per-game documents.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::{
    community::Community,
    config::AppConfig,
    models::GameRecord,
    storage::JsonStore,
};

use super::store::CatalogStore;

/// Events emitted by the background catalog loader.
#[derive(Debug)]
pub enum SyncEvent {
    /// Load succeeded with a fresh record set.
    Loaded(Vec<GameRecord>),
    /// Load failed with an error.
    Error(anyhow::Error),
}

/// The game index document: a list of per-game document names.
#[derive(Debug, Clone, Deserialize)]
struct IndexDoc {
    games: Vec<String>,
}

/// Fetches the catalog over HTTP and enriches it from community storage.
pub struct CatalogSync {
    config: AppConfig,
    client: reqwest::Client,
    community: Community,
}

impl CatalogSync {
    /// Create a synchroniser from configuration and the community store.
    pub fn new(config: AppConfig, store: JsonStore) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            community: Community::new(store),
        }
    }

    /// Fetch the index and every listed per-game document.
    ///
    /// A per-game document that cannot be fetched or parsed is dropped with
    /// a warning and the rest of the catalog still loads. A failed index
    /// fetch is an error for the caller to degrade on.
    pub async fn load(&self) -> Result<Vec<GameRecord>> {
        let index: IndexDoc = self
            .fetch_json("index.json")
            .await
            .context("failed to fetch game index")?;

        let mut records = Vec::with_capacity(index.games.len());
        for file in &index.games {
            match self.fetch_json::<GameRecord>(file).await {
                Ok(mut record) => {
                    self.enrich(&mut record).await;
                    records.push(record);
                }
                Err(err) => warn!("Skipping {file}: {err:#}"),
            }
        }
        Ok(records)
    }

    /// Load the catalog into `store`, degrading to an empty catalog on
    /// failure. Returns the number of records loaded.
    pub async fn refresh(&self, store: &CatalogStore) -> usize {
        match self.load().await {
            Ok(records) => {
                let loaded = records.len();
                store.replace_all(records);
                info!("Loaded {loaded} games from {}", self.config.catalog_url);
                store.len()
            }
            Err(err) => {
                error!("Failed to load games: {err:#}");
                store.replace_all(Vec::new());
                0
            }
        }
    }

    /// Run one load in the background, sending the outcome to `sender`.
    pub async fn run(self, sender: mpsc::Sender<SyncEvent>) -> Result<()> {
        match self.load().await {
            Ok(records) => sender
                .send(SyncEvent::Loaded(records))
                .await
                .context("failed to send sync success event")?,
            Err(err) => {
                let _ = sender.send(SyncEvent::Error(err)).await;
            }
        }
        Ok(())
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, file: &str) -> Result<T> {
        let url = self.document_url(file);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("failed to fetch {url}"))?;
        response
            .json()
            .await
            .with_context(|| format!("failed to parse {url}"))
    }

    // Cache-busting query parameter, matching the site's fetch discipline.
    fn document_url(&self, file: &str) -> String {
        format!(
            "{}/{file}?nocache={}",
            self.config.catalog_url.trim_end_matches('/'),
            Utc::now().timestamp_millis()
        )
    }

    async fn enrich(&self, record: &mut GameRecord) {
        let aggregate = self.community.rating(&record.id).await;
        record.rating = aggregate.average;
        record.rating_count = aggregate.count;
        record.comments = self.community.comments(&record.id).await;
    }
}
