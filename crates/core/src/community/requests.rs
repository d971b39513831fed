//! The game-request board: suggestions and voting.

use chrono::Utc;

use crate::models::RequestEntry;
use crate::storage::JsonStore;

use super::CommunityError;

/// Requests shown on the board; storage itself is uncapped.
pub const REQUEST_DISPLAY_LIMIT: usize = 20;

const REQUESTS_KEY: &str = "game_requests";

/// Persisted list of game suggestions with vote counts.
#[derive(Debug, Clone)]
pub struct RequestBoard {
    store: JsonStore,
}

impl RequestBoard {
    /// Create a board over the given store.
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// All stored requests, newest first.
    pub async fn all(&self) -> Vec<RequestEntry> {
        self.store.get(REQUESTS_KEY).await.unwrap_or_default()
    }

    /// The display slice: top `n` requests by vote count.
    pub async fn top(&self, n: usize) -> Vec<RequestEntry> {
        let mut requests = self.all().await;
        requests.sort_by(|a, b| b.votes.cmp(&a.votes));
        requests.truncate(n);
        requests
    }

    /// Submit a new suggestion and return the stored entry.
    ///
    /// The id is derived from the creation time in milliseconds.
    pub async fn submit(&self, text: &str) -> Result<RequestEntry, CommunityError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CommunityError::EmptyRequest);
        }

        let mut requests = self.all().await;
        let now = Utc::now();
        let mut id = now.timestamp_millis();
        // Two submissions can land in the same millisecond; keep ids unique.
        while requests.iter().any(|entry| entry.id == id) {
            id += 1;
        }
        let entry = RequestEntry {
            id,
            text: trimmed.to_string(),
            votes: 0,
            time: now,
        };

        requests.insert(0, entry.clone());
        self.store.set(REQUESTS_KEY, &requests).await?;
        Ok(entry)
    }

    /// Add one vote to the matching request.
    ///
    /// An unknown id is a silent miss, not an error: the list may have been
    /// cleared externally. Returns whether a request was updated.
    pub async fn vote(&self, request_id: i64) -> Result<bool, CommunityError> {
        let mut requests = self.all().await;
        let Some(entry) = requests.iter_mut().find(|entry| entry.id == request_id) else {
            return Ok(false);
        };
        entry.votes += 1;
        self.store.set(REQUESTS_KEY, &requests).await?;
        Ok(true)
    }
}
