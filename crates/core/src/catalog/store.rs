//! Thread-safe in-memory catalog of game records.

use std::{collections::HashSet, sync::Arc};

use parking_lot::RwLock;
use tracing::warn;

use crate::models::{Comment, GameRecord, RatingAggregate};

/// Owned, shareable catalog of the current session's game records.
///
/// The record set is rebuilt fully on each load; community mutations patch
/// individual records in place between loads so views stay current without
/// refetching.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    inner: Arc<RwLock<Vec<GameRecord>>>,
}

impl CatalogStore {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole record set.
    ///
    /// Identifiers must be unique within the catalog; a duplicate id keeps
    /// the first record and drops the rest with a warning.
    pub fn replace_all(&self, records: Vec<GameRecord>) {
        let mut seen = HashSet::with_capacity(records.len());
        let mut deduped = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.id.clone()) {
                deduped.push(record);
            } else {
                warn!("Dropping duplicate game record {}", record.id);
            }
        }
        *self.inner.write() = deduped;
    }

    /// Snapshot of all records in load order.
    pub fn games(&self) -> Vec<GameRecord> {
        self.inner.read().clone()
    }

    /// Look up a single record by id.
    pub fn get(&self, game_id: &str) -> Option<GameRecord> {
        self.inner
            .read()
            .iter()
            .find(|record| record.id == game_id)
            .cloned()
    }

    /// Number of records in the catalog.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Patch the derived rating fields of one record. Returns whether the
    /// record was found.
    pub fn apply_rating(&self, game_id: &str, aggregate: &RatingAggregate) -> bool {
        let mut records = self.inner.write();
        match records.iter_mut().find(|record| record.id == game_id) {
            Some(record) => {
                record.rating = aggregate.average;
                record.rating_count = aggregate.count;
                true
            }
            None => false,
        }
    }

    /// Replace the derived comment list of one record. Returns whether the
    /// record was found.
    pub fn apply_comments(&self, game_id: &str, comments: Vec<Comment>) -> bool {
        let mut records = self.inner.write();
        match records.iter_mut().find(|record| record.id == game_id) {
            Some(record) => {
                record.comments = comments;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> GameRecord {
        serde_json::from_value(json!({"id": id, "title": format!("Game {id}")}))
            .expect("record should deserialize")
    }

    #[test]
    fn replace_all_dedupes_by_id_keeping_the_first() {
        let store = CatalogStore::new();
        let mut duplicate = record("a");
        duplicate.title = "Impostor".to_string();
        store.replace_all(vec![record("a"), record("b"), duplicate]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().title, "Game a");
    }

    #[test]
    fn rating_patch_updates_derived_fields() {
        let store = CatalogStore::new();
        store.replace_all(vec![record("a")]);

        let aggregate = RatingAggregate {
            total: 9,
            count: 2,
            average: 4.5,
        };
        assert!(store.apply_rating("a", &aggregate));
        let game = store.get("a").unwrap();
        assert_eq!(game.rating, 4.5);
        assert_eq!(game.rating_count, 2);

        assert!(!store.apply_rating("missing", &aggregate));
    }

    #[test]
    fn reload_replaces_rather_than_merges() {
        let store = CatalogStore::new();
        store.replace_all(vec![record("a"), record("b")]);
        store.replace_all(vec![record("c")]);
        assert_eq!(store.len(), 1);
        assert!(store.get("a").is_none());
        assert!(!store.is_empty());
    }
}
