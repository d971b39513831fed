//! Shared domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed category set used across the catalog.
///
/// Unknown or absent categories normalise to [`Category::Other`] when a
/// record is deserialised, never later at query time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Simulation games.
    Simulator,
    /// Obstacle-course games.
    Obby,
    /// Role-playing games.
    #[serde(rename = "RPG")]
    Rpg,
    /// Tycoon/management games.
    Tycoon,
    /// Horror games.
    Horror,
    /// Fighting games.
    Fighting,
    /// Everything else.
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// All categories in their display order.
    pub const ALL: [Category; 7] = [
        Category::Simulator,
        Category::Obby,
        Category::Rpg,
        Category::Tycoon,
        Category::Horror,
        Category::Fighting,
        Category::Other,
    ];

    /// Display label, matching the wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Simulator => "Simulator",
            Category::Obby => "Obby",
            Category::Rpg => "RPG",
            Category::Tycoon => "Tycoon",
            Category::Horror => "Horror",
            Category::Fighting => "Fighting",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single frequently-asked-question entry attached to a game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaqEntry {
    /// The question text.
    pub question: String,
    /// The answer text.
    pub answer: String,
}

/// A game record as published in the per-game catalog documents.
///
/// The `rating`, `rating_count` and `comments` fields are derived from the
/// community storage after load and are never part of the canonical document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    /// Unique, immutable identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Category, defaulting to `Other` when absent.
    #[serde(default)]
    pub category: Category,
    /// Price in the site currency; zero means free.
    #[serde(default)]
    pub price: f64,
    /// Download counter, treated as an opaque integer.
    #[serde(default)]
    pub downloads: u64,
    /// Calendar timestamp when the game was added, kept as published.
    #[serde(default)]
    pub date_added: String,
    /// Calendar timestamp of the last update, kept as published.
    #[serde(default)]
    pub last_updated: String,
    /// Primary image reference.
    #[serde(default)]
    pub image: Option<String>,
    /// Additional image references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Link to the downloadable artifact.
    #[serde(default)]
    pub download_link: Option<String>,
    /// Optional video reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Optional FAQ entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faq: Vec<FaqEntry>,
    /// Derived average rating, populated from storage.
    #[serde(skip)]
    pub rating: f64,
    /// Derived rating submission count, populated from storage.
    #[serde(skip)]
    pub rating_count: u64,
    /// Derived comment list, populated from storage (most recent first).
    #[serde(skip)]
    pub comments: Vec<Comment>,
}

impl GameRecord {
    /// Parsed `date_added`, or `None` when the published value is unusable.
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.date_added)
    }

    /// Parsed `last_updated`, or `None` when the published value is unusable.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_updated)
    }

    /// Whether the game is free.
    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }
}

/// Parse a published timestamp leniently: RFC 3339 first, then a bare
/// `YYYY-MM-DD` calendar date interpreted as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

/// Per-game running rating aggregate persisted in storage.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RatingAggregate {
    /// Running sum of submitted star ratings.
    pub total: u64,
    /// Number of submissions.
    pub count: u64,
    /// Derived mean, always recomputed from `total` and `count`.
    pub average: f64,
}

impl RatingAggregate {
    /// Recompute the average from the running sum and count.
    pub fn recompute(&mut self) {
        self.average = if self.count == 0 {
            0.0
        } else {
            self.total as f64 / self.count as f64
        };
    }
}

/// A user comment attached to a game (most recent first in storage).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    /// Session-generated author label, not a stable identity.
    pub author: String,
    /// Comment body.
    pub text: String,
    /// Creation timestamp.
    pub time: DateTime<Utc>,
}

/// A game suggestion submitted by a visitor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestEntry {
    /// Identifier derived from the creation time (milliseconds since epoch).
    pub id: i64,
    /// Free-text suggestion.
    pub text: String,
    /// Vote counter, monotonically incremented.
    pub votes: u64,
    /// Creation timestamp.
    pub time: DateTime<Utc>,
}

/// Payload describing a game submitted through the submission form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSubmission {
    /// Proposed title.
    pub title: String,
    /// Proposed description.
    pub description: String,
    /// Proposed category.
    pub category: Category,
    /// Image URL for the listing.
    pub image_url: String,
    /// Optional video URL.
    pub video_url: Option<String>,
    /// When the form was submitted.
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_category_normalises_to_other() {
        let record: GameRecord = serde_json::from_value(json!({
            "id": "g1",
            "title": "Mystery",
            "category": "Roguelike"
        }))
        .expect("record should deserialize");
        assert_eq!(record.category, Category::Other);

        let record: GameRecord = serde_json::from_value(json!({
            "id": "g2",
            "title": "Uncategorised"
        }))
        .expect("record should deserialize");
        assert_eq!(record.category, Category::Other);
    }

    #[test]
    fn category_round_trips_wire_names() {
        let value = serde_json::to_value(Category::Rpg).expect("serialize");
        assert_eq!(value, json!("RPG"));
        let parsed: Category = serde_json::from_value(json!("RPG")).expect("deserialize");
        assert_eq!(parsed, Category::Rpg);
    }

    #[test]
    fn timestamps_parse_leniently() {
        assert!(parse_timestamp("2025-03-14").is_some());
        assert!(parse_timestamp("2025-03-14T09:26:53Z").is_some());
        assert!(parse_timestamp("not a date").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn aggregate_average_follows_total_and_count() {
        let mut aggregate = RatingAggregate::default();
        assert_eq!(aggregate.average, 0.0);
        aggregate.total = 9;
        aggregate.count = 2;
        aggregate.recompute();
        assert_eq!(aggregate.average, 4.5);
    }
}
