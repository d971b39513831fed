//! The query engine: pure filtering and sorting over game records.
//!
//! Every function here is referentially transparent: the input slice and its
//! records are never mutated, and the same inputs always produce the same
//! ordered view. All sorts are stable, so records with equal keys keep their
//! relative input order and repeated queries paginate deterministically.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::models::{Category, GameRecord};

/// Reference instant for the trending score. Fixed so that scores stay
/// comparable across runs.
static TRENDING_EPOCH: Lazy<DateTime<Utc>> = Lazy::new(|| {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .expect("valid trending epoch")
});

const SECONDS_PER_YEAR: f64 = 365.0 * 86_400.0;

/// Filter parameters applied conjunctively to the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterSpec {
    /// Category to match exactly; `None` means "All".
    pub category: Option<Category>,
    /// Inclusive lower bound on `date_added`.
    pub added_from: Option<NaiveDate>,
    /// Inclusive upper bound on `date_added`.
    pub added_to: Option<NaiveDate>,
    /// Minimum download count.
    pub min_downloads: Option<u64>,
    /// Case-insensitive substring search over title, description and category.
    pub search: Option<String>,
}

impl FilterSpec {
    /// Parse a user-supplied download threshold. A value that fails integer
    /// parsing means "no threshold", matching the form semantics.
    pub fn parse_min_downloads(raw: &str) -> Option<u64> {
        raw.trim().parse().ok()
    }

    /// Whether a record satisfies every active predicate.
    pub fn matches(&self, game: &GameRecord) -> bool {
        if let Some(category) = self.category {
            if game.category != category {
                return false;
            }
        }

        if self.added_from.is_some() || self.added_to.is_some() {
            // A record whose date does not parse cannot satisfy a range
            // bound, so it is filtered out rather than silently passed.
            let Some(added) = game.added_at().map(|ts| ts.date_naive()) else {
                return false;
            };
            if let Some(from) = self.added_from {
                if added < from {
                    return false;
                }
            }
            if let Some(to) = self.added_to {
                if added > to {
                    return false;
                }
            }
        }

        if let Some(min) = self.min_downloads {
            if game.downloads < min {
                return false;
            }
        }

        if let Some(query) = self.search.as_deref() {
            let needle = query.trim().to_lowercase();
            if !needle.is_empty() && !text_matches(game, &needle) {
                return false;
            }
        }

        true
    }
}

fn text_matches(game: &GameRecord, needle: &str) -> bool {
    game.title.to_lowercase().contains(needle)
        || game.description.to_lowercase().contains(needle)
        || game.category.as_str().to_lowercase().contains(needle)
}

/// Sort orders supported by the catalog views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Composite popularity/recency score, descending.
    Trending,
    /// Download count, descending.
    Downloads,
    /// `date_added`, most recent first.
    Newest,
    /// `date_added`, oldest first.
    Oldest,
    /// Average rating, descending.
    Rating,
    /// Search relevance weight, descending.
    Relevance,
}

impl SortKey {
    /// Default order for the general catalog view.
    pub const CATALOG_DEFAULT: SortKey = SortKey::Trending;
    /// Default order for the search-results view.
    pub const SEARCH_DEFAULT: SortKey = SortKey::Relevance;
}

/// Composite trending score: `downloads × (1 + age_factor)` where
/// `age_factor` counts 365-day years between the fixed epoch and
/// `last_updated`. An unparseable `last_updated` contributes no age factor.
pub fn trending_score(game: &GameRecord) -> f64 {
    let age_factor = game
        .updated_at()
        .map(|ts| (ts - *TRENDING_EPOCH).num_seconds() as f64 / SECONDS_PER_YEAR)
        .unwrap_or(0.0);
    game.downloads as f64 * (1.0 + age_factor)
}

/// Relevance weight of a record for a lower-cased search needle.
///
/// Title matches outrank category matches, which outrank description-only
/// matches. The weight is a transient side channel used for the
/// [`SortKey::Relevance`] order only; it is never stored on the record.
pub fn relevance_weight(game: &GameRecord, needle: &str) -> u32 {
    let mut weight = 0;
    if game.title.to_lowercase().contains(needle) {
        weight += 4;
    }
    if game.category.as_str().to_lowercase().contains(needle) {
        weight += 2;
    }
    if game.description.to_lowercase().contains(needle) {
        weight += 1;
    }
    weight
}

/// Filter and sort the catalog into an ordered view.
///
/// The returned view is a subset of `games` in which every record satisfies
/// every active filter predicate. The input is left untouched.
pub fn filter_and_sort(games: &[GameRecord], filter: &FilterSpec, sort: SortKey) -> Vec<GameRecord> {
    let mut view: Vec<GameRecord> = games
        .iter()
        .filter(|game| filter.matches(game))
        .cloned()
        .collect();

    match sort {
        SortKey::Downloads => view.sort_by(|a, b| b.downloads.cmp(&a.downloads)),
        SortKey::Newest => view.sort_by_key(|game| std::cmp::Reverse(added_sort_key(game))),
        SortKey::Oldest => view.sort_by_key(added_sort_key),
        SortKey::Rating => view.sort_by(|a, b| descending(a.rating, b.rating)),
        SortKey::Trending => view.sort_by(|a, b| descending(trending_score(a), trending_score(b))),
        SortKey::Relevance => {
            let needle = filter
                .search
                .as_deref()
                .map(|query| query.trim().to_lowercase())
                .unwrap_or_default();
            let mut ranked: Vec<(u32, GameRecord)> = view
                .into_iter()
                .map(|game| (relevance_weight(&game, &needle), game))
                .collect();
            ranked.sort_by(|a, b| b.0.cmp(&a.0));
            view = ranked.into_iter().map(|(_, game)| game).collect();
        }
    }

    view
}

fn added_sort_key(game: &GameRecord) -> i64 {
    // Records with unusable dates sort after everything else on Newest and
    // before everything else on Oldest.
    game.added_at()
        .map(|ts| ts.timestamp())
        .unwrap_or(i64::MIN)
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Headline statistics over the whole catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of games in the catalog.
    pub games: usize,
    /// Sum of all download counters.
    pub total_downloads: u64,
    /// Mean of the per-game average ratings, zero for an empty catalog.
    pub average_rating: f64,
}

/// Compute headline statistics for the leaderboard panel.
pub fn catalog_stats(games: &[GameRecord]) -> CatalogStats {
    if games.is_empty() {
        return CatalogStats::default();
    }
    let total_downloads = games.iter().map(|game| game.downloads).sum();
    let rating_sum: f64 = games.iter().map(|game| game.rating).sum();
    CatalogStats {
        games: games.len(),
        total_downloads,
        average_rating: rating_sum / games.len() as f64,
    }
}

/// Top `n` games by download count.
pub fn top_by_downloads(games: &[GameRecord], n: usize) -> Vec<GameRecord> {
    let mut view = games.to_vec();
    view.sort_by(|a, b| b.downloads.cmp(&a.downloads));
    view.truncate(n);
    view
}

/// Top `n` games by average rating.
pub fn top_by_rating(games: &[GameRecord], n: usize) -> Vec<GameRecord> {
    let mut view = games.to_vec();
    view.sort_by(|a, b| descending(a.rating, b.rating));
    view.truncate(n);
    view
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str, category: Category, downloads: u64) -> GameRecord {
        GameRecord {
            id: id.to_string(),
            title: format!("Game {id}"),
            description: String::new(),
            category,
            price: 0.0,
            downloads,
            date_added: "2025-02-01".to_string(),
            last_updated: "2025-02-01".to_string(),
            image: None,
            images: Vec::new(),
            download_link: None,
            video: None,
            faq: Vec::new(),
            rating: 0.0,
            rating_count: 0,
            comments: Vec::new(),
        }
    }

    fn sample_catalog() -> Vec<GameRecord> {
        vec![
            game("a", Category::Rpg, 100),
            game("b", Category::Obby, 50),
        ]
    }

    #[test]
    fn category_filter_selects_exact_matches() {
        let games = sample_catalog();
        let filter = FilterSpec {
            category: Some(Category::Rpg),
            ..FilterSpec::default()
        };
        let view = filter_and_sort(&games, &filter, SortKey::Downloads);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "a");
    }

    #[test]
    fn downloads_sort_is_descending() {
        let games = sample_catalog();
        let view = filter_and_sort(&games, &FilterSpec::default(), SortKey::Downloads);
        let ids: Vec<_> = view.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn filters_are_conjunctive_and_yield_a_subset() {
        let mut games = sample_catalog();
        games.push(game("c", Category::Rpg, 10));
        let filter = FilterSpec {
            category: Some(Category::Rpg),
            min_downloads: Some(50),
            ..FilterSpec::default()
        };
        let view = filter_and_sort(&games, &filter, SortKey::Downloads);
        assert!(view.iter().all(|g| g.category == Category::Rpg));
        assert!(view.iter().all(|g| g.downloads >= 50));
        assert!(view.len() <= games.len());
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn input_collection_is_untouched() {
        let games = sample_catalog();
        let before: Vec<_> = games.iter().map(|g| g.id.clone()).collect();
        let _ = filter_and_sort(&games, &FilterSpec::default(), SortKey::Trending);
        let after: Vec<_> = games.iter().map(|g| g.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn unparseable_dates_are_excluded_from_range_filters() {
        let mut broken = game("broken", Category::Other, 10);
        broken.date_added = "soon(tm)".to_string();
        let games = vec![game("ok", Category::Other, 10), broken];
        let filter = FilterSpec {
            added_from: Some(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
            ..FilterSpec::default()
        };
        let view = filter_and_sort(&games, &filter, SortKey::Newest);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].id, "ok");
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let games = sample_catalog();
        let day = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let filter = FilterSpec {
            added_from: Some(day),
            added_to: Some(day),
            ..FilterSpec::default()
        };
        let view = filter_and_sort(&games, &filter, SortKey::Newest);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn threshold_parsing_tolerates_garbage() {
        assert_eq!(FilterSpec::parse_min_downloads(" 500 "), Some(500));
        assert_eq!(FilterSpec::parse_min_downloads("lots"), None);
        assert_eq!(FilterSpec::parse_min_downloads(""), None);
    }

    #[test]
    fn search_matches_title_description_and_category() {
        let mut games = sample_catalog();
        games[1].description = "a sprawling rpg epic".to_string();
        let filter = FilterSpec {
            search: Some("RPG".to_string()),
            ..FilterSpec::default()
        };
        let view = filter_and_sort(&games, &filter, SortKey::Relevance);
        // "a" matches on category, "b" on description only.
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].id, "a");
    }

    #[test]
    fn relevance_prefers_title_matches() {
        let mut title_hit = game("t", Category::Other, 0);
        title_hit.title = "Dungeon Crawler".to_string();
        let mut description_hit = game("d", Category::Other, 0);
        description_hit.description = "crawler through dungeons".to_string();
        assert!(relevance_weight(&title_hit, "crawler") > relevance_weight(&description_hit, "crawler"));
    }

    #[test]
    fn trending_prefers_recency_at_equal_downloads() {
        let mut fresh = game("fresh", Category::Other, 100);
        fresh.last_updated = "2025-06-01".to_string();
        let mut stale = game("stale", Category::Other, 100);
        stale.last_updated = "2025-01-10".to_string();
        let view = filter_and_sort(
            &[stale, fresh],
            &FilterSpec::default(),
            SortKey::Trending,
        );
        assert_eq!(view[0].id, "fresh");
    }

    #[test]
    fn trending_prefers_downloads_at_equal_recency() {
        let popular = game("popular", Category::Other, 500);
        let niche = game("niche", Category::Other, 20);
        let view = filter_and_sort(
            &[niche, popular],
            &FilterSpec::default(),
            SortKey::Trending,
        );
        assert_eq!(view[0].id, "popular");
    }

    #[test]
    fn sorting_is_a_stable_permutation() {
        let games: Vec<GameRecord> = (0..6)
            .map(|i| game(&format!("g{i}"), Category::Other, 42))
            .collect();
        let once = filter_and_sort(&games, &FilterSpec::default(), SortKey::Downloads);
        let twice = filter_and_sort(&once, &FilterSpec::default(), SortKey::Downloads);
        let input_ids: Vec<_> = games.iter().map(|g| g.id.clone()).collect();
        let once_ids: Vec<_> = once.iter().map(|g| g.id.clone()).collect();
        let twice_ids: Vec<_> = twice.iter().map(|g| g.id.clone()).collect();
        // Equal keys keep input order, and re-sorting changes nothing.
        assert_eq!(input_ids, once_ids);
        assert_eq!(once_ids, twice_ids);
    }

    #[test]
    fn leaderboards_and_stats() {
        let mut games = sample_catalog();
        games[0].rating = 4.5;
        games[1].rating = 2.5;
        let top = top_by_downloads(&games, 1);
        assert_eq!(top[0].id, "a");
        let top = top_by_rating(&games, 1);
        assert_eq!(top[0].id, "a");
        let stats = catalog_stats(&games);
        assert_eq!(stats.games, 2);
        assert_eq!(stats.total_downloads, 150);
        assert!((stats.average_rating - 3.5).abs() < f64::EPSILON);
        assert_eq!(catalog_stats(&[]), CatalogStats::default());
    }
}
