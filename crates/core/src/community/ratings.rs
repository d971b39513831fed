//! Rating aggregation, comments and the recently-viewed tracker.

use chrono::Utc;
use rand::Rng;

use crate::models::{Comment, RatingAggregate};
use crate::storage::JsonStore;

use super::{CommunityError, MAX_COMMENT_LEN};

/// Most recent comments shown per game; storage itself is uncapped.
pub const COMMENT_DISPLAY_LIMIT: usize = 10;

/// Bound on the recently-viewed list.
pub const RECENTLY_VIEWED_LIMIT: usize = 10;

const RECENTLY_VIEWED_KEY: &str = "recently_viewed";

/// Read-modify-write operations over the per-game community aggregates.
///
/// All operations are serialised by the single-threaded event model of the
/// caller; there is no cross-client locking. Two rapid submissions for the
/// same game can lose an update, which is accepted for single-client,
/// deployment-scoped storage.
#[derive(Debug, Clone)]
pub struct Community {
    store: JsonStore,
}

impl Community {
    /// Create a community hub over the given store.
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    fn ratings_key(game_id: &str) -> String {
        format!("ratings_{game_id}")
    }

    fn user_rating_key(game_id: &str) -> String {
        format!("user_rating_{game_id}")
    }

    fn comments_key(game_id: &str) -> String {
        format!("comments_{game_id}")
    }

    /// Current rating aggregate for a game, zeroed when absent.
    pub async fn rating(&self, game_id: &str) -> RatingAggregate {
        self.store
            .get(&Self::ratings_key(game_id))
            .await
            .unwrap_or_default()
    }

    /// The current client's own latest rating for a game, if any.
    pub async fn own_rating(&self, game_id: &str) -> Option<u8> {
        self.store.get(&Self::user_rating_key(game_id)).await
    }

    /// Record a star rating and return the updated aggregate.
    ///
    /// Adds `stars` to the running sum, bumps the count and recomputes the
    /// average; the client's own latest rating is persisted separately and
    /// overwritten. A client that re-rates keeps adding to the aggregate;
    /// that inflation matches the site behaviour and is documented rather
    /// than corrected here.
    pub async fn submit_rating(
        &self,
        game_id: &str,
        stars: u8,
    ) -> Result<RatingAggregate, CommunityError> {
        if !(1..=5).contains(&stars) {
            return Err(CommunityError::InvalidRating(stars));
        }

        let mut aggregate = self.rating(game_id).await;
        aggregate.total += u64::from(stars);
        aggregate.count += 1;
        aggregate.recompute();

        self.store.set(&Self::ratings_key(game_id), &aggregate).await?;
        self.store.set(&Self::user_rating_key(game_id), &stars).await?;
        Ok(aggregate)
    }

    /// Full comment list for a game, most recent first.
    pub async fn comments(&self, game_id: &str) -> Vec<Comment> {
        self.store
            .get(&Self::comments_key(game_id))
            .await
            .unwrap_or_default()
    }

    /// The display slice of the comment list.
    pub async fn latest_comments(&self, game_id: &str) -> Vec<Comment> {
        let mut comments = self.comments(game_id).await;
        comments.truncate(COMMENT_DISPLAY_LIMIT);
        comments
    }

    /// Attach a comment to a game and return it.
    ///
    /// The body is trimmed; empty bodies and bodies over
    /// [`MAX_COMMENT_LEN`] characters are rejected. The author label is a
    /// fresh pseudo-random session tag, not an identity.
    pub async fn add_comment(
        &self,
        game_id: &str,
        text: &str,
    ) -> Result<Comment, CommunityError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CommunityError::EmptyComment);
        }
        let length = trimmed.chars().count();
        if length > MAX_COMMENT_LEN {
            return Err(CommunityError::CommentTooLong(length));
        }

        let comment = Comment {
            author: format!("User{}", rand::thread_rng().gen_range(0..10_000)),
            text: trimmed.to_string(),
            time: Utc::now(),
        };

        let mut comments = self.comments(game_id).await;
        comments.insert(0, comment.clone());
        self.store.set(&Self::comments_key(game_id), &comments).await?;
        Ok(comment)
    }

    /// Record a game view: dedupe, prepend, keep the most recent
    /// [`RECENTLY_VIEWED_LIMIT`] ids.
    pub async fn track_recently_viewed(
        &self,
        game_id: &str,
    ) -> Result<Vec<String>, CommunityError> {
        let mut recent: Vec<String> = self
            .store
            .get(RECENTLY_VIEWED_KEY)
            .await
            .unwrap_or_default();
        recent.retain(|id| id != game_id);
        recent.insert(0, game_id.to_string());
        recent.truncate(RECENTLY_VIEWED_LIMIT);
        self.store.set(RECENTLY_VIEWED_KEY, &recent).await?;
        Ok(recent)
    }

    /// Most-recent-first list of viewed game ids.
    pub async fn recently_viewed(&self) -> Vec<String> {
        self.store.get(RECENTLY_VIEWED_KEY).await.unwrap_or_default()
    }
}
