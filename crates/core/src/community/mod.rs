//! User-generated data: ratings, comments, recently-viewed and requests.

pub mod ratings;
pub mod requests;

pub use ratings::Community;
pub use requests::RequestBoard;

use thiserror::Error;

/// Maximum accepted comment length, in characters.
pub const MAX_COMMENT_LEN: usize = 500;

/// Validation and persistence failures at the community boundary.
///
/// Invalid user input is rejected here and never escapes as a panic.
#[derive(Debug, Error)]
pub enum CommunityError {
    /// Star rating outside the accepted 1..=5 range.
    #[error("rating must be between 1 and 5 stars, got {0}")]
    InvalidRating(u8),
    /// Empty or whitespace-only comment body.
    #[error("comment text must not be empty")]
    EmptyComment,
    /// Comment body over [`MAX_COMMENT_LEN`] characters.
    #[error("comment text exceeds {MAX_COMMENT_LEN} characters (got {0})")]
    CommentTooLong(usize),
    /// Empty or whitespace-only request text.
    #[error("request text must not be empty")]
    EmptyRequest,
    /// Underlying storage write failure.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
