use async_trait::async_trait;

use crate::error::DomainError;
use crate::types::{Reaction, Reply, Tweet, TweetDraft, TweetId};

/// Domain service performing the actual tweet operations.
///
/// The request orchestrator is the only caller. Implementations report
/// failures through [`DomainError`]; "nothing happened" outcomes that are not
/// errors use the sentinel return values documented per method, and the
/// orchestrator turns those into failure envelopes itself.
#[async_trait]
pub trait TweetService: Send + Sync {
    /// Create a tweet for `author`.
    async fn post_tweet(&self, author: &str, draft: TweetDraft) -> Result<Tweet, DomainError>;

    /// Every tweet, newest first.
    async fn all_tweets(&self) -> Result<Vec<Tweet>, DomainError>;

    /// Tweets written by `author`, newest first.
    async fn tweets_by_author(&self, author: &str) -> Result<Vec<Tweet>, DomainError>;

    /// Replace the text of tweet `id` owned by `author`.
    /// `Ok(None)` means nothing was updated.
    async fn update_tweet(
        &self,
        id: TweetId,
        author: &str,
        draft: TweetDraft,
    ) -> Result<Option<Tweet>, DomainError>;

    /// Delete tweet `id` owned by `author`. `Ok(false)` means nothing was deleted.
    async fn delete_tweet(&self, id: TweetId, author: &str) -> Result<bool, DomainError>;

    /// Attach a reply from `author` to tweet `id`.
    async fn reply_tweet(
        &self,
        author: &str,
        id: TweetId,
        message: String,
    ) -> Result<Reply, DomainError>;

    /// Record a like from `author` on tweet `id`. `Ok(false)` means the like
    /// was not recorded.
    async fn like_tweet(&self, author: &str, id: TweetId) -> Result<bool, DomainError>;

    /// Single tweet lookup. `Ok(None)` when it does not exist.
    async fn tweet(&self, id: TweetId) -> Result<Option<Tweet>, DomainError>;

    /// Number of likes on tweet `id`.
    async fn count_likes(&self, id: TweetId) -> Result<u64, DomainError>;

    /// Every like across all tweets.
    async fn reactions(&self) -> Result<Vec<Reaction>, DomainError>;

    /// Every reply across all tweets.
    async fn replies(&self) -> Result<Vec<Reply>, DomainError>;
}
