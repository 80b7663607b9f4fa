//! In-memory [`TweetService`] backed by [`DashMap`].
//!
//! Serves the binary when no external tweet store is wired in, and backs
//! the orchestrator and handler tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tweetapp_core::{DomainError, Reaction, Reply, Tweet, TweetDraft, TweetId, TweetService};

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

fn not_found(id: TweetId) -> DomainError {
    DomainError::NotFound(format!("tweet {id} not found"))
}

/// Tweets, likes, and replies held in process memory.
///
/// Only the author of a tweet may update or delete it; other authors get the
/// "nothing happened" sentinel. A user can like a given tweet once.
pub struct InMemoryTweetService {
    tweets: DashMap<TweetId, Tweet>,
    likes: DashMap<TweetId, HashSet<String>>,
    replies: RwLock<Vec<Reply>>,
    next_id: AtomicU64,
}

impl InMemoryTweetService {
    /// Creates an empty store. The first tweet gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tweets: DashMap::new(),
            likes: DashMap::new(),
            replies: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tweets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    fn newest_first(mut tweets: Vec<Tweet>) -> Vec<Tweet> {
        tweets.sort_by(|a, b| b.id.cmp(&a.id));
        tweets
    }
}

impl Default for InMemoryTweetService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TweetService for InMemoryTweetService {
    async fn post_tweet(&self, author: &str, draft: TweetDraft) -> Result<Tweet, DomainError> {
        let id = TweetId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let tweet = Tweet {
            id,
            author: author.to_string(),
            text: draft.text,
            posted_at_ms: now_millis(),
            likes: 0,
        };
        self.tweets.insert(id, tweet.clone());
        Ok(tweet)
    }

    async fn all_tweets(&self) -> Result<Vec<Tweet>, DomainError> {
        let tweets = self.tweets.iter().map(|t| t.value().clone()).collect();
        Ok(Self::newest_first(tweets))
    }

    async fn tweets_by_author(&self, author: &str) -> Result<Vec<Tweet>, DomainError> {
        let tweets = self
            .tweets
            .iter()
            .filter(|t| t.author == author)
            .map(|t| t.value().clone())
            .collect();
        Ok(Self::newest_first(tweets))
    }

    async fn update_tweet(
        &self,
        id: TweetId,
        author: &str,
        draft: TweetDraft,
    ) -> Result<Option<Tweet>, DomainError> {
        let Some(mut tweet) = self.tweets.get_mut(&id) else {
            return Ok(None);
        };
        if tweet.author != author {
            return Ok(None);
        }
        tweet.text = draft.text;
        Ok(Some(tweet.clone()))
    }

    async fn delete_tweet(&self, id: TweetId, author: &str) -> Result<bool, DomainError> {
        if self.tweets.remove_if(&id, |_, t| t.author == author).is_none() {
            return Ok(false);
        }
        self.likes.remove(&id);
        self.replies.write().retain(|r| r.tweet_id != id);
        Ok(true)
    }

    async fn reply_tweet(
        &self,
        author: &str,
        id: TweetId,
        message: String,
    ) -> Result<Reply, DomainError> {
        if !self.tweets.contains_key(&id) {
            return Err(not_found(id));
        }
        let reply = Reply {
            tweet_id: id,
            author: author.to_string(),
            message,
            replied_at_ms: now_millis(),
        };
        self.replies.write().push(reply.clone());
        Ok(reply)
    }

    async fn like_tweet(&self, author: &str, id: TweetId) -> Result<bool, DomainError> {
        // Lock order: tweet entry, then its like set.
        let Some(mut tweet) = self.tweets.get_mut(&id) else {
            return Err(not_found(id));
        };
        let inserted = self
            .likes
            .entry(id)
            .or_default()
            .insert(author.to_string());
        if inserted {
            tweet.likes += 1;
        }
        Ok(inserted)
    }

    async fn tweet(&self, id: TweetId) -> Result<Option<Tweet>, DomainError> {
        Ok(self.tweets.get(&id).map(|t| t.value().clone()))
    }

    async fn count_likes(&self, id: TweetId) -> Result<u64, DomainError> {
        self.tweets
            .get(&id)
            .map(|t| t.likes)
            .ok_or_else(|| not_found(id))
    }

    async fn reactions(&self) -> Result<Vec<Reaction>, DomainError> {
        let mut reactions: Vec<Reaction> = self
            .likes
            .iter()
            .flat_map(|entry| {
                let tweet_id = *entry.key();
                entry
                    .value()
                    .iter()
                    .map(|author| Reaction {
                        tweet_id,
                        author: author.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        reactions.sort_by(|a, b| a.tweet_id.cmp(&b.tweet_id).then_with(|| a.author.cmp(&b.author)));
        Ok(reactions)
    }

    async fn replies(&self) -> Result<Vec<Reply>, DomainError> {
        Ok(self.replies.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryTweetService, TweetId) {
        let store = InMemoryTweetService::new();
        let tweet = store
            .post_tweet("alice", TweetDraft::new("hello"))
            .await
            .unwrap();
        (store, tweet.id)
    }

    #[tokio::test]
    async fn post_assigns_sequential_ids() {
        let store = InMemoryTweetService::new();
        let a = store.post_tweet("alice", TweetDraft::new("a")).await.unwrap();
        let b = store.post_tweet("bob", TweetDraft::new("b")).await.unwrap();
        assert_eq!(a.id, TweetId(1));
        assert_eq!(b.id, TweetId(2));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn listings_are_newest_first_and_filtered() {
        let store = InMemoryTweetService::new();
        store.post_tweet("alice", TweetDraft::new("one")).await.unwrap();
        store.post_tweet("bob", TweetDraft::new("two")).await.unwrap();
        store.post_tweet("alice", TweetDraft::new("three")).await.unwrap();

        let all = store.all_tweets().await.unwrap();
        assert_eq!(
            all.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
            ["three", "two", "one"]
        );
        let alice = store.tweets_by_author("alice").await.unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|t| t.author == "alice"));
    }

    #[tokio::test]
    async fn only_author_can_update_or_delete() {
        let (store, id) = seeded().await;
        assert!(store
            .update_tweet(id, "mallory", TweetDraft::new("pwned"))
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete_tweet(id, "mallory").await.unwrap());

        let updated = store
            .update_tweet(id, "alice", TweetDraft::new("edited"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "edited");
        assert!(store.delete_tweet(id, "alice").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn missing_tweet_sentinels() {
        let store = InMemoryTweetService::new();
        assert!(!store.delete_tweet(TweetId(42), "bob").await.unwrap());
        assert!(store.tweet(TweetId(7)).await.unwrap().is_none());
        assert!(matches!(
            store.like_tweet("bob", TweetId(7)).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            store.reply_tweet("bob", TweetId(7), "hi".to_string()).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn like_is_recorded_once_per_user() {
        let (store, id) = seeded().await;
        assert!(store.like_tweet("bob", id).await.unwrap());
        assert!(!store.like_tweet("bob", id).await.unwrap());
        assert!(store.like_tweet("carol", id).await.unwrap());
        assert_eq!(store.count_likes(id).await.unwrap(), 2);

        let reactions = store.reactions().await.unwrap();
        assert_eq!(
            reactions,
            vec![
                Reaction { tweet_id: id, author: "bob".to_string() },
                Reaction { tweet_id: id, author: "carol".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn delete_drops_likes_and_replies() {
        let (store, id) = seeded().await;
        store.like_tweet("bob", id).await.unwrap();
        store.reply_tweet("bob", id, "nice".to_string()).await.unwrap();
        assert_eq!(store.replies().await.unwrap().len(), 1);

        assert!(store.delete_tweet(id, "alice").await.unwrap());
        assert!(store.reactions().await.unwrap().is_empty());
        assert!(store.replies().await.unwrap().is_empty());
    }
}
