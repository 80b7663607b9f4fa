use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum number of characters accepted for tweet text and reply messages.
pub const MAX_TEXT_LENGTH: usize = 144;

/// Identifier of a stored tweet.
///
/// Parsed from the `{id}` path segment of the caller-facing routes, so the
/// `FromStr` impl is the single place where a raw id becomes a typed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TweetId(pub u64);

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TweetId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(TweetId)
    }
}

/// A short text post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    pub id: TweetId,
    /// Handle of the author.
    pub author: String,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub posted_at_ms: u64,
    /// Number of likes at the time the tweet was read.
    pub likes: u64,
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetDraft {
    pub text: String,
}

impl TweetDraft {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Body of a reply request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyBody {
    pub message: String,
}

/// A reply attached to a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub tweet_id: TweetId,
    /// Handle of the replying user.
    pub author: String,
    pub message: String,
    /// Milliseconds since the Unix epoch.
    pub replied_at_ms: u64,
}

/// A single like left by `author` on `tweet_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub tweet_id: TweetId,
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tweet_id_parses_trimmed_digits() {
        assert_eq!(" 42 ".parse::<TweetId>().unwrap(), TweetId(42));
    }

    #[test]
    fn tweet_id_rejects_negative_and_garbage() {
        assert!("-7".parse::<TweetId>().is_err());
        assert!("abc".parse::<TweetId>().is_err());
        assert!("".parse::<TweetId>().is_err());
    }

    #[test]
    fn tweet_serializes_camel_case() {
        let tweet = Tweet {
            id: TweetId(1),
            author: "alice".to_string(),
            text: "hello".to_string(),
            posted_at_ms: 10,
            likes: 0,
        };
        let json = serde_json::to_value(&tweet).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["postedAtMs"], 10);
        assert_eq!(json["text"], "hello");
    }
}
