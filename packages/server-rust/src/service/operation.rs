//! Typed operations, their per-kind envelope policy, and pipeline errors.

use tweetapp_core::{DomainError, Payload, TweetDraft, TweetId};

use super::classify::ClassifyError;

/// Every action exposed on the caller-facing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    CreateTweet,
    ListTweets,
    ListTweetsByAuthor,
    UpdateTweet,
    DeleteTweet,
    ReplyTweet,
    LikeTweet,
    GetTweet,
    CountLikes,
    ListReactions,
    ListReplies,
}

impl OperationKind {
    pub const ALL: [OperationKind; 11] = [
        Self::CreateTweet,
        Self::ListTweets,
        Self::ListTweetsByAuthor,
        Self::UpdateTweet,
        Self::DeleteTweet,
        Self::ReplyTweet,
        Self::LikeTweet,
        Self::GetTweet,
        Self::CountLikes,
        Self::ListReactions,
        Self::ListReplies,
    ];

    /// Stable name used in logs and metric labels.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateTweet => "create_tweet",
            Self::ListTweets => "list_tweets",
            Self::ListTweetsByAuthor => "list_tweets_by_author",
            Self::UpdateTweet => "update_tweet",
            Self::DeleteTweet => "delete_tweet",
            Self::ReplyTweet => "reply_tweet",
            Self::LikeTweet => "like_tweet",
            Self::GetTweet => "get_tweet",
            Self::CountLikes => "count_likes",
            Self::ListReactions => "list_reactions",
            Self::ListReplies => "list_replies",
        }
    }

    /// Whether a completed operation publishes its display message.
    ///
    /// State-mutating and primary-listing operations notify; single-tweet
    /// lookups, counts, and aggregate listings do not.
    #[must_use]
    pub const fn notifies(self) -> bool {
        !matches!(
            self,
            Self::GetTweet | Self::CountLikes | Self::ListReactions | Self::ListReplies
        )
    }

    #[must_use]
    pub const fn success_message(self) -> &'static str {
        match self {
            Self::CreateTweet => "Tweet posted successfully",
            Self::ListTweets => "List of tweets fetched successfully",
            Self::ListTweetsByAuthor => "List of user tweets fetched successfully",
            Self::UpdateTweet => "Tweet updated successfully",
            Self::DeleteTweet => "Tweet deleted successfully",
            Self::ReplyTweet => "Replied Successfully",
            Self::LikeTweet => "Tweet liked successfully",
            Self::GetTweet => "Tweet fetched successfully",
            Self::CountLikes => "Tweet Count fetched successfully",
            Self::ListReactions => "Reactions fetched",
            Self::ListReplies => "Replies fetched",
        }
    }

    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::CreateTweet | Self::ListTweets | Self::ListTweetsByAuthor => {
                "Something went wrong!"
            }
            Self::UpdateTweet => {
                "Something went wrong while updating tweet! Please try again later."
            }
            Self::DeleteTweet => {
                "Something went wrong while deleting tweet! Please try again later."
            }
            Self::ReplyTweet => {
                "Something went wrong while replying the tweet! Please try again later."
            }
            Self::LikeTweet => "Something went wrong while liking the tweet! Please try again later.",
            Self::GetTweet => {
                "Something went wrong while displaying the tweet! Please try again later."
            }
            Self::CountLikes | Self::ListReactions | Self::ListReplies => "Something went wrong.",
        }
    }

    /// Result placed in a failure envelope. `None` leaves it absent.
    #[must_use]
    pub fn failure_result(self) -> Option<Payload> {
        match self {
            Self::DeleteTweet
            | Self::LikeTweet
            | Self::GetTweet
            | Self::CountLikes
            | Self::ListReactions
            | Self::ListReplies => Some(Payload::Flag(false)),
            Self::CreateTweet
            | Self::ListTweets
            | Self::ListTweetsByAuthor
            | Self::UpdateTweet
            | Self::ReplyTweet => None,
        }
    }
}

/// Context carried with every operation through the pipeline.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub call_id: u64,
    pub kind: OperationKind,
    /// Value of the `x-request-id` header, when the transport supplied one.
    pub request_id: Option<String>,
    /// Upper bound for the domain call.
    pub call_timeout_ms: u64,
}

impl OperationContext {
    #[must_use]
    pub fn new(call_id: u64, kind: OperationKind, call_timeout_ms: u64) -> Self {
        Self {
            call_id,
            kind,
            request_id: None,
            call_timeout_ms,
        }
    }
}

/// Validated operation, ready to be dispatched to the domain service.
#[derive(Debug, Clone)]
pub enum Operation {
    CreateTweet {
        ctx: OperationContext,
        author: String,
        draft: TweetDraft,
    },
    ListTweets {
        ctx: OperationContext,
    },
    ListTweetsByAuthor {
        ctx: OperationContext,
        author: String,
    },
    UpdateTweet {
        ctx: OperationContext,
        author: String,
        id: TweetId,
        draft: TweetDraft,
    },
    DeleteTweet {
        ctx: OperationContext,
        author: String,
        id: TweetId,
    },
    ReplyTweet {
        ctx: OperationContext,
        author: String,
        id: TweetId,
        message: String,
    },
    LikeTweet {
        ctx: OperationContext,
        author: String,
        id: TweetId,
    },
    GetTweet {
        ctx: OperationContext,
        id: TweetId,
    },
    CountLikes {
        ctx: OperationContext,
        id: TweetId,
    },
    ListReactions {
        ctx: OperationContext,
    },
    ListReplies {
        ctx: OperationContext,
    },
}

impl Operation {
    #[must_use]
    pub fn ctx(&self) -> &OperationContext {
        match self {
            Self::CreateTweet { ctx, .. }
            | Self::ListTweets { ctx }
            | Self::ListTweetsByAuthor { ctx, .. }
            | Self::UpdateTweet { ctx, .. }
            | Self::DeleteTweet { ctx, .. }
            | Self::ReplyTweet { ctx, .. }
            | Self::LikeTweet { ctx, .. }
            | Self::GetTweet { ctx, .. }
            | Self::CountLikes { ctx, .. }
            | Self::ListReactions { ctx }
            | Self::ListReplies { ctx } => ctx,
        }
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.ctx().kind
    }
}

/// Errors raised by the pipeline around the orchestrator.
///
/// These never reach the caller directly: the transport converts them into
/// failure envelopes through [`OperationFailure`].
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("server overloaded, try again later")]
    Overloaded,
}

/// Why an operation concluded on the failure branch.
///
/// The `Display` output is the single detail recorded in the envelope.
#[derive(Debug, thiserror::Error)]
pub enum OperationFailure {
    #[error(transparent)]
    Invalid(#[from] ClassifyError),
    #[error("{}", .0.detail())]
    Domain(#[from] DomainError),
    /// The domain call finished cleanly but returned its "nothing happened" value.
    #[error("{0}")]
    NotApplied(&'static str),
    #[error("operation timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
    #[error(transparent)]
    Pipeline(#[from] OperationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_lookups_do_not_notify() {
        let silent: Vec<_> = OperationKind::ALL
            .into_iter()
            .filter(|k| !k.notifies())
            .collect();
        assert_eq!(
            silent,
            vec![
                OperationKind::GetTweet,
                OperationKind::CountLikes,
                OperationKind::ListReactions,
                OperationKind::ListReplies,
            ]
        );
    }

    #[test]
    fn every_kind_has_non_empty_messages() {
        for kind in OperationKind::ALL {
            assert!(!kind.success_message().is_empty(), "{}", kind.name());
            assert!(!kind.failure_message().is_empty(), "{}", kind.name());
        }
    }

    #[test]
    fn failure_result_is_false_for_flag_style_operations() {
        assert_eq!(OperationKind::LikeTweet.failure_result(), Some(Payload::Flag(false)));
        assert_eq!(OperationKind::DeleteTweet.failure_result(), Some(Payload::Flag(false)));
        assert_eq!(OperationKind::UpdateTweet.failure_result(), None);
        assert_eq!(OperationKind::CreateTweet.failure_result(), None);
    }

    #[test]
    fn failure_detail_text() {
        let blank = OperationFailure::from(DomainError::NotFound(String::new()));
        assert_eq!(blank.to_string(), tweetapp_core::GENERIC_FAILURE_DETAIL);

        let timed_out = OperationFailure::TimedOut { timeout_ms: 50 };
        assert_eq!(timed_out.to_string(), "operation timed out after 50ms");

        let shed = OperationFailure::from(OperationError::Overloaded);
        assert_eq!(shed.to_string(), "server overloaded, try again later");
    }

    #[test]
    fn ctx_accessor_covers_all_variants() {
        let ctx = OperationContext::new(9, OperationKind::ListReplies, 100);
        let op = Operation::ListReplies { ctx };
        assert_eq!(op.ctx().call_id, 9);
        assert_eq!(op.kind(), OperationKind::ListReplies);
    }
}
