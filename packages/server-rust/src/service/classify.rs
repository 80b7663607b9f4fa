//! Request classification: validates raw route data into typed `Operation` variants.
//!
//! The transport hands over path segments and bodies exactly as received.
//! Anything malformed becomes a `ClassifyError`, which the orchestrator turns
//! into a failure envelope rather than a transport-level fault.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tweetapp_core::{ReplyBody, TweetDraft, TweetId, MAX_TEXT_LENGTH};

use super::config::ServerConfig;
use super::operation::{Operation, OperationContext, OperationKind};

/// A body that failed to decode, described by the decoder's message.
pub type RawBody<T> = Result<T, String>;

/// Route data as received by the transport, before validation.
#[derive(Debug, Clone)]
pub enum RawRequest {
    CreateTweet { author: String, body: RawBody<TweetDraft> },
    ListTweets,
    ListTweetsByAuthor { author: String },
    UpdateTweet { author: String, id: String, body: RawBody<TweetDraft> },
    DeleteTweet { author: String, id: String },
    ReplyTweet { author: String, id: String, body: RawBody<ReplyBody> },
    LikeTweet { author: String, id: String },
    GetTweet { id: String },
    CountLikes { id: String },
    ListReactions,
    ListReplies,
}

impl RawRequest {
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreateTweet { .. } => OperationKind::CreateTweet,
            Self::ListTweets => OperationKind::ListTweets,
            Self::ListTweetsByAuthor { .. } => OperationKind::ListTweetsByAuthor,
            Self::UpdateTweet { .. } => OperationKind::UpdateTweet,
            Self::DeleteTweet { .. } => OperationKind::DeleteTweet,
            Self::ReplyTweet { .. } => OperationKind::ReplyTweet,
            Self::LikeTweet { .. } => OperationKind::LikeTweet,
            Self::GetTweet { .. } => OperationKind::GetTweet,
            Self::CountLikes { .. } => OperationKind::CountLikes,
            Self::ListReactions => OperationKind::ListReactions,
            Self::ListReplies => OperationKind::ListReplies,
        }
    }
}

/// Validation failures for caller-supplied route data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("username must not be empty")]
    EmptyAuthor,
    #[error("username must not have leading or trailing whitespace: {raw:?}")]
    PaddedAuthor { raw: String },
    #[error("invalid tweet id: {raw:?}")]
    InvalidTweetId { raw: String },
    #[error("malformed request body: {reason}")]
    MalformedBody { reason: String },
    #[error("{field} must not be empty")]
    EmptyText { field: &'static str },
    #[error("{field} exceeds {max} characters (got {len})")]
    TextTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// Turns `RawRequest` values into `Operation` values.
///
/// Each successful classification gets a unique call ID and the configured
/// default domain-call timeout.
pub struct RequestClassifier {
    config: Arc<ServerConfig>,
    call_id_counter: AtomicU64,
}

impl RequestClassifier {
    #[must_use]
    pub fn new(config: Arc<ServerConfig>) -> Self {
        Self {
            config,
            call_id_counter: AtomicU64::new(1),
        }
    }

    fn next_call_id(&self) -> u64 {
        self.call_id_counter.fetch_add(1, Ordering::Relaxed)
    }

    fn make_ctx(&self, kind: OperationKind, request_id: Option<String>) -> OperationContext {
        let mut ctx = OperationContext::new(
            self.next_call_id(),
            kind,
            self.config.default_operation_timeout_ms,
        );
        ctx.request_id = request_id;
        ctx
    }

    /// Validate `raw` and build the matching `Operation`.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError` when an author handle is blank, an id is not a
    /// non-negative integer, or a body is missing, undecodable, empty, or
    /// longer than `MAX_TEXT_LENGTH` characters.
    pub fn classify(
        &self,
        raw: RawRequest,
        request_id: Option<String>,
    ) -> Result<Operation, ClassifyError> {
        let kind = raw.kind();
        // Validate everything before a call id is spent.
        let op = match raw {
            RawRequest::CreateTweet { author, body } => {
                let author = author_of(&author)?;
                let draft = draft_of(body)?;
                Operation::CreateTweet { ctx: self.make_ctx(kind, request_id), author, draft }
            }
            RawRequest::ListTweets => Operation::ListTweets {
                ctx: self.make_ctx(kind, request_id),
            },
            RawRequest::ListTweetsByAuthor { author } => {
                let author = author_of(&author)?;
                Operation::ListTweetsByAuthor { ctx: self.make_ctx(kind, request_id), author }
            }
            RawRequest::UpdateTweet { author, id, body } => {
                let author = author_of(&author)?;
                let id = tweet_id_of(&id)?;
                let draft = draft_of(body)?;
                Operation::UpdateTweet {
                    ctx: self.make_ctx(kind, request_id),
                    author,
                    id,
                    draft,
                }
            }
            RawRequest::DeleteTweet { author, id } => {
                let author = author_of(&author)?;
                let id = tweet_id_of(&id)?;
                Operation::DeleteTweet { ctx: self.make_ctx(kind, request_id), author, id }
            }
            RawRequest::ReplyTweet { author, id, body } => {
                let author = author_of(&author)?;
                let id = tweet_id_of(&id)?;
                let body = body.map_err(|reason| ClassifyError::MalformedBody { reason })?;
                let message = text_of("message", body.message)?;
                Operation::ReplyTweet {
                    ctx: self.make_ctx(kind, request_id),
                    author,
                    id,
                    message,
                }
            }
            RawRequest::LikeTweet { author, id } => {
                let author = author_of(&author)?;
                let id = tweet_id_of(&id)?;
                Operation::LikeTweet { ctx: self.make_ctx(kind, request_id), author, id }
            }
            RawRequest::GetTweet { id } => {
                let id = tweet_id_of(&id)?;
                Operation::GetTweet { ctx: self.make_ctx(kind, request_id), id }
            }
            RawRequest::CountLikes { id } => {
                let id = tweet_id_of(&id)?;
                Operation::CountLikes { ctx: self.make_ctx(kind, request_id), id }
            }
            RawRequest::ListReactions => Operation::ListReactions {
                ctx: self.make_ctx(kind, request_id),
            },
            RawRequest::ListReplies => Operation::ListReplies {
                ctx: self.make_ctx(kind, request_id),
            },
        };
        Ok(op)
    }
}

fn author_of(raw: &str) -> Result<String, ClassifyError> {
    if raw.trim().is_empty() {
        return Err(ClassifyError::EmptyAuthor);
    }
    if raw.trim() != raw {
        return Err(ClassifyError::PaddedAuthor {
            raw: raw.to_string(),
        });
    }
    Ok(raw.to_string())
}

fn tweet_id_of(raw: &str) -> Result<TweetId, ClassifyError> {
    raw.parse().map_err(|_| ClassifyError::InvalidTweetId {
        raw: raw.to_string(),
    })
}

fn draft_of(body: RawBody<TweetDraft>) -> Result<TweetDraft, ClassifyError> {
    let draft = body.map_err(|reason| ClassifyError::MalformedBody { reason })?;
    Ok(TweetDraft {
        text: text_of("text", draft.text)?,
    })
}

fn text_of(field: &'static str, text: String) -> Result<String, ClassifyError> {
    if text.trim().is_empty() {
        return Err(ClassifyError::EmptyText { field });
    }
    let len = text.chars().count();
    if len > MAX_TEXT_LENGTH {
        return Err(ClassifyError::TextTooLong {
            field,
            len,
            max: MAX_TEXT_LENGTH,
        });
    }
    Ok(text)
}
