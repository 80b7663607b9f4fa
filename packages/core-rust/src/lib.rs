//! `tweetapp` Core: response envelope, tweet domain types, and the domain service facade.

pub mod envelope;
pub mod error;
pub mod traits;
pub mod types;

pub use envelope::{Payload, PendingEnvelope, ResponseEnvelope};
pub use error::{DomainError, GENERIC_FAILURE_DETAIL};
pub use traits::TweetService;
pub use types::{Reaction, Reply, ReplyBody, Tweet, TweetDraft, TweetId, MAX_TEXT_LENGTH};

