//! Uniform result container returned by every orchestrated operation.
//!
//! An envelope starts life as a [`PendingEnvelope`] carrying the success
//! defaults and is concluded exactly once, through [`PendingEnvelope::succeed`]
//! or one of the `fail` methods, into a read-only [`ResponseEnvelope`]. The
//! consuming conclusion methods make a second write unrepresentable.
//!
//! Wire shape (camelCase JSON):
//!
//! ```json
//! { "result": ..., "isSuccess": true, "displayMessage": "...", "errorMessages": [] }
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Reaction, Reply, Tweet};

/// Operation-specific payload carried in [`ResponseEnvelope::result`].
///
/// Serialized untagged: a tweet is an object, a listing an array, a count a
/// number, a flag a boolean. An empty array deserializes as `Tweets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Tweet(Tweet),
    Tweets(Vec<Tweet>),
    Reply(Reply),
    Replies(Vec<Reply>),
    Reactions(Vec<Reaction>),
    Count(u64),
    Flag(bool),
}

/// Envelope under construction: success defaults, no result, no errors.
#[derive(Debug, Default)]
#[must_use = "a pending envelope must be concluded with `succeed` or `fail`"]
pub struct PendingEnvelope {
    _private: (),
}

impl PendingEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concludes on the success branch.
    pub fn succeed(self, result: Payload, message: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope {
            result: Some(result),
            is_success: true,
            display_message: message.into(),
            error_messages: Vec::new(),
        }
    }

    /// Concludes on the failure branch, leaving `result` unset.
    pub fn fail(self, message: impl Into<String>, detail: impl Into<String>) -> ResponseEnvelope {
        ResponseEnvelope {
            result: None,
            is_success: false,
            display_message: message.into(),
            error_messages: vec![detail.into()],
        }
    }

    /// Concludes on the failure branch with an explicit placeholder result
    /// (operations that report `false` instead of an absent result).
    pub fn fail_with(
        self,
        result: Payload,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) -> ResponseEnvelope {
        ResponseEnvelope {
            result: Some(result),
            ..self.fail(message, detail)
        }
    }
}

/// Concluded envelope handed back to the caller.
///
/// `is_success` is false exactly when `error_messages` holds an entry, and
/// `display_message` is the string published as the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    result: Option<Payload>,
    is_success: bool,
    display_message: String,
    error_messages: Vec<String>,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn result(&self) -> Option<&Payload> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.is_success
    }

    #[must_use]
    pub fn display_message(&self) -> &str {
        &self.display_message
    }

    #[must_use]
    pub fn error_messages(&self) -> &[String] {
        &self.error_messages
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::types::TweetId;

    fn tweet() -> Tweet {
        Tweet {
            id: TweetId(1),
            author: "alice".to_string(),
            text: "hello".to_string(),
            posted_at_ms: 0,
            likes: 0,
        }
    }

    #[test]
    fn succeed_keeps_success_defaults() {
        let env = PendingEnvelope::new().succeed(Payload::Tweet(tweet()), "Tweet posted successfully");
        assert!(env.is_success());
        assert!(env.error_messages().is_empty());
        assert_eq!(env.display_message(), "Tweet posted successfully");
        assert_eq!(env.result(), Some(&Payload::Tweet(tweet())));
    }

    #[test]
    fn fail_records_single_detail() {
        let env = PendingEnvelope::new().fail("Something went wrong!", "boom");
        assert!(!env.is_success());
        assert_eq!(env.error_messages(), ["boom".to_string()]);
        assert!(env.result().is_none());
    }

    #[test]
    fn fail_with_downgrades_result() {
        let env = PendingEnvelope::new().fail_with(Payload::Flag(false), "nope", "Something wrong!!!");
        assert_eq!(env.result(), Some(&Payload::Flag(false)));
        assert!(!env.is_success());
    }

    #[test]
    fn wire_shape_is_camel_case_and_untagged() {
        let env = PendingEnvelope::new().succeed(Payload::Count(3), "Tweet Count fetched successfully");
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({
                "result": 3,
                "isSuccess": true,
                "displayMessage": "Tweet Count fetched successfully",
                "errorMessages": [],
            })
        );

        let failed = PendingEnvelope::new().fail("Something went wrong!", "x");
        assert_eq!(serde_json::to_value(&failed).unwrap()["result"], json!(null));
    }

    #[test]
    fn deserializes_from_wire() {
        let raw = json!({
            "result": false,
            "isSuccess": false,
            "displayMessage": "Something went wrong while deleting tweet! Please try again later.",
            "errorMessages": ["Something wrong!!!"],
        });
        let env: ResponseEnvelope = serde_json::from_value(raw).unwrap();
        assert_eq!(env.result(), Some(&Payload::Flag(false)));
        assert_eq!(env.error_messages().len(), 1);
    }

    proptest! {
        #[test]
        fn success_iff_no_errors(
            succeed in any::<bool>(),
            message in "[A-Za-z !.]{1,40}",
            detail in ".{0,40}",
            count in any::<u64>(),
        ) {
            let pending = PendingEnvelope::new();
            let env = if succeed {
                pending.succeed(Payload::Count(count), message.clone())
            } else {
                pending.fail(message.clone(), detail)
            };
            prop_assert_eq!(env.is_success(), env.error_messages().is_empty());
            prop_assert!(env.error_messages().len() <= 1);
            prop_assert_eq!(env.display_message(), message.as_str());
        }
    }
}
