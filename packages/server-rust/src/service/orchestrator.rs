//! Request orchestrator: domain call, envelope conclusion, notification.
//!
//! For every operation the orchestrator:
//!
//! 1. invokes the matching [`TweetService`] method, bounded by the call timeout;
//! 2. maps sentinel returns and errors onto the failure branch;
//! 3. concludes a fresh [`PendingEnvelope`] exactly once;
//! 4. publishes the envelope's display message if the operation notifies;
//! 5. returns the envelope.
//!
//! Publisher failures are logged and counted but never alter the envelope.
//! Publishes are not load-shed: requests rejected by the pipeline still
//! notify. Instead, concurrent publishes share their own permit pool, and a
//! publish that cannot get a permit within `publish_timeout` counts as failed.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::sync::Semaphore;
use tower::Service;
use tracing::{debug, warn};
use tweetapp_core::{
    Payload, PendingEnvelope, ResponseEnvelope, TweetService, GENERIC_FAILURE_DETAIL,
};

use super::operation::{Operation, OperationError, OperationFailure, OperationKind};
use crate::notify::{NotificationPublisher, NotifyError, DEFAULT_MAX_CONCURRENT_PUBLISHES};

/// Detail recorded when a single-tweet lookup finds nothing.
pub const TWEET_NOT_FOUND_DETAIL: &str = "No tweets found";

/// Coordinates the domain service and the notification publisher.
///
/// Cheap to clone; clones share the same service and publisher.
#[derive(Clone)]
pub struct TweetOrchestrator {
    tweets: Arc<dyn TweetService>,
    publisher: Arc<dyn NotificationPublisher>,
    publish_timeout: Duration,
    publish_permits: Arc<Semaphore>,
}

impl TweetOrchestrator {
    #[must_use]
    pub fn new(
        tweets: Arc<dyn TweetService>,
        publisher: Arc<dyn NotificationPublisher>,
        publish_timeout: Duration,
    ) -> Self {
        Self {
            tweets,
            publisher,
            publish_timeout,
            publish_permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_PUBLISHES)),
        }
    }

    /// Cap the number of publishes in flight at once (minimum 1).
    #[must_use]
    pub fn with_publish_limit(mut self, limit: usize) -> Self {
        self.publish_permits = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    #[must_use]
    pub fn publisher(&self) -> &Arc<dyn NotificationPublisher> {
        &self.publisher
    }

    /// Run `op` to completion and return its concluded envelope.
    pub async fn execute(&self, op: Operation) -> ResponseEnvelope {
        let kind = op.kind();
        let outcome = self.dispatch(op).await;
        self.conclude(kind, outcome).await
    }

    /// Conclude an operation that never reached the domain service.
    ///
    /// Used for validation and pipeline failures. Notifying kinds still publish.
    pub async fn reject(&self, kind: OperationKind, failure: OperationFailure) -> ResponseEnvelope {
        self.conclude(kind, Err(failure)).await
    }

    async fn dispatch(&self, op: Operation) -> Result<Payload, OperationFailure> {
        let timeout_ms = op.ctx().call_timeout_ms;
        match tokio::time::timeout(Duration::from_millis(timeout_ms), self.call_domain(op)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(OperationFailure::TimedOut { timeout_ms }),
        }
    }

    async fn call_domain(&self, op: Operation) -> Result<Payload, OperationFailure> {
        let tweets = &self.tweets;
        let payload = match op {
            Operation::CreateTweet { author, draft, .. } => {
                Payload::Tweet(tweets.post_tweet(&author, draft).await?)
            }
            Operation::ListTweets { .. } => Payload::Tweets(tweets.all_tweets().await?),
            Operation::ListTweetsByAuthor { author, .. } => {
                Payload::Tweets(tweets.tweets_by_author(&author).await?)
            }
            Operation::UpdateTweet {
                author, id, draft, ..
            } => tweets
                .update_tweet(id, &author, draft)
                .await?
                .map(Payload::Tweet)
                .ok_or(OperationFailure::NotApplied(GENERIC_FAILURE_DETAIL))?,
            Operation::DeleteTweet { author, id, .. } => {
                applied(tweets.delete_tweet(id, &author).await?)?
            }
            Operation::ReplyTweet {
                author,
                id,
                message,
                ..
            } => Payload::Reply(tweets.reply_tweet(&author, id, message).await?),
            Operation::LikeTweet { author, id, .. } => {
                applied(tweets.like_tweet(&author, id).await?)?
            }
            Operation::GetTweet { id, .. } => tweets
                .tweet(id)
                .await?
                .map(Payload::Tweet)
                .ok_or(OperationFailure::NotApplied(TWEET_NOT_FOUND_DETAIL))?,
            Operation::CountLikes { id, .. } => Payload::Count(tweets.count_likes(id).await?),
            Operation::ListReactions { .. } => Payload::Reactions(tweets.reactions().await?),
            Operation::ListReplies { .. } => Payload::Replies(tweets.replies().await?),
        };
        Ok(payload)
    }

    async fn conclude(
        &self,
        kind: OperationKind,
        outcome: Result<Payload, OperationFailure>,
    ) -> ResponseEnvelope {
        let pending = PendingEnvelope::new();
        let envelope = match outcome {
            Ok(payload) => pending.succeed(payload, kind.success_message()),
            Err(failure) => {
                log_failure(kind, &failure);
                let detail = failure.to_string();
                match kind.failure_result() {
                    Some(result) => pending.fail_with(result, kind.failure_message(), detail),
                    None => pending.fail(kind.failure_message(), detail),
                }
            }
        };

        if kind.notifies() {
            self.notify(envelope.display_message()).await;
        }
        envelope
    }

    async fn notify(&self, message: &str) {
        let bounded = async {
            let _permit = self
                .publish_permits
                .acquire()
                .await
                .map_err(|_| NotifyError::LimiterClosed)?;
            self.publisher.publish(message).await
        };
        let outcome = match tokio::time::timeout(self.publish_timeout, bounded).await {
            Ok(outcome) => outcome,
            Err(_) => Err(NotifyError::TimedOut {
                timeout_ms: u64::try_from(self.publish_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };

        match outcome {
            Ok(()) => {
                metrics::counter!("tweetapp_notifications_total", "outcome" => "published")
                    .increment(1);
            }
            Err(e) => {
                warn!(error = %e, message, "notification publish failed");
                metrics::counter!("tweetapp_notifications_total", "outcome" => "failed")
                    .increment(1);
            }
        }
    }
}

/// Successful boolean sentinel becomes `true`; `false` means nothing happened.
fn applied(done: bool) -> Result<Payload, OperationFailure> {
    if done {
        Ok(Payload::Flag(true))
    } else {
        Err(OperationFailure::NotApplied(GENERIC_FAILURE_DETAIL))
    }
}

fn log_failure(kind: OperationKind, failure: &OperationFailure) {
    match failure {
        OperationFailure::Invalid(_) | OperationFailure::NotApplied(_) => {
            debug!(operation = kind.name(), error = %failure, "operation rejected");
        }
        OperationFailure::Domain(_)
        | OperationFailure::TimedOut { .. }
        | OperationFailure::Pipeline(_) => {
            warn!(operation = kind.name(), error = %failure, "operation failed");
        }
    }
}

impl Service<Operation> for TweetOrchestrator {
    type Response = ResponseEnvelope;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<ResponseEnvelope, OperationError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let this = self.clone();
        Box::pin(async move { Ok(this.execute(op).await) })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
