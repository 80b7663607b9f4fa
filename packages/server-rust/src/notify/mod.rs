//! Notification publishing: one queue message per completed notifying operation.
//!
//! - [`amqp`]: AMQP 0.9.1 publisher backed by `lapin`
//! - [`null`]: publisher used when notifications are disabled
//! - [`recording`]: in-memory capture for tests and local runs
//! - [`config`]: broker endpoint, queue name, and connection mode

pub mod amqp;
pub mod config;
pub mod null;
pub mod recording;

use std::sync::Arc;

use async_trait::async_trait;

pub use amqp::AmqpNotificationPublisher;
pub use config::{ConnectionMode, NotifyConfig, DEFAULT_MAX_CONCURRENT_PUBLISHES};
pub use null::NullPublisher;
pub use recording::RecordingPublisher;

/// Errors from a single publish attempt.
///
/// Never surfaced to callers; the orchestrator logs and counts them.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("failed to connect to message broker: {0}")]
    Connect(String),
    #[error("failed to open channel: {0}")]
    Channel(String),
    #[error("failed to declare queue {queue}: {reason}")]
    DeclareQueue { queue: String, reason: String },
    #[error("failed to encode notification: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to publish to queue {queue}: {reason}")]
    Publish { queue: String, reason: String },
    #[error("publish timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
    #[error("publish limiter closed")]
    LimiterClosed,
}

/// Sink for operation notifications.
///
/// `publish` delivers one message to the configured queue. Implementations
/// release whatever broker resources they opened for the call on every exit
/// path.
#[async_trait]
pub trait NotificationPublisher: Send + Sync {
    /// Publish `message` to the notification queue.
    async fn publish(&self, message: &str) -> Result<(), NotifyError>;

    /// Release long-lived broker resources, if any. Called during shutdown.
    async fn close(&self) {}
}

/// Encode a notification message as a JSON string literal.
///
/// `Tweet posted successfully` becomes the bytes of `"Tweet posted successfully"`.
///
/// # Errors
///
/// Returns `NotifyError::Encode` if serialization fails.
pub fn encode_message(message: &str) -> Result<Vec<u8>, NotifyError> {
    Ok(serde_json::to_vec(message)?)
}

/// Publisher selected by `config`: AMQP when enabled, otherwise [`NullPublisher`].
#[must_use]
pub fn publisher_from_config(config: &NotifyConfig) -> Arc<dyn NotificationPublisher> {
    if config.enabled {
        Arc::new(AmqpNotificationPublisher::new(config.clone()))
    } else {
        Arc::new(NullPublisher)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn message_is_encoded_as_json_string_literal() {
        let bytes = encode_message("Tweet posted successfully").unwrap();
        assert_eq!(bytes, b"\"Tweet posted successfully\"");
    }

    #[test]
    fn quotes_are_escaped() {
        let bytes = encode_message("say \"hi\"").unwrap();
        assert_eq!(bytes, br#""say \"hi\"""#);
    }

    #[tokio::test]
    async fn disabled_config_selects_null_publisher() {
        let config = NotifyConfig {
            enabled: false,
            // Unreachable on purpose: the AMQP publisher would fail here.
            amqp_url: "amqp://127.0.0.1:1".to_string(),
            ..NotifyConfig::default()
        };
        assert!(publisher_from_config(&config).publish("x").await.is_ok());
    }

    proptest! {
        #[test]
        fn encoded_message_decodes_to_original(message in ".{0,200}") {
            let bytes = encode_message(&message).unwrap();
            let decoded: String = serde_json::from_slice(&bytes).unwrap();
            prop_assert_eq!(decoded, message);
        }
    }
}
