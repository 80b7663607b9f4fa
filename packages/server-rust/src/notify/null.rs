use async_trait::async_trait;
use tracing::debug;

use super::{NotificationPublisher, NotifyError};

/// Publisher installed when notifications are disabled. Drops every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPublisher;

#[async_trait]
impl NotificationPublisher for NullPublisher {
    async fn publish(&self, message: &str) -> Result<(), NotifyError> {
        debug!(message, "notifications disabled, dropping message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_succeeds() {
        assert!(NullPublisher.publish("Tweet posted successfully").await.is_ok());
        NullPublisher.close().await;
    }
}
