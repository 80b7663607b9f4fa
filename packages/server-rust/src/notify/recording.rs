//! In-memory publisher capturing every message it is handed.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{NotificationPublisher, NotifyError};

/// Records published messages in order. Can be switched into a failing mode
/// to exercise the orchestrator's error isolation.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<String>>,
    attempts: Mutex<usize>,
    fail: AtomicBool,
}

impl RecordingPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages successfully published so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Number of publish calls, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, message: &str) -> Result<(), NotifyError> {
        *self.attempts.lock() += 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Publish {
                queue: "recording".to_string(),
                reason: "publisher set to fail".to_string(),
            });
        }
        self.messages.lock().push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_order() {
        let publisher = RecordingPublisher::new();
        publisher.publish("first").await.unwrap();
        publisher.publish("second").await.unwrap();
        assert_eq!(publisher.messages(), vec!["first", "second"]);
        assert_eq!(publisher.attempts(), 2);
    }

    #[tokio::test]
    async fn failing_mode_counts_attempt_but_records_nothing() {
        let publisher = RecordingPublisher::new();
        publisher.set_failing(true);
        assert!(publisher.publish("lost").await.is_err());
        assert!(publisher.messages().is_empty());
        assert_eq!(publisher.attempts(), 1);
    }
}
