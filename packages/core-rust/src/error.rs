//! Failures reported by the domain service facade.

/// Detail recorded in the envelope when a failure carries no message of its own.
pub const GENERIC_FAILURE_DETAIL: &str = "Something wrong!!!";

/// Typed failure reasons returned by [`TweetService`](crate::TweetService).
///
/// Each variant carries the descriptive message the domain produced; the
/// orchestrator copies it verbatim into the envelope's error list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// The addressed tweet (or author) does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The mutation was refused (e.g. author does not own the tweet).
    #[error("{0}")]
    Rejected(String),
    /// The backing store could not be reached.
    #[error("{0}")]
    Unavailable(String),
}

impl DomainError {
    /// Message to surface as the single error entry, falling back to
    /// [`GENERIC_FAILURE_DETAIL`] when the domain left it blank.
    #[must_use]
    pub fn detail(&self) -> String {
        let message = match self {
            Self::NotFound(m) | Self::Rejected(m) | Self::Unavailable(m) => m.trim(),
        };
        if message.is_empty() {
            GENERIC_FAILURE_DETAIL.to_string()
        } else {
            message.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_uses_domain_message() {
        let err = DomainError::NotFound("Tweet 7 not found".to_string());
        assert_eq!(err.detail(), "Tweet 7 not found");
    }

    #[test]
    fn blank_detail_falls_back_to_generic_literal() {
        assert_eq!(DomainError::Rejected("  ".to_string()).detail(), GENERIC_FAILURE_DETAIL);
        assert_eq!(DomainError::Unavailable(String::new()).detail(), GENERIC_FAILURE_DETAIL);
    }
}
