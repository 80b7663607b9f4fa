//! HTTP transport configuration.

use std::time::Duration;

/// Network configuration for the tweet API server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Allowed CORS origins; `"*"` allows any.
    pub cors_origins: Vec<String>,
    /// Upper bound on a whole HTTP request, domain call and publish included.
    pub request_timeout: Duration,
    /// How long shutdown waits for in-flight requests.
    pub drain_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(60),
            drain_timeout: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_exceeds_call_and_publish_bounds() {
        let config = NetworkConfig::default();
        let call_plus_publish = Duration::from_millis(
            crate::service::ServerConfig::default().default_operation_timeout_ms,
        ) + crate::notify::NotifyConfig::default().publish_timeout;
        assert!(config.request_timeout > call_plus_publish);
        assert_eq!(config.cors_origins, vec!["*"]);
    }
}
