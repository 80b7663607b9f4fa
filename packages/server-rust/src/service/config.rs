/// Server-level configuration for the operation pipeline.
///
/// Controls the domain-call timeout and the concurrency limit.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Default upper bound for a single domain call in milliseconds.
    pub default_operation_timeout_ms: u64,
    /// Maximum number of concurrent operations before load shedding.
    pub max_concurrent_operations: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_operation_timeout_ms: 30_000,
            max_concurrent_operations: 1000,
        }
    }
}
