//! Terminal bridge adapter configuration.

use std::time::Duration;

/// Configuration for the terminal bridge adapter.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the bridge REST API, e.g. `http://127.0.0.1:5001`.
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Retry policy for idempotent reads.
    pub retry: RetryConfig,
}

impl BridgeConfig {
    /// Create a new configuration with default timeout and retry policy.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry configuration.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// Retry policy for read requests against the bridge.
///
/// Submissions are never retried, whatever this says.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts.
    pub max_attempts: u32,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Backoff ceiling.
    pub max_backoff: Duration,
    /// Multiplier applied after each retry.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_apply() {
        let config = BridgeConfig::new("http://localhost:5001")
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryConfig {
                max_attempts: 1,
                ..RetryConfig::default()
            });

        assert_eq!(config.base_url, "http://localhost:5001");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
    }
}
