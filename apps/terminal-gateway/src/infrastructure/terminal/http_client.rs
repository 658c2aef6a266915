//! HTTP client wrapper for the terminal bridge.
//!
//! Idempotent GETs retry with exponential backoff; POSTs never retry — a
//! submission that timed out may still have reached the terminal, and
//! resubmitting it is worse than reporting the failure.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api_types::BridgeErrorResponse;
use super::config::{BridgeConfig, RetryConfig};
use super::error::BridgeError;

/// HTTP client for the bridge REST API.
#[derive(Debug, Clone)]
pub struct BridgeHttpClient {
    client: Client,
    base_url: String,
    retry_config: RetryConfig,
}

impl BridgeHttpClient {
    /// Create a new HTTP client from config.
    pub fn new(config: &BridgeConfig) -> Result<Self, BridgeError> {
        if config.base_url.is_empty() {
            return Err(BridgeError::Http("bridge base URL is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            retry_config: config.retry.clone(),
        })
    }

    /// GET with retries for transient failures.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BridgeError> {
        let url = format!("{}{path}", self.base_url);
        let mut backoff = ExponentialBackoff::new(&self.retry_config);

        loop {
            let response = match self.client.get(&url).send().await {
                Ok(response) => response,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(BridgeError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
            };

            let status = response.status();
            if status.is_success() {
                return Self::decode(response).await;
            }

            match categorize_status(status) {
                ErrorCategory::Retryable => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            status = status.as_u16(),
                            delay_ms = delay.as_millis(),
                            "retryable bridge error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(BridgeError::MaxRetriesExceeded {
                        attempts: backoff.attempt,
                    });
                }
                ErrorCategory::NonRetryable => {
                    return Err(Self::error_for(status, path, response).await);
                }
            }
        }
    }

    /// POST without retries.
    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BridgeError> {
        let url = format!("{}{path}", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Self::decode(response).await;
        }
        Err(Self::error_for(status, path, response).await)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BridgeError> {
        let text = response
            .text()
            .await
            .map_err(|e| BridgeError::Network(e.to_string()))?;
        let body = if text.is_empty() { "null" } else { &text };
        serde_json::from_str(body).map_err(|e| BridgeError::JsonParse(e.to_string()))
    }

    async fn error_for(
        status: StatusCode,
        path: &str,
        response: reqwest::Response,
    ) -> BridgeError {
        if status == StatusCode::NOT_FOUND {
            return BridgeError::NotFound {
                resource: path.to_string(),
            };
        }

        let error_body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<BridgeErrorResponse>(&error_body) {
            Ok(err) => BridgeError::Api {
                code: err.code.unwrap_or_else(|| status.as_u16().to_string()),
                message: err.message,
            },
            Err(_) => BridgeError::Api {
                code: status.as_u16().to_string(),
                message: error_body,
            },
        }
    }
}

/// Error category for determining retry behavior.
enum ErrorCategory {
    Retryable,
    NonRetryable,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> ErrorCategory {
    match status.as_u16() {
        408 | 429 | 500 | 502 | 503 | 504 => ErrorCategory::Retryable,
        _ => ErrorCategory::NonRetryable,
    }
}

/// Exponential backoff calculator.
struct ExponentialBackoff {
    attempt: u32,
    max_attempts: u32,
    current_backoff: Duration,
    max_backoff: Duration,
    multiplier: f64,
}

impl ExponentialBackoff {
    const fn new(config: &RetryConfig) -> Self {
        Self {
            attempt: 0,
            max_attempts: config.max_attempts,
            current_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
            multiplier: config.multiplier,
        }
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt >= self.max_attempts {
            return None;
        }

        let backoff = self.current_backoff;
        self.current_backoff = Duration::from_secs_f64(
            (self.current_backoff.as_secs_f64() * self.multiplier)
                .min(self.max_backoff.as_secs_f64()),
        );

        Some(backoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_retryable() {
        assert!(matches!(
            categorize_status(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorCategory::Retryable
        ));
        assert!(matches!(
            categorize_status(StatusCode::SERVICE_UNAVAILABLE),
            ErrorCategory::Retryable
        ));
        assert!(matches!(
            categorize_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorCategory::Retryable
        ));
    }

    #[test]
    fn categorize_non_retryable() {
        assert!(matches!(
            categorize_status(StatusCode::BAD_REQUEST),
            ErrorCategory::NonRetryable
        ));
        assert!(matches!(
            categorize_status(StatusCode::NOT_FOUND),
            ErrorCategory::NonRetryable
        ));
    }

    #[test]
    fn exponential_backoff_increments_and_stops() {
        let config = RetryConfig {
            max_attempts: 4,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            multiplier: 2.0,
        };

        let mut backoff = ExponentialBackoff::new(&config);
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_backoff(), None);
    }

    #[test]
    fn exponential_backoff_respects_max() {
        let config = RetryConfig {
            max_attempts: 10,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(5),
            multiplier: 10.0,
        };

        let mut backoff = ExponentialBackoff::new(&config);
        backoff.next_backoff();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn rejects_empty_base_url() {
        let config = BridgeConfig::new("");
        assert!(matches!(
            BridgeHttpClient::new(&config),
            Err(BridgeError::Http(_))
        ));
    }
}
