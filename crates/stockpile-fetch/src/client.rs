//! HTTP client for fetching provider documents.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use stockpile_types::ComponentKind;

use crate::provider::ComponentProvider;
use crate::url::query_url;

/// Configuration for the provider client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3, // The quota governs pacing; transport retries stay modest
            base_delay_ms: 500,
            max_delay_ms: 30_000,
            user_agent: format!("stockpile/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can occur while fetching a component document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error status after all retries.
    #[error("Server error: {status}")]
    ServerError {
        /// HTTP status code.
        status: u16,
    },

    /// The provider accepted the request but reported it was throttled.
    ///
    /// Alpha Vantage signals free-tier throttling with an HTTP 200
    /// response whose body carries a `Note` or `Information` field.
    #[error("Provider throttled the request: {detail}")]
    Throttled {
        /// The provider's message.
        detail: String,
    },

    /// The provider rejected the request (e.g. unknown symbol).
    #[error("Provider rejected the request: {detail}")]
    Rejected {
        /// The provider's message.
        detail: String,
    },
}

/// Alpha Vantage client with connection pooling and retry logic.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    config: ClientConfig,
    api_key: String,
}

impl AlphaVantageClient {
    /// Creates a new client with the given API key and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            config,
            api_key: api_key.into(),
        })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_defaults(api_key: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::new(api_key, ClientConfig::default())
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Downloads a single document, retrying transient transport errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails after all retries or the
    /// provider reports a soft failure in the response body.
    async fn download(&self, url: &str) -> Result<Bytes, FetchError> {
        let authed = format!("{url}&apikey={}", self.api_key);
        let mut attempts = 0;

        loop {
            match self.client.get(&authed).send().await {
                Ok(response) => {
                    // Retry on server errors (5xx) and rate limiting (429)
                    if response.status().is_server_error()
                        || response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                    {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.calculate_backoff_delay(attempts);
                            warn!(url, status = %response.status(), attempt = attempts, "retrying fetch");
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(FetchError::ServerError {
                            status: response.status().as_u16(),
                        });
                    }

                    response.error_for_status_ref()?;
                    let body = response.bytes().await?;
                    check_soft_failure(&body)?;
                    debug!(url, bytes = body.len(), "fetched document");
                    return Ok(body);
                }
                Err(e) if is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.calculate_backoff_delay(attempts);
                    warn!(url, error = %e, attempt = attempts, "retrying fetch");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));

        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter (±25%) based on attempt number; avoids
        // needing a random number generator
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            let jitter_offset = (attempt as u64 * 17) % (jitter_range * 2);
            jitter_offset.saturating_sub(jitter_range)
        } else {
            0
        };

        let final_delay = (capped_delay as i64 + jitter as i64).max(100) as u64;
        Duration::from_millis(final_delay)
    }
}

#[async_trait]
impl ComponentProvider for AlphaVantageClient {
    async fn fetch_component(
        &self,
        ticker: &str,
        kind: ComponentKind,
    ) -> Result<Bytes, FetchError> {
        self.download(&query_url(ticker, kind)).await
    }
}

/// Determines if a transport error is retryable.
fn is_retryable_error(error: &reqwest::Error) -> bool {
    // Don't retry builder errors (configuration issues)
    if error.is_builder() {
        return false;
    }

    error.is_timeout() || error.is_connect() || error.is_request()
}

/// Rejects HTTP 200 responses whose body is a provider error envelope.
///
/// Alpha Vantage reports bad symbols with an `Error Message` field and
/// free-tier throttling with `Note` or `Information`, both under a 200
/// status. Such bodies must not be cached as component documents.
fn check_soft_failure(body: &[u8]) -> Result<(), FetchError> {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return Ok(()); // Not JSON; let the parser collaborator complain
    };
    let Some(object) = value.as_object() else {
        return Ok(());
    };

    if let Some(message) = object.get("Error Message").and_then(|v| v.as_str()) {
        return Err(FetchError::Rejected {
            detail: message.to_string(),
        });
    }

    for key in ["Note", "Information"] {
        if let Some(note) = object.get(key).and_then(|v| v.as_str()) {
            return Err(FetchError::Throttled {
                detail: note.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.base_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 30_000);
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = AlphaVantageClient::with_defaults("demo");
        assert!(client.is_ok());
    }

    #[test]
    fn test_backoff_delay_calculation() {
        let client = AlphaVantageClient::with_defaults("demo").unwrap();

        // First attempt: base_delay * 2 = 1000ms (plus jitter)
        let delay1 = client.calculate_backoff_delay(1);
        assert!(delay1.as_millis() >= 750 && delay1.as_millis() <= 1250);

        // High attempt should be capped at max_delay
        let delay_high = client.calculate_backoff_delay(20);
        assert!(delay_high.as_millis() <= 37_500); // max_delay + 25% jitter
    }

    #[test]
    fn test_soft_failure_error_message() {
        let body = br#"{"Error Message": "Invalid API call"}"#;
        assert!(matches!(
            check_soft_failure(body),
            Err(FetchError::Rejected { .. })
        ));
    }

    #[test]
    fn test_soft_failure_throttle_note() {
        let body = br#"{"Note": "Thank you for using Alpha Vantage!"}"#;
        assert!(matches!(
            check_soft_failure(body),
            Err(FetchError::Throttled { .. })
        ));

        let body = br#"{"Information": "API rate limit reached"}"#;
        assert!(matches!(
            check_soft_failure(body),
            Err(FetchError::Throttled { .. })
        ));
    }

    #[test]
    fn test_real_document_passes_soft_failure_check() {
        let body = br#"{"Meta Data": {"2. Symbol": "AAPL"}, "Monthly Time Series": {}}"#;
        assert!(check_soft_failure(body).is_ok());
    }

    #[test]
    fn test_non_json_body_passes_soft_failure_check() {
        assert!(check_soft_failure(b"not json").is_ok());
    }
}
