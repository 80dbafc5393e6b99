use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::errors::ClaudeApiError;
use super::rate_limiter::TokenBucketRateLimiter;
use super::retry::RetryPolicy;
use super::types::{MessageRequest, MessageResponse};
use crate::domain::models::Config;
use crate::domain::ports::{CompletionError, CompletionRequest, TextCompletion};

/// Configuration for the Claude HTTP client
#[derive(Debug, Clone)]
pub struct ClaudeClientConfig {
    /// Anthropic API key
    pub api_key: String,

    /// Model used for every request
    pub model: String,

    /// Base URL for the Claude API
    pub base_url: String,

    /// Rate limit in requests per second
    pub rate_limit_rps: f64,

    /// Maximum retry attempts
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    pub max_backoff_ms: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ClaudeClientConfig {
    /// Build from loaded configuration and a resolved API key.
    pub fn from_config(config: &Config, api_key: String) -> Self {
        Self {
            api_key,
            model: config.llm.model.clone(),
            base_url: config.llm.base_url.clone(),
            rate_limit_rps: config.rate_limit.requests_per_second,
            max_retries: config.retry.max_retries,
            initial_backoff_ms: config.retry.initial_backoff_ms,
            max_backoff_ms: config.retry.max_backoff_ms,
            timeout_secs: config.llm.timeout_secs,
        }
    }
}

/// Mask all but a short prefix of an API key for logging.
pub fn redact_api_key(api_key: &str) -> String {
    match api_key.get(..8) {
        Some(prefix) if api_key.len() > 12 => format!("{prefix}...[REDACTED]"),
        _ => "[REDACTED]".to_string(),
    }
}

/// HTTP client for the Claude Messages API
///
/// Provides:
/// - Connection pooling and reuse
/// - Rate limiting via token bucket algorithm
/// - Exponential backoff retry logic for transient errors
pub struct ClaudeClient {
    http_client: ReqwestClient,
    base_url: String,
    model: String,
    rate_limiter: Arc<TokenBucketRateLimiter>,
    retry_policy: RetryPolicy,
}

impl ClaudeClient {
    /// Create a new Claude API client
    ///
    /// # Example
    /// ```no_run
    /// use socratic_tutor::domain::models::Config;
    /// use socratic_tutor::infrastructure::claude::{ClaudeClient, ClaudeClientConfig};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = ClaudeClientConfig::from_config(&Config::default(), "sk-ant-...".to_string());
    /// let client = ClaudeClient::new(config)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClaudeClientConfig) -> Result<Self, ClaudeApiError> {
        info!(
            base_url = %config.base_url,
            model = %config.model,
            rate_limit_rps = config.rate_limit_rps,
            timeout_secs = config.timeout_secs,
            api_key = %redact_api_key(&config.api_key),
            "Initializing Claude API client"
        );

        let mut headers = header::HeaderMap::new();
        let mut api_key = header::HeaderValue::from_str(&config.api_key)
            .map_err(|e| ClaudeApiError::InvalidRequest(format!("Invalid API key: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            header::HeaderValue::from_static("2023-06-01"),
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = ReqwestClient::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.timeout_secs))
            .tcp_nodelay(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            rate_limiter: Arc::new(TokenBucketRateLimiter::new(config.rate_limit_rps)),
            retry_policy: RetryPolicy::new(
                config.max_retries,
                config.initial_backoff_ms,
                config.max_backoff_ms,
            ),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a message request, retrying transient failures
    #[instrument(skip(self, request), fields(model = %request.model, max_tokens = request.max_tokens))]
    pub async fn send_message(
        &self,
        request: MessageRequest,
    ) -> Result<MessageResponse, ClaudeApiError> {
        self.rate_limiter.acquire().await;

        let result = self
            .retry_policy
            .execute(|| async { self.execute_message_request(&request).await })
            .await;

        match &result {
            Ok(response) => debug!(
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "Message request succeeded"
            ),
            Err(err) => warn!(error = %err, "Message request failed"),
        }

        result
    }

    async fn execute_message_request(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, ClaudeApiError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!(%url, "POST");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClaudeApiError::Timeout
                } else {
                    ClaudeApiError::NetworkError(e)
                }
            })?;

        Self::handle_response(response).await
    }

    async fn handle_response(response: Response) -> Result<MessageResponse, ClaudeApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        warn!(%status, %body, "API error response");
        Err(ClaudeApiError::from_status(status, body))
    }
}

#[async_trait]
impl TextCompletion for ClaudeClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        let message = MessageRequest::with_system(
            self.model.clone(),
            request.system,
            request.user,
            request.max_tokens,
        );
        let response = self.send_message(message).await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(ClaudeApiError::EmptyContent.into());
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClaudeClientConfig {
        ClaudeClientConfig::from_config(&Config::default(), "test-api-key".to_string())
    }

    #[test]
    fn test_from_config_defaults() {
        let config = config();
        assert_eq!(config.base_url, "https://api.anthropic.com");
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.timeout_secs, 120);
        assert!((config.rate_limit_rps - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_client_creation() {
        let client = ClaudeClient::new(config()).unwrap();
        assert_eq!(client.model(), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_invalid_api_key_header_rejected() {
        let mut config = config();
        config.api_key = "bad\nkey".to_string();
        assert!(matches!(
            ClaudeClient::new(config),
            Err(ClaudeApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_redact_api_key() {
        assert_eq!(
            redact_api_key("sk-ant-REDACTED"),
            "sk-ant-a...[REDACTED]"
        );
        assert_eq!(redact_api_key("short"), "[REDACTED]");
    }
}
