/*!
 * Chat service shared by the segmenter and the translator.
 *
 * Wraps the configured provider client, sends a (system, user) prompt pair
 * and returns the assistant text. Retryable provider failures are retried
 * with exponential backoff.
 */

use std::time::Duration;

use anyhow::{anyhow, Result};
use log::{debug, warn};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{ChatMessage, ChatRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;

/// Provider implementation variants
#[derive(Debug, Clone)]
enum ProviderImpl {
    /// OpenAI-compatible API (OpenAI, DeepSeek)
    OpenAI { client: OpenAI },
    /// Ollama local server
    Ollama { client: Ollama },
    /// In-process mock
    Mock { client: MockProvider },
}

/// Retry policy for chat requests
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure
    pub retry_count: u32,
    /// Base delay, doubled on each retry
    pub backoff_ms: u64,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

/// Sends prompts to the configured LLM
#[derive(Debug, Clone)]
pub struct ChatService {
    provider: ProviderImpl,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
    concurrent_requests: usize,
}

/// Validate an endpoint string before building a client for it
fn parse_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Url::parse(endpoint)?
    } else {
        Url::parse(&format!("http://{}", endpoint))?
    };

    if url.host_str().is_none() {
        return Err(anyhow!("Invalid host in endpoint: {}", endpoint));
    }

    Ok(url)
}

impl ChatService {
    /// Create a chat service from the translation configuration
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let endpoint = parse_endpoint(&config.get_endpoint())?;
        let model = config.get_model();
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            TranslationProvider::DeepSeek | TranslationProvider::OpenAI => ProviderImpl::OpenAI {
                client: OpenAI::new_with_timeout(
                    config.get_api_key(),
                    endpoint.as_str().trim_end_matches('/'),
                    model.clone(),
                    timeout_secs,
                ),
            },
            TranslationProvider::Ollama => ProviderImpl::Ollama {
                client: Ollama::new(endpoint.as_str(), timeout_secs),
            },
        };

        Ok(Self {
            provider,
            model,
            temperature: config.common.temperature,
            retry: RetryPolicy {
                retry_count: config.common.retry_count,
                backoff_ms: config.common.retry_backoff_ms,
            },
            concurrent_requests: config.get_concurrent_requests(),
        })
    }

    /// Create a chat service backed by a mock provider
    pub fn with_mock(client: MockProvider, retry: RetryPolicy) -> Self {
        Self {
            provider: ProviderImpl::Mock { client },
            model: "mock".to_string(),
            temperature: 0.0,
            retry,
            concurrent_requests: 2,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Maximum number of requests in flight for batch callers
    pub fn concurrent_requests(&self) -> usize {
        self.concurrent_requests.max(1)
    }

    /// Override the request concurrency
    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    /// Send one prompt pair, retrying transient failures
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.send(system, user).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && attempt < self.retry.retry_count => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    warn!(
                        "Chat request failed ({}), retry {}/{} in {}ms",
                        e,
                        attempt,
                        self.retry.retry_count,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Check that the provider is reachable
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.provider {
            ProviderImpl::OpenAI { client } => client.test_connection().await,
            ProviderImpl::Ollama { client } => client.test_connection().await,
            ProviderImpl::Mock { client } => client.test_connection().await,
        }
    }

    async fn send(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        debug!("Sending chat request to {}", self.model);
        match &self.provider {
            ProviderImpl::OpenAI { client } => {
                let request = OpenAIRequest::new(self.model.clone())
                    .add_message("system", system)
                    .add_message("user", user)
                    .temperature(self.temperature);
                let response = client.complete(request).await?;
                Ok(OpenAI::extract_text(&response))
            }
            ProviderImpl::Ollama { client } => {
                let messages = vec![
                    ChatMessage { role: "system".to_string(), content: system.to_string() },
                    ChatMessage { role: "user".to_string(), content: user.to_string() },
                ];
                let request = ChatRequest::new(self.model.clone(), messages).temperature(self.temperature);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            }
            ProviderImpl::Mock { client } => {
                let request = MockRequest {
                    system: system.to_string(),
                    user: user.to_string(),
                };
                let response = client.complete(request).await?;
                Ok(MockProvider::extract_text(&response))
            }
        }
    }
}
