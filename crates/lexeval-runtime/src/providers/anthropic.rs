//! Anthropic Messages API transport.
//!
//! One HTTP call per [`LlmProvider::complete`]; retry policy lives in the
//! retry caller, so every failure is mapped to a precise [`ProviderError`]
//! and returned immediately.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::secrets::{ApiCredential, CredentialSource};
use super::{ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError};

/// Environment variable name for Anthropic API key.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Claude transport.
pub struct AnthropicProvider {
    credential: ApiCredential,
    base_url: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_credential(ApiCredential::new(
            api_key,
            CredentialSource::Programmatic,
            "Anthropic API key",
        ))
    }

    /// Read the key from `env_var` (normally [`ANTHROPIC_API_KEY_ENV`]).
    pub fn from_env(env_var: &str) -> Result<Self, ProviderError> {
        ApiCredential::from_env(env_var, "Anthropic API key").map(Self::with_credential)
    }

    fn with_credential(credential: ApiCredential) -> Self {
        Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Set custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<MessageParam<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
    model: String,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Map a non-success response onto the provider error taxonomy.
fn status_error(
    status: StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &str,
) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            retry_after: retry_after(headers),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthError,
        _ => ProviderError::ApiError {
            status: status.as_u16(),
            message: serde_json::from_str::<ErrorEnvelope>(body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.to_string()),
        },
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        let system = messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str());
        let turns = messages
            .iter()
            .filter(|m| m.role != "system")
            .map(|m| MessageParam {
                role: &m.role,
                content: &m.content,
            })
            .collect();

        let request = MessagesRequest {
            model: &config.model,
            max_tokens: config.max_tokens,
            system,
            messages: turns,
            temperature: (config.temperature > 0.0).then_some(config.temperature),
        };

        // SECURITY: Only expose the credential here, at the point of use
        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", API_VERSION)
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &headers, &body));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let content = body
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(CompletionResponse {
            content,
            model: body.model,
            stop_reason: body.stop_reason,
        })
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
