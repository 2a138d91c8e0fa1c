//! Provider abstractions for lexeval-runtime.
//!
//! Two layers:
//! - [`LlmProvider`]: a chat-completion transport (Anthropic, test doubles)
//! - [`ScoreProvider`]: the capability the retry caller invokes, returning
//!   raw category scores for one [`ProviderRequest`]
//!
//! [`LlmScoreProvider`] adapts the first into the second by building the
//! prompt and validating the reply.
//!
//! ## Security
//!
//! Provider keys are held in an [`ApiCredential`]; see the [`secrets`] module.

use async_trait::async_trait;
use lexeval_core::{AnalysisType, ProviderScores};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

mod scoring;
pub mod secrets;

#[cfg(feature = "anthropic")]
mod anthropic;

pub use scoring::{parse_score_reply, LlmScoreProvider};
pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "anthropic")]
pub use anthropic::{AnthropicProvider, ANTHROPIC_API_KEY_ENV};

use crate::config::{ProviderKind, ProviderSettings};

/// Errors from providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Failures reported only as free text, classified by inspection.
    #[error("{0}")]
    Other(String),
}

/// Configuration for a completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Transport-level request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-5-20250514".to_string(),
            max_tokens: 400,
            temperature: 0.0,
            timeout: Duration::from_secs(15),
        }
    }
}

impl From<&ProviderSettings> for CompletionConfig {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            timeout: settings.request_timeout,
        }
    }
}

/// A chat message for LLM completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Response from an LLM completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Model used
    pub model: String,

    /// Stop reason
    pub stop_reason: Option<String>,
}

/// Chat-completion transport.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Get provider name for logs.
    fn name(&self) -> &str;
}

/// What the provider is asked to score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRequest {
    pub text: String,
    pub analysis_type: AnalysisType,

    /// Opaque caller data forwarded into the prompt
    pub context: Option<serde_json::Value>,
}

/// The provider-call capability used by the retry caller.
///
/// Implementations make exactly one attempt per call; retries, timeouts
/// and backoff are the caller's concern.
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    async fn score(&self, request: &ProviderRequest) -> Result<ProviderScores, ProviderError>;

    fn name(&self) -> &str;
}

/// Stand-in used when no provider is configured. Every call fails with a
/// non-retriable error, so evaluations go straight to degraded mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableProvider;

#[async_trait]
impl ScoreProvider for UnavailableProvider {
    async fn score(&self, _request: &ProviderRequest) -> Result<ProviderScores, ProviderError> {
        Err(ProviderError::NotConfigured(
            "no scoring provider configured".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Build the score provider described by `settings`.
pub fn build_score_provider(
    settings: &ProviderSettings,
) -> Result<Arc<dyn ScoreProvider>, ProviderError> {
    match settings.kind {
        ProviderKind::None => Ok(Arc::new(UnavailableProvider)),
        #[cfg(feature = "anthropic")]
        ProviderKind::Anthropic => {
            let mut transport = AnthropicProvider::from_env(&settings.api_key_env)?;
            if let Some(url) = &settings.base_url {
                transport = transport.with_base_url(url.clone());
            }
            Ok(Arc::new(LlmScoreProvider::new(
                Arc::new(transport),
                CompletionConfig::from(settings),
            )))
        }
        #[cfg(not(feature = "anthropic"))]
        ProviderKind::Anthropic => Err(ProviderError::NotConfigured(
            "Anthropic provider requires the 'anthropic' feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_creation() {
        let system = ChatMessage::system("You are an evaluator.");
        assert_eq!(system.role, "system");

        let user = ChatMessage::user("Hola");
        assert_eq!(user.role, "user");
    }

    #[test]
    fn test_completion_config_from_settings() {
        let settings = ProviderSettings {
            model: "test-model".to_string(),
            max_tokens: 123,
            ..Default::default()
        };
        let config = CompletionConfig::from(&settings);
        assert_eq!(config.model, "test-model");
        assert_eq!(config.max_tokens, 123);
        assert_eq!(config.timeout, settings.request_timeout);
    }

    #[tokio::test]
    async fn test_unavailable_provider_always_fails() {
        let request = ProviderRequest {
            text: "hola".to_string(),
            analysis_type: AnalysisType::Analyze,
            context: None,
        };
        let result = UnavailableProvider.score(&request).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_none_kind_builds_unavailable_provider() {
        let settings = ProviderSettings::default();
        let provider = build_score_provider(&settings).unwrap();
        assert_eq!(provider.name(), "unavailable");
    }
}
