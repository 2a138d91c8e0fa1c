//! Adapter from a chat-completion transport to the scoring capability.
//!
//! Provider replies are untrusted: they are extracted, checked against a
//! JSON Schema and only then turned into [`ProviderScores`]. Anything that
//! fails is an invalid response, never a best-effort parse.

use async_trait::async_trait;
use lexeval_core::ProviderScores;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use super::{CompletionConfig, LlmProvider, ProviderError, ProviderRequest, ScoreProvider};
use crate::prompts;

/// Compiled reply schema (initialized once, reused).
static REPLY_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

fn reply_validator() -> Result<&'static jsonschema::Validator, ProviderError> {
    let compiled = REPLY_SCHEMA.get_or_init(|| {
        let schema = serde_json::json!({
            "type": "object",
            "required": ["scores", "confidence"],
            "properties": {
                "scores": {
                    "type": "object",
                    "minProperties": 1,
                    "additionalProperties": {
                        "type": "number",
                        "minimum": 0,
                        "maximum": 100
                    }
                },
                "confidence": { "type": "number", "minimum": 0, "maximum": 100 },
                "justification": { "type": "string" }
            }
        });

        jsonschema::options()
            .build(&schema)
            .map_err(|e| format!("Failed to compile reply schema: {}", e))
    });

    compiled
        .as_ref()
        .map_err(|e| ProviderError::NotConfigured(e.clone()))
}

#[derive(Debug, Deserialize)]
struct ScoreReply {
    scores: BTreeMap<String, f64>,
    confidence: f64,
    #[serde(default)]
    justification: Option<String>,
}

/// Parse a provider reply into scores.
///
/// Accepts the JSON object alone or wrapped in prose / code fences.
pub fn parse_score_reply(content: &str) -> Result<ProviderScores, ProviderError> {
    let json = extract_object(content).ok_or_else(|| {
        ProviderError::InvalidResponse("reply contains no JSON object".to_string())
    })?;

    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed JSON: {}", e)))?;

    let errors: Vec<String> = reply_validator()?
        .iter_errors(&value)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();
    if !errors.is_empty() {
        return Err(ProviderError::InvalidResponse(errors.join("; ")));
    }

    let reply: ScoreReply = serde_json::from_value(value)
        .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

    Ok(ProviderScores {
        categories: reply.scores,
        confidence: reply.confidence,
        justification: reply.justification.filter(|j| !j.trim().is_empty()),
    })
}

fn extract_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (start < end).then(|| &content[start..=end])
}

/// Scores texts by prompting an [`LlmProvider`].
pub struct LlmScoreProvider {
    transport: Arc<dyn LlmProvider>,
    config: CompletionConfig,
}

impl LlmScoreProvider {
    pub fn new(transport: Arc<dyn LlmProvider>, config: CompletionConfig) -> Self {
        Self { transport, config }
    }
}

#[async_trait]
impl ScoreProvider for LlmScoreProvider {
    async fn score(&self, request: &ProviderRequest) -> Result<ProviderScores, ProviderError> {
        let messages = prompts::build_messages(request);
        let response = self.transport.complete(messages, &self.config).await?;

        tracing::debug!(
            provider = self.transport.name(),
            model = %response.model,
            stop_reason = ?response.stop_reason,
            "Provider reply received"
        );

        parse_score_reply(&response.content)
    }

    fn name(&self) -> &str {
        self.transport.name()
    }
}
