//! The evaluation entry point.
//!
//! Every call ends in one of two states:
//! - SUCCESS: the provider scored the text; its categories are blended with
//!   the lexical sub-score
//! - DEGRADED: the provider could not be reached (or kept failing); the
//!   result is built from lexical metrics alone, with a fixed confidence and
//!   a justification that says so
//!
//! Callers always receive an [`EvaluationResult`]; provider failures are
//! recovered here and never escape.

use chrono::Utc;
use futures::future::join_all;
use lexeval_core::{
    analyze, AnalysisType, EvaluationResult, LexicalMetrics, ProviderScores, ScoreCombiner,
    DEGRADED_CONFIDENCE, DEGRADED_JUSTIFICATION_PREFIX,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::cache::EvaluationCache;
use crate::config::{RetryConfig, RuntimeConfig};
use crate::providers::{
    build_score_provider, ProviderError, ProviderRequest, ScoreProvider, UnavailableProvider,
};
use crate::retry::{RetryCaller, RetryFailure};

/// One item of a batch evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationInput {
    pub text: String,
    pub analysis_type: AnalysisType,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

enum Outcome {
    Success(ProviderScores),
    Degraded(RetryFailure),
}

/// Scores texts through a provider, degrading to lexical-only scoring.
pub struct Evaluator {
    caller: RetryCaller,
    combiner: ScoreCombiner,
    cache: Option<Arc<EvaluationCache>>,
}

impl Evaluator {
    pub fn new(provider: Arc<dyn ScoreProvider>, retry: RetryConfig) -> Self {
        Self {
            caller: RetryCaller::new(provider, retry),
            combiner: ScoreCombiner::new(),
            cache: None,
        }
    }

    /// An evaluator with no provider; every result is degraded.
    pub fn offline() -> Self {
        let retry = RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        };
        Self::new(Arc::new(UnavailableProvider), retry)
    }

    /// Build the provider and cache described by `config`.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, ProviderError> {
        let provider = build_score_provider(&config.provider)?;
        let evaluator = Self::new(provider, config.retry.clone());

        Ok(if config.cache.enabled {
            evaluator.with_cache(Arc::new(EvaluationCache::from_config(&config.cache)))
        } else {
            evaluator
        })
    }

    /// Reuse successful results for identical requests.
    ///
    /// A cache hit returns the stored scores and justification with a fresh
    /// `timestamp`, so the timestamp always reflects when the result was served.
    pub fn with_cache(mut self, cache: Arc<EvaluationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache(&self) -> Option<&Arc<EvaluationCache>> {
        self.cache.as_ref()
    }

    /// Evaluate one text. Never fails.
    pub async fn evaluate(
        &self,
        text: &str,
        analysis_type: AnalysisType,
        context: Option<serde_json::Value>,
    ) -> EvaluationResult {
        let metrics = analyze(text);

        let cache_key = self
            .cache
            .as_ref()
            .map(|_| EvaluationCache::key(text, analysis_type, context.as_ref()));
        if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
            if let Some(hit) = cache.get(key).await {
                tracing::debug!(%analysis_type, key = %key, "Evaluation cache hit");
                return EvaluationResult {
                    timestamp: Utc::now(),
                    ..hit
                };
            }
        }

        let request = ProviderRequest {
            text: text.to_string(),
            analysis_type,
            context,
        };

        let outcome = match self.caller.call_with_retry(&request).await {
            Ok(scores) => Outcome::Success(scores),
            Err(failure) => Outcome::Degraded(failure),
        };

        let result = self.assemble(text, analysis_type, metrics, &outcome);

        match &outcome {
            Outcome::Success(_) => {
                tracing::info!(
                    %analysis_type,
                    provider = self.caller.provider_name(),
                    combined_score = result.combined_score,
                    confidence = result.confidence,
                    "Evaluation completed"
                );
                if let (Some(cache), Some(key)) = (&self.cache, cache_key) {
                    cache.insert(key, result.clone()).await;
                }
            }
            Outcome::Degraded(failure) => {
                tracing::warn!(
                    %analysis_type,
                    provider = self.caller.provider_name(),
                    attempts = failure.attempts,
                    reason = %failure.reason,
                    exhausted = failure.exhausted,
                    combined_score = result.combined_score,
                    "Provider unavailable, using lexical evaluation"
                );
            }
        }

        result
    }

    /// Evaluate a batch concurrently; results keep input order.
    pub async fn evaluate_many(&self, inputs: Vec<EvaluationInput>) -> Vec<EvaluationResult> {
        join_all(
            inputs
                .into_iter()
                .map(|input| async move {
                    self.evaluate(&input.text, input.analysis_type, input.context)
                        .await
                }),
        )
        .await
    }

    fn assemble(
        &self,
        text: &str,
        analysis_type: AnalysisType,
        metrics: LexicalMetrics,
        outcome: &Outcome,
    ) -> EvaluationResult {
        let (confidence, justification, scores, combined_score) = match outcome {
            Outcome::Success(provider) => {
                let combination = self.combiner.combine(&provider.categories, &metrics);
                let justification = match &provider.justification {
                    Some(reason) => format!("{}. {}", combination.justification, reason.trim()),
                    None => format!("{}.", combination.justification),
                };
                (
                    clamp_confidence(provider.confidence),
                    justification,
                    provider.categories.clone(),
                    combination.combined_score,
                )
            }
            Outcome::Degraded(failure) => {
                let combination = self.combiner.combine(&Default::default(), &metrics);
                let justification = format!(
                    "{} (provider unavailable: {} after {} attempt(s)). {}.",
                    DEGRADED_JUSTIFICATION_PREFIX,
                    failure.reason,
                    failure.attempts,
                    combination.justification
                );
                (
                    DEGRADED_CONFIDENCE,
                    justification,
                    self.combiner.lexical_category_scores(&metrics),
                    combination.combined_score,
                )
            }
        };

        EvaluationResult {
            confidence,
            justification,
            scores,
            lexical_metrics: metrics,
            combined_score,
            timestamp: Utc::now(),
            analysis_type,
            response_length: text.chars().count(),
        }
    }
}

fn clamp_confidence(confidence: f64) -> u8 {
    if confidence.is_finite() {
        confidence.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}
