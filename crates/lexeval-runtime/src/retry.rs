//! Bounded retry around a single provider call.
//!
//! Every attempt runs under its own timeout. Failures are classified into a
//! small taxonomy; retriable ones are retried with exponential backoff until
//! the attempt budget is spent, non-retriable ones stop immediately.

use backon::{ExponentialBuilder, Retryable};
use lazy_static::lazy_static;
use lexeval_core::ProviderScores;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::RetryConfig;
use crate::providers::{ProviderError, ProviderRequest, ScoreProvider};

/// Classified cause of a failed provider attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    Network,
    RateLimit,
    InvalidResponse,
    Timeout,
    Unknown,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::Network => "network",
            FailureReason::RateLimit => "rate-limit",
            FailureReason::InvalidResponse => "invalid-response",
            FailureReason::Timeout => "timeout",
            FailureReason::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified failure and whether another attempt may help.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub reason: FailureReason,
    pub retriable: bool,
}

impl Classification {
    fn retriable(reason: FailureReason) -> Self {
        Self {
            reason,
            retriable: true,
        }
    }

    fn fatal(reason: FailureReason) -> Self {
        Self {
            reason,
            retriable: false,
        }
    }
}

lazy_static! {
    /// Keyword rules for free-text failures, checked in order.
    static ref MESSAGE_RULES: Vec<(Regex, FailureReason)> = vec![
        (
            Regex::new(r"(?i)rate[\s_-]?limit|quota|too many requests|\b429\b").unwrap(),
            FailureReason::RateLimit,
        ),
        (
            Regex::new(r"(?i)time[sd]?[\s_-]?out|timed out|deadline").unwrap(),
            FailureReason::Timeout,
        ),
        (
            Regex::new(r"(?i)network|connection|connect|dns|fetch|socket|unreachable").unwrap(),
            FailureReason::Network,
        ),
        (
            Regex::new(r"(?i)json|parse|invalid response|malformed|unexpected token").unwrap(),
            FailureReason::InvalidResponse,
        ),
    ];
}

/// Classify a provider error.
pub fn classify(error: &ProviderError) -> Classification {
    match error {
        ProviderError::HttpError(_) => Classification::retriable(FailureReason::Network),
        ProviderError::RateLimited { .. } => Classification::retriable(FailureReason::RateLimit),
        ProviderError::Timeout(_) => Classification::retriable(FailureReason::Timeout),
        ProviderError::InvalidResponse(_) => {
            Classification::retriable(FailureReason::InvalidResponse)
        }
        ProviderError::ApiError { status, .. } => match *status {
            429 => Classification::retriable(FailureReason::RateLimit),
            408 => Classification::retriable(FailureReason::Timeout),
            500..=599 => Classification::retriable(FailureReason::Network),
            _ => Classification::fatal(FailureReason::Unknown),
        },
        ProviderError::AuthError | ProviderError::NotConfigured(_) => {
            Classification::fatal(FailureReason::Unknown)
        }
        ProviderError::Other(message) => MESSAGE_RULES
            .iter()
            .find(|(pattern, _)| pattern.is_match(message))
            .map(|(_, reason)| Classification::retriable(*reason))
            .unwrap_or(Classification::retriable(FailureReason::Unknown)),
    }
}

/// The provider call did not produce scores.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("provider call failed after {attempts} attempt(s): {reason} ({last_error})")]
pub struct RetryFailure {
    /// Attempts made, at least 1
    pub attempts: u32,

    /// Classification of the last failure
    pub reason: FailureReason,

    /// True when the whole attempt budget was spent
    pub exhausted: bool,

    /// Message of the last failure
    pub last_error: String,
}

#[derive(Debug)]
struct AttemptError {
    classification: Classification,
    message: String,

    /// Minimum wait the provider asked for
    retry_after: Option<Duration>,
}

impl From<ProviderError> for AttemptError {
    fn from(error: ProviderError) -> Self {
        let retry_after = match &error {
            ProviderError::RateLimited { retry_after } => *retry_after,
            _ => None,
        };
        Self {
            classification: classify(&error),
            message: error.to_string(),
            retry_after,
        }
    }
}

/// Reject scores that carry no usable category.
fn check_scores(scores: ProviderScores) -> Result<ProviderScores, ProviderError> {
    if scores.categories.values().any(|score| score.is_finite()) {
        Ok(scores)
    } else {
        Err(ProviderError::InvalidResponse(
            "provider returned no finite category score".to_string(),
        ))
    }
}

/// Calls a [`ScoreProvider`] under a [`RetryConfig`].
#[derive(Clone)]
pub struct RetryCaller {
    provider: Arc<dyn ScoreProvider>,
    config: RetryConfig,
}

impl RetryCaller {
    pub fn new(provider: Arc<dyn ScoreProvider>, config: RetryConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn backoff(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.config.min_delay)
            .with_max_delay(self.config.max_delay)
            .with_factor(self.config.factor)
            .with_max_times(self.config.max_attempts.saturating_sub(1) as usize);

        if self.config.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }

    /// Call the provider until it succeeds, a non-retriable failure occurs,
    /// or the attempt budget is spent.
    pub async fn call_with_retry(
        &self,
        request: &ProviderRequest,
    ) -> Result<ProviderScores, RetryFailure> {
        let attempts = AtomicU32::new(0);
        let counter = &attempts;
        let provider = &self.provider;
        let attempt_timeout = self.config.attempt_timeout;
        let max_delay = self.config.max_delay;

        let result = (move || async move {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(
                provider = provider.name(),
                attempt,
                analysis_type = %request.analysis_type,
                "Calling score provider"
            );

            match tokio::time::timeout(attempt_timeout, provider.score(request)).await {
                Ok(Ok(scores)) => check_scores(scores).map_err(AttemptError::from),
                Ok(Err(error)) => Err(AttemptError::from(error)),
                Err(_) => Err(AttemptError::from(ProviderError::Timeout(attempt_timeout))),
            }
        })
        .retry(self.backoff())
        .sleep(tokio::time::sleep)
        .when(|error: &AttemptError| error.classification.retriable)
        // A Retry-After hint stretches the next delay, capped at max_delay.
        .adjust(|error: &AttemptError, delay: Option<Duration>| {
            delay.map(|delay| match error.retry_after {
                Some(hint) => delay.max(hint.min(max_delay)),
                None => delay,
            })
        })
        .notify(|error: &AttemptError, delay| {
            tracing::warn!(
                attempt = counter.load(Ordering::SeqCst),
                reason = %error.classification.reason,
                delay_ms = delay.as_millis() as u64,
                error = %error.message,
                "Provider attempt failed, retrying"
            );
        })
        .await;

        let attempts = attempts.load(Ordering::SeqCst);
        result.map_err(|error| RetryFailure {
            attempts,
            reason: error.classification.reason,
            exhausted: error.classification.retriable,
            last_error: error.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lexeval_core::AnalysisType;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Fails with scripted errors, then succeeds.
    struct ScriptedProvider {
        failures: Mutex<Vec<ProviderError>>,
        calls: AtomicU32,
    }

    impl ScriptedProvider {
        fn new(mut failures: Vec<ProviderError>) -> Self {
            failures.reverse();
            Self {
                failures: Mutex::new(failures),
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ScoreProvider for ScriptedProvider {
        async fn score(&self, _request: &ProviderRequest) -> Result<ProviderScores, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failures.lock().unwrap().pop() {
                Some(error) => Err(error),
                None => Ok(ProviderScores {
                    categories: BTreeMap::from([("clarity".to_string(), 80.0)]),
                    confidence: 85.0,
                    justification: None,
                }),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct AlwaysFailing(fn() -> ProviderError);

    #[async_trait]
    impl ScoreProvider for AlwaysFailing {
        async fn score(&self, _request: &ProviderRequest) -> Result<ProviderScores, ProviderError> {
            Err((self.0)())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct Hanging;

    #[async_trait]
    impl ScoreProvider for Hanging {
        async fn score(&self, _request: &ProviderRequest) -> Result<ProviderScores, ProviderError> {
            std::future::pending().await
        }

        fn name(&self) -> &str {
            "hanging"
        }
    }

    fn config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            attempt_timeout: Duration::from_secs(1),
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            factor: 2.0,
            jitter: false,
        }
    }

    fn request() -> ProviderRequest {
        ProviderRequest {
            text: "hola mundo".to_string(),
            analysis_type: AnalysisType::Analyze,
            context: None,
        }
    }

    #[test]
    fn test_classification_table() {
        let cases = [
            (ProviderError::HttpError("reset".into()), FailureReason::Network, true),
            (
                ProviderError::RateLimited { retry_after: None },
                FailureReason::RateLimit,
                true,
            ),
            (
                ProviderError::ApiError { status: 429, message: String::new() },
                FailureReason::RateLimit,
                true,
            ),
            (
                ProviderError::ApiError { status: 408, message: String::new() },
                FailureReason::Timeout,
                true,
            ),
            (
                ProviderError::ApiError { status: 503, message: String::new() },
                FailureReason::Network,
                true,
            ),
            (
                ProviderError::ApiError { status: 400, message: "bad".into() },
                FailureReason::Unknown,
                false,
            ),
            (ProviderError::AuthError, FailureReason::Unknown, false),
            (
                ProviderError::InvalidResponse("no json".into()),
                FailureReason::InvalidResponse,
                true,
            ),
            (
                ProviderError::Timeout(Duration::from_secs(1)),
                FailureReason::Timeout,
                true,
            ),
        ];

        for (error, reason, retriable) in cases {
            let classification = classify(&error);
            assert_eq!(classification.reason, reason, "error: {}", error);
            assert_eq!(classification.retriable, retriable, "error: {}", error);
        }
    }

    #[test]
    fn test_free_text_messages_classified_by_keyword() {
        let cases = [
            ("Quota exceeded for this month", FailureReason::RateLimit),
            ("request timed out", FailureReason::Timeout),
            ("fetch failed: ECONNREFUSED", FailureReason::Network),
            ("Unexpected token < in JSON at position 0", FailureReason::InvalidResponse),
            ("something odd happened", FailureReason::Unknown),
        ];

        for (message, reason) in cases {
            let classification = classify(&ProviderError::Other(message.to_string()));
            assert_eq!(classification.reason, reason, "message: {}", message);
            assert!(classification.retriable);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ProviderError::HttpError("connection reset".into()),
            ProviderError::RateLimited { retry_after: None },
        ]));
        let caller = RetryCaller::new(provider.clone(), config(3));

        let scores = caller.call_with_retry(&request()).await.unwrap();
        assert_eq!(scores.categories["clarity"], 80.0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_reports_attempts_and_last_reason() {
        let caller = RetryCaller::new(
            Arc::new(AlwaysFailing(|| ProviderError::HttpError("dns failure".into()))),
            config(4),
        );

        let failure = caller.call_with_retry(&request()).await.unwrap_err();
        assert_eq!(failure.attempts, 4);
        assert_eq!(failure.reason, FailureReason::Network);
        assert!(failure.exhausted);
        assert!(failure.last_error.contains("dns failure"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retriable_failure_stops_immediately() {
        let caller =
            RetryCaller::new(Arc::new(AlwaysFailing(|| ProviderError::AuthError)), config(5));

        let failure = caller.call_with_retry(&request()).await.unwrap_err();
        assert_eq!(failure.attempts, 1);
        assert_eq!(failure.reason, FailureReason::Unknown);
        assert!(!failure.exhausted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_attempts_time_out() {
        let caller = RetryCaller::new(Arc::new(Hanging), config(2));

        let failure = caller.call_with_retry(&request()).await.unwrap_err();
        assert_eq!(failure.attempts, 2);
        assert_eq!(failure.reason, FailureReason::Timeout);
        assert!(failure.exhausted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_budget() {
        let provider = Arc::new(ScriptedProvider::new(vec![ProviderError::HttpError(
            "reset".into(),
        )]));
        let caller = RetryCaller::new(provider.clone(), config(1));

        let failure = caller.call_with_retry(&request()).await.unwrap_err();
        assert_eq!(failure.attempts, 1);
        assert!(failure.exhausted);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_waits_between_attempts() {
        let caller = RetryCaller::new(
            Arc::new(AlwaysFailing(|| ProviderError::HttpError("reset".into()))),
            config(3),
        );

        let started = tokio::time::Instant::now();
        let _ = caller.call_with_retry(&request()).await;

        // 100ms then 200ms
        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    struct FixedScores(BTreeMap<String, f64>);

    #[async_trait]
    impl ScoreProvider for FixedScores {
        async fn score(&self, _request: &ProviderRequest) -> Result<ProviderScores, ProviderError> {
            Ok(ProviderScores {
                categories: self.0.clone(),
                confidence: 95.0,
                justification: None,
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_scores_without_usable_categories_are_invalid() {
        for categories in [
            BTreeMap::new(),
            BTreeMap::from([("clarity".to_string(), f64::NAN)]),
            BTreeMap::from([("tone".to_string(), f64::INFINITY)]),
        ] {
            let caller = RetryCaller::new(Arc::new(FixedScores(categories)), config(2));

            let failure = caller.call_with_retry(&request()).await.unwrap_err();
            assert_eq!(failure.reason, FailureReason::InvalidResponse);
            assert_eq!(failure.attempts, 2);
            assert!(failure.exhausted);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_finite_category_is_enough() {
        let categories = BTreeMap::from([
            ("clarity".to_string(), f64::NAN),
            ("tone".to_string(), 60.0),
        ]);
        let caller = RetryCaller::new(Arc::new(FixedScores(categories)), config(2));

        assert!(caller.call_with_retry(&request()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_stretches_delay() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            ProviderError::RateLimited {
                retry_after: Some(Duration::from_secs(30)),
            },
            ProviderError::RateLimited {
                retry_after: Some(Duration::from_secs(30)),
            },
        ]));
        let caller = RetryCaller::new(
            provider.clone(),
            RetryConfig {
                max_delay: Duration::from_secs(60),
                ..config(3)
            },
        );

        let started = tokio::time::Instant::now();
        caller.call_with_retry(&request()).await.unwrap();

        assert!(started.elapsed() >= Duration::from_secs(60));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_capped_at_max_delay() {
        let caller = RetryCaller::new(
            Arc::new(AlwaysFailing(|| ProviderError::RateLimited {
                retry_after: Some(Duration::from_secs(30)),
            })),
            config(3),
        );

        let started = tokio::time::Instant::now();
        let failure = caller.call_with_retry(&request()).await.unwrap_err();

        // Two delays, each capped at the 1s max_delay
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(2));
        assert!(elapsed < Duration::from_secs(30));
        assert_eq!(failure.reason, FailureReason::RateLimit);
    }

    #[test]
    fn test_failure_display() {
        let failure = RetryFailure {
            attempts: 3,
            reason: FailureReason::RateLimit,
            exhausted: true,
            last_error: "Rate limit exceeded".to_string(),
        };
        let rendered = failure.to_string();
        assert!(rendered.contains("3 attempt(s)"));
        assert!(rendered.contains("rate-limit"));
    }
}
