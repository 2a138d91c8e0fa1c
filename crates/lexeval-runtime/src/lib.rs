//! # lexeval-runtime
//!
//! Provider-backed evaluation with graceful degradation.
//!
//! This crate wraps the deterministic pieces of `lexeval-core` with the
//! parts that talk to the outside world:
//! - A bounded retry caller around the scoring provider
//! - The [`Evaluator`], which always returns an [`EvaluationResult`]
//! - Configuration, prompts and an optional request-level cache
//!
//! ## Important
//!
//! `Evaluator::evaluate` never fails. When the provider cannot be reached,
//! keeps failing, or returns something unusable, the result is computed from
//! lexical metrics alone. Such results carry
//! [`DEGRADED_CONFIDENCE`](lexeval_core::DEGRADED_CONFIDENCE) and a
//! justification starting with
//! [`DEGRADED_JUSTIFICATION_PREFIX`](lexeval_core::DEGRADED_JUSTIFICATION_PREFIX).
//!
//! ## Example
//!
//! ```rust
//! use lexeval_runtime::{AnalysisType, Evaluator};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let evaluator = Evaluator::offline();
//! let result = evaluator
//!     .evaluate("hola mundo esto es una prueba", AnalysisType::Analyze, None)
//!     .await;
//!
//! assert_eq!(result.lexical_metrics.word_count, 6);
//! assert!(result.combined_score <= 100);
//! # });
//! ```

pub mod cache;
pub mod config;
pub mod evaluator;
pub mod prompts;
pub mod providers;
pub mod retry;

pub use cache::EvaluationCache;
pub use config::{
    CacheConfig, ConfigError, ProviderKind, ProviderSettings, RetryConfig, RuntimeConfig,
};
pub use evaluator::{EvaluationInput, Evaluator};
pub use providers::{
    build_score_provider, LlmProvider, LlmScoreProvider, ProviderError, ProviderRequest,
    ScoreProvider, UnavailableProvider,
};
pub use retry::{classify, Classification, FailureReason, RetryCaller, RetryFailure};

pub use lexeval_core::{AnalysisType, EvaluationResult, LexicalMetrics, ProviderScores};
