//! # lexeval-core
//!
//! Deterministic building blocks for evaluating short generated texts.
//!
//! This crate provides the parts of an evaluation that never touch the
//! network:
//! - Lexical analysis of the text itself
//! - The policy that blends provider category scores with lexical metrics
//! - Static fallback content served when the provider is unavailable
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same text always produces the same metrics and score
//! 2. **Total**: Analysis and combination never fail, for any input
//! 3. **Read-only pools**: Fallback catalogs are immutable statics
//!
//! ## Example
//!
//! ```rust
//! use lexeval_core::{analyze, ScoreCombiner};
//! use std::collections::BTreeMap;
//!
//! let metrics = analyze("el gato come el gato come");
//! assert_eq!(metrics.word_count, 6);
//! assert_eq!(metrics.lexical_diversity, 0.5);
//!
//! let combination = ScoreCombiner::new().combine(&BTreeMap::new(), &metrics);
//! assert!(combination.combined_score <= 100);
//! ```

pub mod combiner;
pub mod fallback;
pub mod lexical;
pub mod types;

// Re-export main types at crate root
pub use combiner::{Combination, LexicalBreakdown, QualityBand, ScoreCombiner};
pub use fallback::{
    ContentSource, FallbackContent, FallbackPayload, RandomSource, SeededRandom, ThreadRandom,
};
pub use lexical::analyze;
pub use types::{
    AnalysisType, EvaluationResult, LexicalMetrics, ParseAnalysisTypeError, ProviderScores,
    DEGRADED_CONFIDENCE, DEGRADED_JUSTIFICATION_PREFIX,
};
