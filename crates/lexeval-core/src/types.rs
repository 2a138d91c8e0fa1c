//! Shared data types for lexeval evaluations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Confidence reported for every result produced without a provider response.
pub const DEGRADED_CONFIDENCE: u8 = 30;

/// Opening of every degraded-mode justification.
pub const DEGRADED_JUSTIFICATION_PREFIX: &str = "Automatic evaluation based on lexical metrics";

/// The kind of analysis the caller is asking for.
///
/// Drives the prompt sent to the provider; the lexical path ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Analyze,
    Advice,
    Patterns,
    Schedule,
    Evaluate,
}

impl AnalysisType {
    /// Every analysis type, in declaration order.
    pub const ALL: [AnalysisType; 5] = [
        AnalysisType::Analyze,
        AnalysisType::Advice,
        AnalysisType::Patterns,
        AnalysisType::Schedule,
        AnalysisType::Evaluate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Analyze => "analyze",
            AnalysisType::Advice => "advice",
            AnalysisType::Patterns => "patterns",
            AnalysisType::Schedule => "schedule",
            AnalysisType::Evaluate => "evaluate",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known analysis type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown analysis type '{0}' (expected one of: analyze, advice, patterns, schedule, evaluate)")]
pub struct ParseAnalysisTypeError(pub String);

impl FromStr for AnalysisType {
    type Err = ParseAnalysisTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        AnalysisType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseAnalysisTypeError(s.to_string()))
    }
}

/// Objective statistics computed from raw text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LexicalMetrics {
    /// Number of word tokens
    pub word_count: usize,

    /// Number of sentences containing at least one word
    pub sentence_count: usize,

    /// Distinct tokens over total tokens, two decimals, in [0, 1]
    pub lexical_diversity: f64,

    /// Detected verb forms over detected noun forms; 0 when no nouns
    pub verb_noun_ratio: f64,
}

impl LexicalMetrics {
    /// True when the analyzed text had no words at all.
    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

/// Raw category scores returned by a provider for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderScores {
    /// Category name to score on a 0-100 scale
    pub categories: BTreeMap<String, f64>,

    /// Provider-reported confidence, 0-100
    pub confidence: f64,

    /// Free-text reasoning from the provider, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// The outcome of one evaluation call.
///
/// Provider-backed and degraded results share this shape. They differ only
/// in content: degraded results carry [`DEGRADED_CONFIDENCE`] and a
/// justification starting with [`DEGRADED_JUSTIFICATION_PREFIX`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// 0-100
    pub confidence: u8,

    pub justification: String,

    /// Category name to sub-score
    pub scores: BTreeMap<String, f64>,

    pub lexical_metrics: LexicalMetrics,

    /// 0-100
    pub combined_score: u8,

    /// When this result was assembled
    pub timestamp: DateTime<Utc>,

    pub analysis_type: AnalysisType,

    /// Character count of the evaluated text
    pub response_length: usize,
}
