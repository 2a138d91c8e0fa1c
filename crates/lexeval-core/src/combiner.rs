//! Score Combiner: blends provider category scores with lexical metrics.
//!
//! The combination policy is fixed:
//! 1. Lexical metrics are normalized into a 0-100 sub-score
//!    (length 40%, diversity 35%, verb/noun balance 25%)
//! 2. `combined = round(0.70 × avg(provider categories) + 0.30 × lexical)`
//! 3. Without provider categories, `combined = round(lexical)`
//! 4. The result is clamped to [0, 100]

use std::collections::BTreeMap;

use crate::lexical::round2;
use crate::types::LexicalMetrics;

/// Share of the combined score taken by the provider's average category score.
pub const PROVIDER_WEIGHT: f64 = 0.70;

/// Share of the combined score taken by the lexical sub-score.
pub const LEXICAL_WEIGHT: f64 = 0.30;

/// Word count at which the length factor saturates.
pub const LENGTH_SATURATION_WORDS: usize = 50;

/// Verb/noun ratios inside this range score full marks on balance.
pub const IDEAL_VERB_NOUN_RANGE: (f64, f64) = (0.5, 2.0);

const LENGTH_WEIGHT: f64 = 0.40;
const DIVERSITY_WEIGHT: f64 = 0.35;
const BALANCE_WEIGHT: f64 = 0.25;

// Points lost per unit of ratio above the ideal range.
const BALANCE_DECAY_PER_UNIT: f64 = 25.0;

/// Per-factor normalization of lexical metrics, each on 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LexicalBreakdown {
    pub length: f64,
    pub diversity: f64,
    pub balance: f64,
}

impl LexicalBreakdown {
    pub fn from_metrics(metrics: &LexicalMetrics) -> Self {
        let length =
            (metrics.word_count as f64 / LENGTH_SATURATION_WORDS as f64).min(1.0) * 100.0;
        let diversity = (metrics.lexical_diversity * 100.0).clamp(0.0, 100.0);

        Self {
            length,
            diversity,
            balance: balance_score(metrics.verb_noun_ratio),
        }
    }

    /// Weighted lexical sub-score, 0-100.
    pub fn score(&self) -> f64 {
        (LENGTH_WEIGHT * self.length
            + DIVERSITY_WEIGHT * self.diversity
            + BALANCE_WEIGHT * self.balance)
            .clamp(0.0, 100.0)
    }
}

fn balance_score(ratio: f64) -> f64 {
    let (low, high) = IDEAL_VERB_NOUN_RANGE;
    if !ratio.is_finite() || ratio <= 0.0 {
        0.0
    } else if ratio < low {
        ratio / low * 100.0
    } else if ratio <= high {
        100.0
    } else {
        (100.0 - (ratio - high) * BALANCE_DECAY_PER_UNIT).max(0.0)
    }
}

/// Qualitative label for a combined score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityBand {
    Excellent,
    Good,
    Fair,
    Weak,
    Poor,
}

impl QualityBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => QualityBand::Excellent,
            70..=84 => QualityBand::Good,
            50..=69 => QualityBand::Fair,
            30..=49 => QualityBand::Weak,
            _ => QualityBand::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityBand::Excellent => "Excellent",
            QualityBand::Good => "Good",
            QualityBand::Fair => "Fair",
            QualityBand::Weak => "Weak",
            QualityBand::Poor => "Poor",
        }
    }
}

/// Output of [`ScoreCombiner::combine`].
#[derive(Debug, Clone, PartialEq)]
pub struct Combination {
    /// 0-100
    pub combined_score: u8,

    /// Lexical sub-score before weighting, 0-100
    pub lexical_score: f64,

    /// Band label plus the dominant contributing factor
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Factor {
    Provider { category: String, score: f64 },
    Length,
    Diversity,
    Balance,
}

/// Merges provider category scores with lexical metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreCombiner;

impl ScoreCombiner {
    pub fn new() -> Self {
        Self
    }

    /// Combine provider category scores with lexical metrics.
    ///
    /// Non-finite provider scores are ignored and the rest clamped to
    /// [0, 100]. An empty (or entirely ignored) map selects the
    /// lexical-only policy.
    pub fn combine(
        &self,
        provider_scores: &BTreeMap<String, f64>,
        metrics: &LexicalMetrics,
    ) -> Combination {
        let breakdown = LexicalBreakdown::from_metrics(metrics);
        let lexical_score = breakdown.score();

        let usable: Vec<(&String, f64)> = provider_scores
            .iter()
            .filter(|(_, score)| score.is_finite())
            .map(|(name, score)| (name, score.clamp(0.0, 100.0)))
            .collect();

        let (raw, provider_contribution) = if usable.is_empty() {
            (lexical_score, None)
        } else {
            let average = usable.iter().map(|(_, s)| s).sum::<f64>() / usable.len() as f64;
            let (category, score) = usable
                .iter()
                .fold(usable[0], |best, item| if item.1 > best.1 { *item } else { best });
            let factor = Factor::Provider {
                category: category.clone(),
                score,
            };
            (
                PROVIDER_WEIGHT * average + LEXICAL_WEIGHT * lexical_score,
                Some((factor, PROVIDER_WEIGHT * average)),
            )
        };

        let combined_score = raw.round().clamp(0.0, 100.0) as u8;
        let lexical_share = if provider_contribution.is_some() {
            LEXICAL_WEIGHT
        } else {
            1.0
        };

        let mut candidates: Vec<(Factor, f64)> = provider_contribution.into_iter().collect();
        candidates.push((Factor::Length, lexical_share * LENGTH_WEIGHT * breakdown.length));
        candidates.push((
            Factor::Diversity,
            lexical_share * DIVERSITY_WEIGHT * breakdown.diversity,
        ));
        candidates.push((
            Factor::Balance,
            lexical_share * BALANCE_WEIGHT * breakdown.balance,
        ));

        // First candidate wins ties, so the provider leads when it matches.
        let dominant = candidates
            .into_iter()
            .reduce(|best, item| if item.1 > best.1 { item } else { best })
            .map(|(factor, _)| factor)
            .unwrap_or(Factor::Length);

        let justification = format!(
            "{} quality ({}/100); dominant factor: {}",
            QualityBand::from_score(combined_score).label(),
            combined_score,
            describe_factor(&dominant, metrics),
        );

        Combination {
            combined_score,
            lexical_score,
            justification,
        }
    }

    /// Lexical factor scores as a category map, rounded to two decimals.
    pub fn lexical_category_scores(&self, metrics: &LexicalMetrics) -> BTreeMap<String, f64> {
        let breakdown = LexicalBreakdown::from_metrics(metrics);
        BTreeMap::from([
            ("length".to_string(), round2(breakdown.length)),
            ("lexical_diversity".to_string(), round2(breakdown.diversity)),
            ("verb_noun_balance".to_string(), round2(breakdown.balance)),
        ])
    }
}

fn describe_factor(factor: &Factor, metrics: &LexicalMetrics) -> String {
    match factor {
        Factor::Provider { category, score } => format!(
            "provider assessment (strongest category '{}' at {:.0})",
            category, score
        ),
        Factor::Length => format!("response length ({} words)", metrics.word_count),
        Factor::Diversity => format!("lexical diversity ({:.2})", metrics.lexical_diversity),
        Factor::Balance => format!("verb/noun balance ({:.2})", metrics.verb_noun_ratio),
    }
}
