//! Lexical Analyzer
//!
//! Computes objective text statistics without any external calls. The same
//! metrics feed the combined score on the provider path and are the only
//! signal in degraded mode.
//!
//! ## Rules
//!
//! | Metric | Rule |
//! |--------|------|
//! | words | maximal runs of Unicode letters or digits, lowercased |
//! | sentences | spans ended by `.` `!` `?` `…` (followed by whitespace or end of text) or by end of text; a span counts only if it holds a word |
//! | diversity | distinct / total, two decimals; 1 for a single word, 0 for no words |
//! | verbs | token ends in an infinitive suffix (`-ar`, `-er`, `-ir`) |
//! | nouns | token ends in a derivational suffix (`-ción`, `-dad`, `-ez`, ...) |

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::types::LexicalMetrics;

/// Infinitive endings counted as verb forms.
pub const VERB_SUFFIXES: &[&str] = &["ar", "er", "ir"];

/// Derivational endings counted as noun forms.
pub const NOUN_SUFFIXES: &[&str] = &[
    "ción", "sión", "dad", "tad", "tud", "ez", "eza", "miento", "ncia", "ismo",
];

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}]+").unwrap();

    // Terminal punctuation only ends a sentence when followed by whitespace
    // or end of text, so "3.5" and "v1.2" stay inside their sentence.
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?…]+(?:\s+|$)").unwrap();
}

/// Analyze `text` and return its lexical metrics.
///
/// Total: every input, including the empty string, yields a value.
pub fn analyze(text: &str) -> LexicalMetrics {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return LexicalMetrics::default();
    }

    let word_count = tokens.len();
    let distinct: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let lexical_diversity = if word_count == 1 {
        1.0
    } else {
        round2(distinct.len() as f64 / word_count as f64)
    };

    let verbs = tokens.iter().filter(|t| is_verb(t)).count();
    let nouns = tokens.iter().filter(|t| is_noun(t)).count();
    let verb_noun_ratio = if nouns == 0 {
        0.0
    } else {
        round2(verbs as f64 / nouns as f64)
    };

    let metrics = LexicalMetrics {
        word_count,
        sentence_count: count_sentences(text),
        lexical_diversity,
        verb_noun_ratio,
    };

    tracing::trace!(
        words = metrics.word_count,
        sentences = metrics.sentence_count,
        verbs,
        nouns,
        "Lexical analysis complete"
    );

    metrics
}

/// Split `text` into lowercased word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Whether a lowercased token looks like an infinitive.
pub fn is_verb(token: &str) -> bool {
    ends_with_any(token, VERB_SUFFIXES)
}

/// Whether a lowercased token looks like a derived noun.
pub fn is_noun(token: &str) -> bool {
    ends_with_any(token, NOUN_SUFFIXES)
}

fn count_sentences(text: &str) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|span| WORD.is_match(span))
        .count()
}

// The stem must be non-empty: "ir" or "ez" alone are not matches.
fn ends_with_any(token: &str, suffixes: &[&str]) -> bool {
    let len = token.chars().count();
    suffixes
        .iter()
        .any(|suffix| token.ends_with(suffix) && len > suffix.chars().count())
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_text_yields_zeros() {
        for text in ["", "   ", "\n\t", "¿?!..."] {
            let metrics = analyze(text);
            assert_eq!(metrics.word_count, 0, "text: {:?}", text);
            assert_eq!(metrics.sentence_count, 0, "text: {:?}", text);
            assert_eq!(metrics.lexical_diversity, 0.0);
            assert_eq!(metrics.verb_noun_ratio, 0.0);
        }
    }

    #[test]
    fn test_word_count_scenario() {
        let metrics = analyze("hola mundo esto es una prueba");
        assert_eq!(metrics.word_count, 6);
        assert_eq!(metrics.lexical_diversity, 1.0);
    }

    #[test]
    fn test_repeated_words_halve_diversity() {
        let metrics = analyze("el gato come el gato come");
        assert_eq!(metrics.word_count, 6);
        assert_eq!(metrics.lexical_diversity, 0.5);
    }

    #[test]
    fn test_single_word_has_full_diversity() {
        let metrics = analyze("Hola");
        assert_eq!(metrics.word_count, 1);
        assert_eq!(metrics.sentence_count, 1);
        assert_eq!(metrics.lexical_diversity, 1.0);
    }

    #[test]
    fn test_tokens_are_case_normalized() {
        let metrics = analyze("Gato gato GATO");
        assert_eq!(metrics.word_count, 3);
        assert_eq!(metrics.lexical_diversity, 0.33);
    }

    #[test]
    fn test_punctuation_splits_tokens() {
        assert_eq!(tokenize("¡Hola, mundo!¿Qué tal?"), vec!["hola", "mundo", "qué", "tal"]);
    }

    #[test]
    fn test_sentence_counting() {
        assert_eq!(analyze("Sin puntuación final").sentence_count, 1);
        assert_eq!(analyze("Hola. Qué tal").sentence_count, 2);
        assert_eq!(analyze("¿De verdad?! Sí... Claro.").sentence_count, 3);
        assert_eq!(analyze("Cuesta 3.5 euros.").sentence_count, 1);
        assert_eq!(analyze("Uno.\nDos.\n\nTres!").sentence_count, 3);
    }

    #[test]
    fn test_verb_and_noun_detection() {
        assert!(is_verb("caminar"));
        assert!(is_verb("comer"));
        assert!(is_verb("vivir"));
        assert!(!is_verb("ir"));
        assert!(!is_verb("gato"));

        assert!(is_noun("canción"));
        assert!(is_noun("verdad"));
        assert!(is_noun("rapidez"));
        assert!(is_noun("movimiento"));
        assert!(!is_noun("ez"));
        assert!(!is_noun("mundo"));
    }

    #[test]
    fn test_verb_noun_ratio() {
        // verbs: organizar, revisar, planificar; nouns: planificación, prioridad
        let metrics = analyze("Organizar la planificación, revisar la prioridad y planificar.");
        assert_eq!(metrics.verb_noun_ratio, 1.5);
    }

    #[test]
    fn test_no_nouns_means_zero_ratio() {
        let metrics = analyze("quiero comer y dormir");
        assert_eq!(metrics.verb_noun_ratio, 0.0);
    }

    proptest! {
        #[test]
        fn prop_diversity_bounded_and_rounded(text in "\\PC{0,200}") {
            let metrics = analyze(&text);
            prop_assert!(metrics.lexical_diversity >= 0.0);
            prop_assert!(metrics.lexical_diversity <= 1.0);
            let scaled = metrics.lexical_diversity * 100.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-9);
        }

        #[test]
        fn prop_ratio_non_negative(text in "[a-zñóáéíú ,.!?]{0,200}") {
            let metrics = analyze(&text);
            prop_assert!(metrics.verb_noun_ratio >= 0.0);
            if metrics.word_count > 0 {
                prop_assert!(metrics.sentence_count >= 1);
            }
        }
    }
}
