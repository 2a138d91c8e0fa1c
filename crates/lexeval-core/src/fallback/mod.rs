//! Fallback content: provider-independent catalogs and random picks.
//!
//! The pools are read-only statics shared by every caller. The only
//! non-determinism is the [`RandomSource`] a [`FallbackContent`] owns.

mod pools;
mod random;

pub use pools::{
    BehaviorPatterns, ScheduleBlock, ADVICE_TIPS, BEHAVIOR_PATTERNS, DAILY_SCHEDULE,
    MOTIVATIONAL_QUOTES,
};
pub use random::{RandomSource, SeededRandom, ThreadRandom};

use serde::Serialize;

/// Origin marker carried by every payload built here. Serializes as `"fallback"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Fallback,
}

/// Content tagged with its origin so callers can tell fallback data apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallbackPayload<T> {
    pub source: ContentSource,
    pub content: T,
}

impl<T> FallbackPayload<T> {
    fn fallback(content: T) -> Self {
        Self {
            source: ContentSource::Fallback,
            content,
        }
    }
}

/// Picks from the static fallback pools.
#[derive(Debug, Clone, Default)]
pub struct FallbackContent<R = ThreadRandom> {
    random: R,
}

impl FallbackContent<ThreadRandom> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RandomSource> FallbackContent<R> {
    /// Use a specific randomness source.
    pub fn with_random(random: R) -> Self {
        Self { random }
    }

    pub fn advice_tips(&self) -> &'static [&'static str] {
        &ADVICE_TIPS
    }

    pub fn motivational_quotes(&self) -> &'static [&'static str] {
        &MOTIVATIONAL_QUOTES
    }

    pub fn behavior_patterns(&self) -> &'static BehaviorPatterns {
        &BEHAVIOR_PATTERNS
    }

    pub fn daily_schedule(&self) -> &'static [ScheduleBlock] {
        &DAILY_SCHEDULE
    }

    /// A uniformly chosen advice tip.
    pub fn pick_advice(&mut self) -> &'static str {
        self.pick(&ADVICE_TIPS)
    }

    /// A uniformly chosen motivational quote.
    pub fn pick_motivational(&mut self) -> &'static str {
        self.pick(&MOTIVATIONAL_QUOTES)
    }

    pub fn advice_payload(&mut self) -> FallbackPayload<&'static str> {
        FallbackPayload::fallback(self.pick_advice())
    }

    pub fn motivational_payload(&mut self) -> FallbackPayload<&'static str> {
        FallbackPayload::fallback(self.pick_motivational())
    }

    pub fn patterns_payload(&self) -> FallbackPayload<&'static BehaviorPatterns> {
        FallbackPayload::fallback(self.behavior_patterns())
    }

    pub fn schedule_payload(&self) -> FallbackPayload<&'static [ScheduleBlock]> {
        FallbackPayload::fallback(self.daily_schedule())
    }

    // Out-of-range indices from a custom source wrap instead of panicking.
    fn pick(&mut self, pool: &'static [&'static str]) -> &'static str {
        let index = self.random.pick_index(pool.len()) % pool.len();
        pool[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedIndex(usize);

    impl RandomSource for FixedIndex {
        fn pick_index(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    #[test]
    fn test_pick_advice_is_member_of_pool() {
        let mut content = FallbackContent::new();
        for _ in 0..100 {
            let tip = content.pick_advice();
            assert!(ADVICE_TIPS.contains(&tip));
        }
    }

    #[test]
    fn test_pick_motivational_is_member_of_pool() {
        let mut content = FallbackContent::with_random(SeededRandom::new(7));
        for _ in 0..100 {
            let quote = content.pick_motivational();
            assert!(MOTIVATIONAL_QUOTES.contains(&quote));
        }
    }

    #[test]
    fn test_injected_source_makes_pick_deterministic() {
        let mut content = FallbackContent::with_random(FixedIndex(3));
        assert_eq!(content.pick_advice(), ADVICE_TIPS[3]);
        assert_eq!(content.pick_motivational(), MOTIVATIONAL_QUOTES[3]);
    }

    #[test]
    fn test_out_of_range_index_wraps() {
        let mut content = FallbackContent::with_random(FixedIndex(ADVICE_TIPS.len() + 1));
        assert_eq!(content.pick_advice(), ADVICE_TIPS[1]);
    }

    #[test]
    fn test_payloads_are_marked_fallback() {
        let mut content = FallbackContent::with_random(FixedIndex(0));

        let advice = serde_json::to_value(content.advice_payload()).unwrap();
        assert_eq!(advice["source"], "fallback");
        assert_eq!(advice["content"], ADVICE_TIPS[0]);

        let schedule = serde_json::to_value(content.schedule_payload()).unwrap();
        assert_eq!(schedule["source"], "fallback");
        assert_eq!(schedule["content"][0]["time"], "07:30");
        assert_eq!(schedule["content"][0]["duration"], 45);

        let patterns = serde_json::to_value(content.patterns_payload()).unwrap();
        assert_eq!(patterns["source"], "fallback");
        assert!(patterns["content"]["recommendations"].is_array());

        let quote = content.motivational_payload();
        assert_eq!(quote.source, ContentSource::Fallback);
        assert_eq!(serde_json::to_value(&quote).unwrap()["source"], "fallback");
    }
}
