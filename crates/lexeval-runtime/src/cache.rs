//! Request-level result cache.
//!
//! Sits in front of the evaluator so repeated requests skip the provider.
//! Keys start with the analysis type, so one type can be dropped at once
//! with [`EvaluationCache::invalidate_prefix`].

use lexeval_core::{AnalysisType, EvaluationResult};
use moka::future::Cache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::config::CacheConfig;

/// Evaluation cache using moka.
pub struct EvaluationCache {
    cache: Cache<String, EvaluationResult>,
}

impl EvaluationCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self { cache }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_entries, config.ttl)
    }

    /// Key for one request: `"<analysis_type>:<hash of text and context>"`.
    pub fn key(
        text: &str,
        analysis_type: AnalysisType,
        context: Option<&serde_json::Value>,
    ) -> String {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        if let Some(context) = context {
            context.to_string().hash(&mut hasher);
        }
        format!("{}:{:016x}", analysis_type, hasher.finish())
    }

    pub async fn get(&self, key: &str) -> Option<EvaluationResult> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: String, result: EvaluationResult) {
        self.cache.insert(key, result).await;
    }

    /// Drop every entry whose key starts with `prefix`, e.g. `"advice:"`.
    pub fn invalidate_prefix(&self, prefix: &str) {
        let prefix = prefix.to_string();
        if let Err(e) = self
            .cache
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            tracing::warn!(error = %e, "Failed to register cache invalidation");
        }
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Apply pending evictions and invalidations.
    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}
