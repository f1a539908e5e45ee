use mend_build::CacheStats;
use mend_ga::{GenerationSummary, StoreStats};
use serde::{Deserialize, Serialize};

/// Counters for one repair run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Variants built and tested, the initial one included.
    pub variants_evaluated: u64,
    /// Variants whose program did not compile.
    pub build_failures: u64,
    /// Genes whose target vanished before evaluation.
    pub ungenerable: u64,
    /// Genes skipped because their program was already evaluated.
    pub duplicates: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub solutions: usize,
    /// Best fitness among the variants each generation produced; entry 0 is
    /// the initial variant.
    pub best_fitness_history: Vec<f64>,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_generation(&mut self, summary: &GenerationSummary) {
        self.best_fitness_history.push(summary.max_fitness);
    }

    /// Copy the store and cache counters.
    pub fn absorb(&mut self, store: StoreStats, cache: CacheStats, solutions: usize) {
        self.variants_evaluated = store.evaluated;
        self.build_failures = store.build_failures;
        self.ungenerable = store.ungenerable;
        self.duplicates = store.duplicates;
        self.cache_hits = cache.hits;
        self.cache_misses = cache.misses;
        self.solutions = solutions;
    }

    pub fn best_fitness(&self) -> f64 {
        self.best_fitness_history.iter().copied().fold(0.0, f64::max)
    }

    pub fn build_failure_rate(&self) -> f64 {
        if self.variants_evaluated == 0 {
            return 0.0;
        }
        self.build_failures as f64 / self.variants_evaluated as f64
    }

    pub fn cache_hit_rate(&self) -> f64 {
        let lookups = self.cache_hits + self.cache_misses;
        if lookups == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / lookups as f64
    }
}
