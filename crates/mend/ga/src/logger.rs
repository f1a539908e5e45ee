use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::variant::{OrdinalNumber, Variant};

/// Fitness spread of one generation's survivors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub generation: OrdinalNumber,
    pub variants: usize,
    pub max_fitness: f64,
    pub max_count: usize,
    pub min_fitness: f64,
    pub min_count: usize,
    /// First variant in list order reaching the maximum.
    pub best_id: Option<u64>,
}

/// Per-generation progress reporting, owned by the engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvolutionLogger;

impl EvolutionLogger {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, generation: OrdinalNumber, variants: &[Arc<Variant>]) -> GenerationSummary {
        let mut best: Option<&Arc<Variant>> = None;
        let mut worst: Option<&Arc<Variant>> = None;
        for v in variants {
            if best.map_or(true, |b| v.fitness.value() > b.fitness.value() && !v.fitness.approx_eq(&b.fitness)) {
                best = Some(v);
            }
            if worst.map_or(true, |w| v.fitness.value() < w.fitness.value() && !v.fitness.approx_eq(&w.fitness)) {
                worst = Some(v);
            }
        }
        let count = |target: Option<&Arc<Variant>>| {
            target.map_or(0, |t| variants.iter().filter(|v| v.fitness.approx_eq(&t.fitness)).count())
        };
        GenerationSummary {
            generation,
            variants: variants.len(),
            max_fitness: best.map_or(0.0, |v| v.fitness.value()),
            max_count: count(best),
            min_fitness: worst.map_or(0.0, |v| v.fitness.value()),
            min_count: count(worst),
            best_id: best.map(|v| v.id),
        }
    }

    /// Log the spread of `variants` and the edits of the best one.
    pub fn log(&self, generation: OrdinalNumber, variants: &[Arc<Variant>]) -> GenerationSummary {
        let summary = self.summarize(generation, variants);
        info!(
            %generation,
            count = summary.max_count,
            fitness = summary.max_fitness,
            "max fitness"
        );
        info!(
            %generation,
            count = summary.min_count,
            fitness = summary.min_fitness,
            "min fitness"
        );
        if let Some(best) = summary
            .best_id
            .and_then(|id| variants.iter().find(|v| v.id == id))
        {
            if best.gene.is_empty() {
                info!("best variant: no diff");
            } else {
                info!(id = best.id, gene = %best.gene, "best variant");
            }
        }
        summary
    }
}
