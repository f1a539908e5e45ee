use futures::stream::{self, StreamExt};
use mend_ast::{AstSet, ContentHash};
use mend_build::{CacheStats, ProjectBuilder};
use mend_exec::{ExecutionTargets, TestExecutor, TestResults};
use mend_fl::FaultLocalization;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;
use crate::fitness::CodeValidation;
use crate::gene::Gene;
use crate::generation::SourceCodeGeneration;
use crate::variant::{HistoricalElement, OrdinalNumber, Variant, VariantRequest};
use crate::variant_selection::VariantSelection;

/// Collaborators used to turn a gene into an evaluated variant.
pub struct Strategies {
    pub generation: Arc<dyn SourceCodeGeneration>,
    pub builder: ProjectBuilder,
    pub executor: Arc<dyn TestExecutor>,
    pub fault_localization: Arc<dyn FaultLocalization>,
    pub validation: Arc<dyn CodeValidation>,
    pub selection: Arc<dyn VariantSelection>,
    pub targets: ExecutionTargets,
    pub test_time_limit: Duration,
    /// Evaluations in flight at once.
    pub parallelism: usize,
    /// Skip genes whose rendered program was already evaluated.
    pub skip_duplicate_sources: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub evaluated: u64,
    pub build_failures: u64,
    pub ungenerable: u64,
    pub duplicates: u64,
}

/// A gene that materialized and is waiting for build and test.
struct Pending {
    id: u64,
    request: VariantRequest,
    source: AstSet,
    fingerprint: ContentHash,
}

/// Owns every variant of a run and the generation counter.
///
/// Each evaluated variant is held in exactly one of current, generated or
/// found solutions. The initial variant is the exception: it seeds current
/// and, when it already passes every test, is also a found solution.
pub struct VariantStore {
    original: Arc<AstSet>,
    strategies: Strategies,
    initial: Arc<Variant>,
    current: Vec<Arc<Variant>>,
    generated: Vec<Arc<Variant>>,
    found: Vec<Arc<Variant>>,
    generation: OrdinalNumber,
    next_id: u64,
    seen: HashSet<ContentHash>,
    stats: StoreStats,
}

impl VariantStore {
    /// Evaluate the unmodified program as generation 0, then move to generation 1.
    #[instrument(skip_all, fields(units = original.units().len()))]
    pub async fn new(original: AstSet, strategies: Strategies) -> Self {
        let original = Arc::new(original);
        let fingerprint = original.fingerprint();
        let pending = Pending {
            id: 0,
            request: VariantRequest::new(Gene::empty(), HistoricalElement::Original),
            source: AstSet::clone(&original),
            fingerprint,
        };
        let initial = Arc::new(evaluate(&strategies, OrdinalNumber(0), pending).await);
        info!(
            fitness = %initial.fitness,
            tests = initial.test_results.total(),
            failed = initial.test_results.failed_count(),
            build_failed = initial.test_results.build_failed,
            "initial variant evaluated"
        );
        if initial.test_results.build_failed {
            warn!("the unmodified program does not build");
        }

        let mut stats = StoreStats {
            evaluated: 1,
            ..Default::default()
        };
        if initial.test_results.build_failed {
            stats.build_failures += 1;
        }
        let found = if initial.is_completed() {
            vec![Arc::clone(&initial)]
        } else {
            Vec::new()
        };

        Self {
            original,
            strategies,
            current: vec![Arc::clone(&initial)],
            initial,
            generated: Vec::new(),
            found,
            generation: OrdinalNumber(1),
            next_id: 1,
            seen: HashSet::from([fingerprint]),
            stats,
        }
    }

    pub fn original(&self) -> &Arc<AstSet> {
        &self.original
    }

    pub fn initial_variant(&self) -> &Arc<Variant> {
        &self.initial
    }

    pub fn generation_number(&self) -> OrdinalNumber {
        self.generation
    }

    pub fn current_variants(&self) -> &[Arc<Variant>] {
        &self.current
    }

    pub fn generated_variants(&self) -> &[Arc<Variant>] {
        &self.generated
    }

    pub fn found_solutions(&self) -> &[Arc<Variant>] {
        &self.found
    }

    /// The first `max` solutions in discovery order.
    pub fn found_solutions_up_to(&self, max: usize) -> &[Arc<Variant>] {
        &self.found[..max.min(self.found.len())]
    }

    pub fn found_solutions_count(&self) -> usize {
        self.found.len()
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.strategies.builder.cache().stats()
    }

    fn prepare(&mut self, request: VariantRequest) -> Result<Pending, StoreError> {
        let source = self
            .strategies
            .generation
            .exec(&self.original, &request.gene)
            .inspect_err(|_| self.stats.ungenerable += 1)?;
        let fingerprint = source.fingerprint();
        if self.strategies.skip_duplicate_sources && !self.seen.insert(fingerprint) {
            self.stats.duplicates += 1;
            return Err(StoreError::DuplicateSource(fingerprint));
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(Pending {
            id,
            request,
            source,
            fingerprint,
        })
    }

    fn record(&mut self, variant: &Variant) {
        self.stats.evaluated += 1;
        if variant.test_results.build_failed {
            self.stats.build_failures += 1;
        }
    }

    /// Materialize, build, test and score one gene in the current generation.
    pub async fn create_variant(&mut self, request: VariantRequest) -> Result<Arc<Variant>, StoreError> {
        let pending = self.prepare(request)?;
        let variant = evaluate(&self.strategies, self.generation, pending).await;
        self.record(&variant);
        Ok(Arc::new(variant))
    }

    /// Evaluate a batch with up to `parallelism` evaluations in flight.
    ///
    /// Ungenerable and duplicate genes are skipped. Results keep request
    /// order regardless of completion order.
    #[instrument(skip_all, fields(generation = %self.generation, requests = requests.len()))]
    pub async fn create_variants(&mut self, requests: Vec<VariantRequest>) -> Vec<Arc<Variant>> {
        let mut pending = Vec::with_capacity(requests.len());
        for request in requests {
            match self.prepare(request) {
                Ok(p) => pending.push(p),
                Err(e) => debug!(error = %e, "request skipped"),
            }
        }

        let strategies = &self.strategies;
        let generation = self.generation;
        let variants: Vec<Variant> = stream::iter(pending)
            .map(|p| evaluate(strategies, generation, p))
            .buffered(strategies.parallelism.max(1))
            .collect()
            .await;

        variants
            .into_iter()
            .map(|v| {
                self.record(&v);
                Arc::new(v)
            })
            .collect()
    }

    /// Completed variants become solutions; everything else joins the generated pool.
    pub fn add_generated_variant(&mut self, variant: Arc<Variant>) {
        if variant.is_completed() {
            info!(id = variant.id, generation = %variant.generation, gene = %variant.gene, "solution found");
            self.found.push(variant);
        } else {
            self.generated.push(variant);
        }
    }

    pub fn add_generated_variants(&mut self, variants: impl IntoIterator<Item = Arc<Variant>>) {
        for v in variants {
            self.add_generated_variant(v);
        }
    }

    /// Select survivors from current and generated, advance the counter and
    /// clear the generated pool.
    pub fn proceed_next_generation(&mut self) {
        let next = self
            .strategies
            .selection
            .exec(&self.current, &self.generated);
        debug!(
            generation = %self.generation,
            survivors = next.len(),
            generated = self.generated.len(),
            "generation advanced"
        );
        self.current = next;
        self.generated.clear();
        self.generation = self.generation.next();
    }
}

#[instrument(skip_all, fields(id = pending.id, %generation))]
async fn evaluate(strategies: &Strategies, generation: OrdinalNumber, pending: Pending) -> Variant {
    let Pending {
        id,
        request,
        source,
        fingerprint,
    } = pending;

    let build = strategies.builder.build(&source).await;
    let test_results = if build.is_success() {
        strategies
            .executor
            .run(&source, &build, &strategies.targets, strategies.test_time_limit)
            .await
    } else {
        debug!(diagnostics = build.diagnostics.len(), "build failed");
        TestResults::build_failure()
    };
    let fitness = strategies.validation.exec(&source, &test_results);
    let suspiciousness = if test_results.build_failed {
        Vec::new()
    } else {
        strategies.fault_localization.exec(&source, &test_results)
    };
    debug!(%fitness, scored = suspiciousness.len(), "variant evaluated");

    Variant {
        id,
        generation,
        gene: request.gene,
        source: Arc::new(source),
        fingerprint,
        test_results,
        fitness,
        suspiciousness,
        history: request.history,
    }
}
