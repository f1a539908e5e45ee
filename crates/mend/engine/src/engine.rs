use mend_ast::{reuse_candidates, AstConstruction, AstSet};
use mend_build::{ArtifactCache, Compiler, ProjectBuilder};
use mend_exec::{ExecutionTargets, TestExecutor};
use mend_ga::{
    Crossover, DefaultCodeValidation, DefaultSourceCodeGeneration, EvolutionLogger, Mutation,
    OrdinalNumber, RandomMutation, RouletteStatementSelection, SinglePointCrossover, Strategies,
    Variant, VariantStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::config::Configuration;
use crate::error::{EngineError, EngineResult};
use crate::metrics::RunMetrics;
use crate::output::PatchOutput;
use crate::types::{RepairOutcome, StopWatch, TerminationReason};

/// Drives one repair run from the parsed program to the found solutions.
///
/// The loop is sequential: a generation is produced, evaluated and checked
/// for termination before the next one begins.
pub struct RepairEngine {
    config: Configuration,
    construction: Arc<dyn AstConstruction>,
    compiler: Arc<dyn Compiler>,
    executor: Arc<dyn TestExecutor>,
    outputs: Vec<Arc<dyn PatchOutput>>,
    logger: EvolutionLogger,
}

impl RepairEngine {
    pub fn new(
        config: Configuration,
        construction: Arc<dyn AstConstruction>,
        compiler: Arc<dyn Compiler>,
        executor: Arc<dyn TestExecutor>,
    ) -> Self {
        Self {
            config,
            construction,
            compiler,
            executor,
            outputs: Vec::new(),
            logger: EvolutionLogger::new(),
        }
    }

    /// Add a collaborator that receives the solutions when the run ends.
    pub fn with_output(mut self, output: Arc<dyn PatchOutput>) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Parse the configured project, then search.
    pub async fn run(&self) -> EngineResult<RepairOutcome> {
        self.config.validate()?;
        let original = self.construction.construct(&self.config.project)?;
        self.run_on(original).await
    }

    /// Search starting from an already parsed program.
    #[instrument(skip_all, fields(seed = self.config.random_seed, headcount = self.config.headcount))]
    pub async fn run_on(&self, original: AstSet) -> EngineResult<RepairOutcome> {
        let config = &self.config;
        if config.headcount == 0 || config.parallelism == 0 {
            return Err(EngineError::Config(
                "headcount and parallelism must be at least 1".into(),
            ));
        }
        let candidates = reuse_candidates(&original);
        if candidates.is_empty() {
            return Err(EngineError::NoReuseCandidates);
        }
        info!(
            units = original.units().len(),
            candidates = candidates.len(),
            "starting repair"
        );

        let selection = Arc::new(RouletteStatementSelection::new(candidates, config.reuse_scope));
        let mutation = RandomMutation::new(config.mutation_generating_count, selection);
        let crossover = SinglePointCrossover::new(
            config.crossover_generating_count,
            config.parent_pairing.build(),
        );
        let mut rng = StdRng::seed_from_u64(config.random_seed);

        let strategies = Strategies {
            generation: Arc::new(DefaultSourceCodeGeneration),
            builder: ProjectBuilder::new(Arc::clone(&self.compiler), Arc::new(ArtifactCache::new()))
                .with_class_paths(config.project.resolved_class_paths()),
            executor: Arc::clone(&self.executor),
            fault_localization: config.fault_localization.build(),
            validation: Arc::new(DefaultCodeValidation),
            selection: config.variant_selection.build(config.headcount),
            targets: ExecutionTargets::from_ast(&original),
            test_time_limit: config.test_time_limit(),
            parallelism: config.parallelism,
            skip_duplicate_sources: config.skip_duplicate_sources,
        };

        let stopwatch = StopWatch::start(config.time_limit());
        let mut metrics = RunMetrics::new();
        let mut store = VariantStore::new(original, strategies).await;
        let summary = self
            .logger
            .log(OrdinalNumber(0), store.current_variants());
        metrics.record_generation(&summary);

        let mut generation = OrdinalNumber(0);
        let reason = match self.check_termination(&store, &stopwatch, generation) {
            Some(reason) => reason,
            None => loop {
                generation = store.generation_number();
                let found_before = store.found_solutions_count();
                info!(%generation, elapsed_ms = stopwatch.elapsed().as_millis() as u64, "generation start");

                let mutants = mutation.exec(store.current_variants(), &mut rng);
                let variants = store.create_variants(mutants).await;
                store.add_generated_variants(variants);

                let children = crossover.exec(store.current_variants(), &mut rng);
                let variants = store.create_variants(children).await;
                store.add_generated_variants(variants);

                let produced: Vec<Arc<Variant>> = store
                    .generated_variants()
                    .iter()
                    .chain(&store.found_solutions()[found_before..])
                    .cloned()
                    .collect();
                let summary = self.logger.log(generation, &produced);
                metrics.record_generation(&summary);
                info!(
                    %generation,
                    found = store.found_solutions_count(),
                    elapsed_ms = stopwatch.elapsed().as_millis() as u64,
                    "generation done"
                );

                if let Some(reason) = self.check_termination(&store, &stopwatch, generation) {
                    break reason;
                }
                store.proceed_next_generation();
            },
        };

        let solutions = store
            .found_solutions_up_to(config.required_solutions)
            .to_vec();
        metrics.absorb(store.stats(), store.cache_stats(), solutions.len());
        info!(
            %reason,
            solutions = solutions.len(),
            generations = %generation,
            evaluated = metrics.variants_evaluated,
            "repair finished"
        );

        for output in &self.outputs {
            if let Err(e) = output.write(store.original(), &solutions) {
                error!(error = %e, solutions = solutions.len(), "patch output failed");
            }
        }

        Ok(RepairOutcome {
            solutions,
            reason,
            generations: generation,
            elapsed: stopwatch.elapsed(),
            metrics,
        })
    }

    /// First true condition wins: solutions, then time, then generation count.
    fn check_termination(
        &self,
        store: &VariantStore,
        stopwatch: &StopWatch,
        generation: OrdinalNumber,
    ) -> Option<TerminationReason> {
        if store.found_solutions_count() >= self.config.required_solutions {
            return Some(TerminationReason::EnoughSolutions);
        }
        if stopwatch.is_timeout() {
            return Some(TerminationReason::TimeLimit);
        }
        if generation.get() >= self.config.max_generation {
            return Some(TerminationReason::MaxGeneration);
        }
        None
    }
}
