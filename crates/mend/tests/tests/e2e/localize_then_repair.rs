//! E2E: fault localization points at the extra increment, removing it
//! repairs the program, and the search finds such a repair on its own.

use crate::common::{self, A_PATH};
use mend_ast::{JavaAstConstruction, SourcePath};
use mend_build::SimulatedCompiler;
use mend_engine::{Configuration, RepairEngine, TerminationReason};
use mend_exec::SimulatedTestExecutor;
use mend_ga::{Base, Fitness, Gene, HistoricalElement, Operation, OrdinalNumber, VariantRequest, VariantStore};
use std::sync::Arc;

fn a_locations(ast: &mend_ast::AstSet) -> Vec<mend_ast::StatementLocation> {
    let path = SourcePath::product(A_PATH);
    ast.locations().into_iter().filter(|l| l.path == path).collect()
}

#[tokio::test]
async fn statement_covered_only_by_failing_test_ranks_first() {
    let original = common::original();
    let strategies = common::strategies(&original, Arc::new(SimulatedCompiler::new()));
    let store = VariantStore::new(original, strategies).await;

    let initial = store.initial_variant();
    assert!((initial.fitness.value() - 0.5).abs() < 1e-12);
    assert!(!initial.is_completed());

    // Only statements of A are covered, so B has no entries.
    let locations = a_locations(store.original());
    assert_eq!(initial.suspiciousness.len(), locations.len());

    let top = initial
        .suspiciousness
        .iter()
        .max_by(|a, b| a.value.total_cmp(&b.value))
        .unwrap();
    assert_eq!(top.location, locations[1]);
    assert!((top.value - 1.0).abs() < 1e-12);
    for s in initial.suspiciousness.iter().filter(|s| s.location != locations[1]) {
        assert!((s.value - 1.0 / 2f64.sqrt()).abs() < 1e-12);
    }
}

#[tokio::test]
async fn deleting_the_extra_increment_is_a_solution() {
    let original = common::original();
    let strategies = common::strategies(&original, Arc::new(SimulatedCompiler::new()));
    let mut store = VariantStore::new(original, strategies).await;

    let initial = Arc::clone(store.initial_variant());
    let target = a_locations(store.original())[1].clone();
    let base = Base::new(target, Operation::Delete);
    let request = VariantRequest::new(
        Gene::empty().append(base.clone()),
        HistoricalElement::Mutation {
            parent: Arc::clone(&initial),
            base,
        },
    );

    let variant = store.create_variant(request).await.unwrap();
    assert!(variant.is_build_success());
    assert!(variant.fitness.is_max());
    assert!(variant.is_completed());
    assert!(variant.generation > initial.generation);
    assert_eq!(variant.lineage().len(), 2);

    store.add_generated_variant(variant);
    assert_eq!(store.found_solutions_count(), 1);
    assert!(store.generated_variants().is_empty());
}

#[tokio::test]
async fn search_repairs_the_program() {
    let config = Configuration {
        headcount: 10,
        max_generation: 10,
        required_solutions: 1,
        mutation_generating_count: 10,
        crossover_generating_count: 4,
        random_seed: 42,
        time_limit_secs: 600,
        parallelism: 4,
        ..Default::default()
    };
    let engine = RepairEngine::new(
        config,
        Arc::new(JavaAstConstruction::new()),
        Arc::new(SimulatedCompiler::new()),
        Arc::new(SimulatedTestExecutor::new(common::oracle)),
    );

    let outcome = engine.run_on(common::original()).await.unwrap();
    assert_eq!(outcome.reason, TerminationReason::EnoughSolutions);
    assert!(outcome.is_repaired());
    assert_eq!(outcome.solutions.len(), 1);
    let last = *outcome.metrics.best_fitness_history.last().unwrap();
    assert_eq!(Fitness::new(last), Fitness::MAX);
    assert!((outcome.metrics.best_fitness() - 1.0).abs() < 1e-12);

    let solution = &outcome.solutions[0];
    assert!(solution.is_completed());
    assert!(!solution.gene.is_empty());
    assert!(solution.generation >= OrdinalNumber(1));
    let text: String = solution
        .source
        .source_files()
        .into_iter()
        .filter(|f| f.path == SourcePath::product(A_PATH))
        .map(|f| f.text)
        .collect();
    assert_eq!(text.matches("n++").count(), 1);
}
