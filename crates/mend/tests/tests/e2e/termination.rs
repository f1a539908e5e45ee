//! E2E: each termination condition ends the run at the expected generation.

use crate::common;
use mend_ast::JavaAstConstruction;
use mend_build::SimulatedCompiler;
use mend_engine::{Configuration, RepairEngine, TerminationReason};
use mend_exec::SimulatedTestExecutor;
use mend_ga::OrdinalNumber;
use std::sync::Arc;

fn engine(config: Configuration) -> RepairEngine {
    RepairEngine::new(
        config,
        Arc::new(JavaAstConstruction::new()),
        Arc::new(SimulatedCompiler::new()),
        Arc::new(SimulatedTestExecutor::new(common::oracle)),
    )
}

fn config() -> Configuration {
    Configuration {
        headcount: 4,
        mutation_generating_count: 3,
        crossover_generating_count: 2,
        time_limit_secs: 600,
        parallelism: 2,
        ..Default::default()
    }
}

#[tokio::test]
async fn zero_required_solutions_stop_immediately() {
    let outcome = engine(Configuration {
        required_solutions: 0,
        max_generation: 0,
        ..config()
    })
    .run_on(common::original())
    .await
    .unwrap();
    assert_eq!(outcome.reason, TerminationReason::EnoughSolutions);
    assert_eq!(outcome.generations, OrdinalNumber(0));
    assert_eq!(outcome.metrics.variants_evaluated, 1);
    assert!(outcome.solutions.is_empty());
}

#[tokio::test]
async fn unreachable_solution_count_runs_to_max_generation() {
    let outcome = engine(Configuration {
        required_solutions: 1000,
        max_generation: 2,
        ..config()
    })
    .run_on(common::original())
    .await
    .unwrap();
    assert_eq!(outcome.reason, TerminationReason::MaxGeneration);
    assert_eq!(outcome.generations, OrdinalNumber(2));
    assert_eq!(outcome.metrics.best_fitness_history.len(), 3);
    assert!((outcome.metrics.best_fitness_history[0] - 0.5).abs() < 1e-12);
}

#[tokio::test]
async fn exhausted_time_limit_wins_over_generation_count() {
    let outcome = engine(Configuration {
        time_limit_secs: 0,
        max_generation: 0,
        ..config()
    })
    .run_on(common::original())
    .await
    .unwrap();
    assert_eq!(outcome.reason, TerminationReason::TimeLimit);
    assert_eq!(outcome.generations, OrdinalNumber(0));
}
