//! E2E: a finished run writes its solutions as a source tree.

use crate::common::{self, A_PATH, B_PATH};
use mend_ast::JavaAstConstruction;
use mend_build::SimulatedCompiler;
use mend_engine::{Configuration, LogPatchOutput, RepairEngine, SourceTreePatchOutput};
use mend_exec::SimulatedTestExecutor;
use mend_ga::Gene;
use std::fs;
use std::sync::Arc;

#[tokio::test]
async fn solutions_are_written_under_the_output_directory() {
    let out = tempfile::tempdir().unwrap();
    let config = Configuration {
        headcount: 10,
        max_generation: 10,
        mutation_generating_count: 10,
        random_seed: 7,
        time_limit_secs: 600,
        parallelism: 4,
        ..Default::default()
    };
    let engine = RepairEngine::new(
        config,
        Arc::new(JavaAstConstruction::new()),
        Arc::new(SimulatedCompiler::new()),
        Arc::new(SimulatedTestExecutor::new(common::oracle)),
    )
    .with_output(Arc::new(LogPatchOutput))
    .with_output(Arc::new(SourceTreePatchOutput::new(out.path())));

    let outcome = engine.run_on(common::original()).await.unwrap();
    assert!(outcome.is_repaired());

    let solution = &outcome.solutions[0];
    let dir = out.path().join(format!("variant-{}", solution.id));
    let written = fs::read_to_string(dir.join(A_PATH)).unwrap();
    assert_eq!(written.matches("n++").count(), 1);
    assert!(!dir.join(B_PATH).exists());

    let gene: Gene = serde_json::from_slice(&fs::read(dir.join("gene.json")).unwrap()).unwrap();
    assert_eq!(gene, solution.gene);
    let lineage = fs::read_to_string(dir.join("lineage.txt")).unwrap();
    assert_eq!(lineage.lines().count(), solution.lineage().len());
}
