//! E2E: when only the faulty statement is executed by the failing test,
//! mutation targets nothing else.

use mend_ast::{reuse_candidates, AstSet, FullyQualifiedName, JavaAstConstruction, SourcePath};
use mend_build::{ArtifactCache, ProjectBuilder, SimulatedCompiler};
use mend_exec::{Coverage, CoverageStatus, ExecutionTargets, SimulatedTestExecutor, TestResult};
use mend_fl::Ochiai;
use mend_ga::{
    DefaultCodeValidation, DefaultSourceCodeGeneration, ElitistSelection, Mutation,
    RandomMutation, ReuseScope, RouletteStatementSelection, Strategies, VariantStore,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

const C_PATH: &str = "src/main/java/C.java";
const C_SOURCE: &str = "class C {\n    int ok(int n) {\n        n++;\n        return n;\n    }\n    void bad() {\n        broken();\n    }\n}\n";

fn original() -> AstSet {
    JavaAstConstruction::new()
        .parse_sources(&[(SourcePath::product(C_PATH), C_SOURCE.into())])
        .unwrap()
}

/// `CTest.bad` fails and executes only `bad`; `CTest.ok` passes and executes only `ok`.
fn oracle(ast: &AstSet) -> Vec<TestResult> {
    let path = SourcePath::product(C_PATH);
    let locations: Vec<_> = ast
        .locations()
        .into_iter()
        .filter(|l| l.path == path)
        .collect();
    let coverage = |picked: &[usize]| {
        picked.iter().filter_map(|i| locations.get(*i)).fold(
            Coverage::new(FullyQualifiedName::target("C"), path.clone()),
            |c, l| c.with(l.node, CoverageStatus::Covered),
        )
    };
    vec![
        TestResult::failed(FullyQualifiedName::test("CTest.bad"), "boom").with_coverage(coverage(&[2])),
        TestResult::passed(FullyQualifiedName::test("CTest.ok")).with_coverage(coverage(&[0, 1])),
    ]
}

async fn store() -> VariantStore {
    let original = original();
    let strategies = Strategies {
        generation: Arc::new(DefaultSourceCodeGeneration),
        builder: ProjectBuilder::new(Arc::new(SimulatedCompiler::new()), Arc::new(ArtifactCache::new())),
        executor: Arc::new(SimulatedTestExecutor::new(oracle)),
        fault_localization: Arc::new(Ochiai),
        validation: Arc::new(DefaultCodeValidation),
        selection: Arc::new(ElitistSelection::new(4)),
        targets: ExecutionTargets::from_ast(&original),
        test_time_limit: Duration::from_secs(5),
        parallelism: 2,
        skip_duplicate_sources: true,
    };
    VariantStore::new(original, strategies).await
}

#[tokio::test]
async fn only_the_faulty_statement_has_weight() {
    let store = store().await;
    let faulty = store.original().locations()[2].clone();
    let initial = store.initial_variant();

    let targets = RandomMutation::targets(initial);
    assert_eq!(targets.len(), 3);
    let weighted: Vec<_> = targets.items().iter().filter(|s| s.value > 0.0).collect();
    assert_eq!(weighted.len(), 1);
    assert_eq!(weighted[0].location, faulty);
    assert!((targets.total_weight() - 1.0).abs() < 1e-12);

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        assert_eq!(targets.exec(&mut rng).unwrap().location, faulty);
    }
}

#[tokio::test]
async fn every_mutant_edits_the_faulty_statement() {
    let store = store().await;
    let faulty = store.original().locations()[2].clone();
    let selection = Arc::new(RouletteStatementSelection::new(
        reuse_candidates(store.original()),
        ReuseScope::Project,
    ));
    let mutation = RandomMutation::new(50, selection);

    let mut rng = StdRng::seed_from_u64(3);
    let requests = mutation.exec(store.current_variants(), &mut rng);
    assert_eq!(requests.len(), 50);
    for request in &requests {
        assert_eq!(request.gene.len(), 1);
        assert_eq!(request.gene.bases()[0].target, faulty);
    }
}
