//! Shared fixture: `A.inc` increments twice where one increment is expected.
//! `B` never changes, so its compiled unit can be reused across variants.

#![allow(dead_code)]

use mend_ast::{AstSet, FullyQualifiedName, JavaAstConstruction, SourcePath};
use mend_build::{ArtifactCache, ProjectBuilder, SimulatedCompiler};
use mend_exec::{Coverage, CoverageStatus, ExecutionTargets, TestResult};
use mend_fl::Ochiai;
use mend_ga::{DefaultCodeValidation, DefaultSourceCodeGeneration, ElitistSelection, Strategies};
use std::sync::Arc;
use std::time::Duration;

pub const A_PATH: &str = "src/main/java/A.java";
pub const B_PATH: &str = "src/main/java/B.java";

pub const A_SOURCE: &str = "class A {\n    int inc(int n) {\n        n++;\n        n++;\n        return n;\n    }\n}\n";
pub const B_SOURCE: &str = "class B {\n    int twice(int n) {\n        return n + n;\n    }\n}\n";

pub fn original() -> AstSet {
    JavaAstConstruction::new()
        .parse_sources(&[
            (SourcePath::product(A_PATH), A_SOURCE.into()),
            (SourcePath::product(B_PATH), B_SOURCE.into()),
        ])
        .unwrap()
}

/// `ATest.inc` passes once `A` increments exactly once and covers every
/// statement of `A`. `ATest.zero` always passes and covers every statement of
/// `A` except the second one.
pub fn oracle(ast: &AstSet) -> Vec<TestResult> {
    let path = SourcePath::product(A_PATH);
    let text = ast
        .source_files()
        .into_iter()
        .find(|f| f.path == path)
        .map(|f| f.text)
        .unwrap_or_default();
    let locations: Vec<_> = ast
        .locations()
        .into_iter()
        .filter(|l| l.path == path)
        .collect();

    let coverage = || Coverage::new(FullyQualifiedName::target("A"), path.clone());
    let all = locations
        .iter()
        .fold(coverage(), |c, l| c.with(l.node, CoverageStatus::Covered));
    let partial = locations
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != 1)
        .fold(coverage(), |c, (_, l)| c.with(l.node, CoverageStatus::Covered));

    let inc = FullyQualifiedName::test("ATest.inc");
    let inc = if text.matches("n++").count() == 1 {
        TestResult::passed(inc)
    } else {
        TestResult::failed(inc, "expected 1 but was 2")
    };
    vec![
        inc.with_coverage(all),
        TestResult::passed(FullyQualifiedName::test("ATest.zero")).with_coverage(partial),
    ]
}

pub fn strategies(original: &AstSet, compiler: Arc<SimulatedCompiler>) -> Strategies {
    Strategies {
        generation: Arc::new(DefaultSourceCodeGeneration),
        builder: ProjectBuilder::new(compiler, Arc::new(ArtifactCache::new())),
        executor: Arc::new(mend_exec::SimulatedTestExecutor::new(oracle)),
        fault_localization: Arc::new(Ochiai),
        validation: Arc::new(DefaultCodeValidation),
        selection: Arc::new(ElitistSelection::new(10)),
        targets: ExecutionTargets::from_ast(original),
        test_time_limit: Duration::from_secs(5),
        parallelism: 4,
        skip_duplicate_sources: true,
    }
}
