use mend_ast::{AstSet, FullyQualifiedName, NodeId, SourcePath, StatementLocation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Coverage status of one statement during one test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageStatus {
    Covered,
    NotCovered,
    /// Not executable, or no line information.
    Empty,
}

/// Statement coverage of one source unit during one test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    pub fqn: FullyQualifiedName,
    pub path: SourcePath,
    pub statuses: BTreeMap<NodeId, CoverageStatus>,
}

impl Coverage {
    pub fn new(fqn: FullyQualifiedName, path: SourcePath) -> Self {
        Self {
            fqn,
            path,
            statuses: BTreeMap::new(),
        }
    }

    pub fn with(mut self, node: NodeId, status: CoverageStatus) -> Self {
        self.statuses.insert(node, status);
        self
    }

    pub fn status(&self, node: NodeId) -> CoverageStatus {
        self.statuses
            .get(&node)
            .copied()
            .unwrap_or(CoverageStatus::Empty)
    }

    /// Locations executed at least once.
    pub fn covered(&self) -> impl Iterator<Item = StatementLocation> + '_ {
        self.statuses
            .iter()
            .filter(|(_, s)| **s == CoverageStatus::Covered)
            .map(|(node, _)| StatementLocation::new(self.path.clone(), *node))
    }
}

/// Outcome of one test method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: FullyQualifiedName,
    pub passed: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub coverages: Vec<Coverage>,
}

impl TestResult {
    pub fn passed(name: FullyQualifiedName) -> Self {
        Self {
            name,
            passed: true,
            duration_ms: 0,
            error: None,
            coverages: Vec::new(),
        }
    }

    pub fn failed(name: FullyQualifiedName, error: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            duration_ms: 0,
            error: Some(error.into()),
            coverages: Vec::new(),
        }
    }

    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverages.push(coverage);
        self
    }

    pub fn covers(&self, location: &StatementLocation) -> bool {
        self.coverages
            .iter()
            .any(|c| c.path == location.path && c.status(location.node) == CoverageStatus::Covered)
    }
}

/// Results of running the whole suite against one program version.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    pub results: Vec<TestResult>,
    /// The program did not compile; no test ran.
    pub build_failed: bool,
}

impl TestResults {
    pub fn new(results: Vec<TestResult>) -> Self {
        Self {
            results,
            build_failed: false,
        }
    }

    pub fn build_failure() -> Self {
        Self {
            results: Vec::new(),
            build_failed: true,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.total() - self.passed_count()
    }

    /// Fraction of passing tests; 0 when nothing ran.
    pub fn success_rate(&self) -> f64 {
        if self.build_failed || self.results.is_empty() {
            return 0.0;
        }
        self.passed_count() as f64 / self.total() as f64
    }

    pub fn failed_tests(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

/// What to run: the product classes to instrument and the test classes to execute.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTargets {
    pub targets: Vec<FullyQualifiedName>,
    pub tests: Vec<FullyQualifiedName>,
}

impl ExecutionTargets {
    pub fn from_ast(ast: &AstSet) -> Self {
        Self {
            targets: ast.product_units().map(|u| u.fqn.clone()).collect(),
            tests: ast.test_units().map(|u| u.fqn.clone()).collect(),
        }
    }
}
