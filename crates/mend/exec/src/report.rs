//! JSON report written by the external test runner.
//!
//! ```json
//! {"tests": [{"name": "example.CalcTest.test01", "passed": false,
//!             "error": "expected:<1> but was:<2>", "duration_ms": 3,
//!             "coverage": {"example.Calc": {"covered": [12, 13], "not_covered": [15]}}}]}
//! ```

use mend_ast::{FullyQualifiedName, NodeId};
use mend_build::BuildResults;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ExecError;
use crate::types::{Coverage, CoverageStatus, TestResult};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CoverageReport {
    pub tests: Vec<TestReport>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestReport {
    pub name: String,
    pub passed: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub coverage: BTreeMap<String, UnitCoverageReport>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UnitCoverageReport {
    #[serde(default)]
    pub covered: Vec<u32>,
    #[serde(default)]
    pub not_covered: Vec<u32>,
}

impl CoverageReport {
    pub fn parse(test: &str, json: &str) -> Result<Self, ExecError> {
        serde_json::from_str(json).map_err(|e| ExecError::Report {
            test: test.to_string(),
            message: e.to_string(),
        })
    }

    /// Translate line coverage into statement coverage using the line maps of
    /// the built sources. Lines that start no statement are dropped, as are
    /// units that were not part of the build.
    pub fn into_results(self, build: &BuildResults) -> Vec<TestResult> {
        self.tests
            .into_iter()
            .map(|t| {
                let mut coverages = Vec::new();
                for (fqn, lines) in &t.coverage {
                    let fqn = FullyQualifiedName::target(fqn.as_str());
                    let Some(source) = build.source(&fqn) else {
                        continue;
                    };
                    let mut statuses: BTreeMap<NodeId, CoverageStatus> = BTreeMap::new();
                    for line in &lines.not_covered {
                        if let Some(node) = source.line_map.node_at(*line) {
                            statuses.insert(node, CoverageStatus::NotCovered);
                        }
                    }
                    for line in &lines.covered {
                        if let Some(node) = source.line_map.node_at(*line) {
                            statuses.insert(node, CoverageStatus::Covered);
                        }
                    }
                    coverages.push(Coverage {
                        fqn,
                        path: source.path.clone(),
                        statuses,
                    });
                }
                TestResult {
                    name: FullyQualifiedName::test(t.name),
                    passed: t.passed,
                    duration_ms: t.duration_ms,
                    error: t.error,
                    coverages,
                }
            })
            .collect()
    }
}
