use mend_ast::{AstSet, StatementLocation};
use mend_exec::TestResults;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Fault likelihood of one statement, in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suspiciousness {
    pub location: StatementLocation,
    pub value: f64,
}

impl Suspiciousness {
    pub fn new(location: StatementLocation, value: f64) -> Self {
        Self { location, value }
    }
}

/// Spectrum counts for one statement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCounts {
    pub failed_covered: usize,
    pub passed_covered: usize,
    pub total_failed: usize,
    pub total_passed: usize,
}

impl CoverageCounts {
    /// Count, for every statement executed by at least one test, how many
    /// passing and failing tests executed it. Statements that are not part of
    /// `ast` are ignored.
    pub fn collect(ast: &AstSet, results: &TestResults) -> BTreeMap<StatementLocation, CoverageCounts> {
        let total_failed = results.failed_count();
        let total_passed = results.passed_count();
        let known: HashSet<StatementLocation> = ast
            .units()
            .iter()
            .flat_map(|u| {
                u.statements()
                    .into_iter()
                    .map(move |s| StatementLocation::new(u.path.clone(), s.id))
            })
            .collect();
        let mut counts: BTreeMap<StatementLocation, CoverageCounts> = BTreeMap::new();
        for result in &results.results {
            for coverage in &result.coverages {
                for location in coverage.covered() {
                    if !known.contains(&location) {
                        continue;
                    }
                    let entry = counts.entry(location).or_insert(CoverageCounts {
                        total_failed,
                        total_passed,
                        ..Default::default()
                    });
                    if result.passed {
                        entry.passed_covered += 1;
                    } else {
                        entry.failed_covered += 1;
                    }
                }
            }
        }
        counts
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown fault localization formula: {0}")]
pub struct UnknownFormula(pub String);
