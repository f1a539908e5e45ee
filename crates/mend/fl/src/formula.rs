use mend_ast::AstSet;
use mend_exec::TestResults;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::trace;

use crate::types::{CoverageCounts, Suspiciousness, UnknownFormula};

/// Scores statements of a program version from its own test results.
pub trait FaultLocalization: Send + Sync {
    /// One entry per statement covered by at least one test.
    /// Never-covered statements are absent rather than scored zero.
    fn exec(&self, ast: &AstSet, results: &TestResults) -> Vec<Suspiciousness>;
}

/// A spectrum formula over [`CoverageCounts`].
pub trait Formula: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, counts: &CoverageCounts) -> f64;
}

impl<F: Formula> FaultLocalization for F {
    fn exec(&self, ast: &AstSet, results: &TestResults) -> Vec<Suspiciousness> {
        CoverageCounts::collect(ast, results)
            .into_iter()
            .map(|(location, counts)| {
                let value = self.score(&counts);
                trace!(formula = self.name(), %location, value, "suspiciousness");
                Suspiciousness::new(location, value)
            })
            .collect()
    }
}

/// `fc / sqrt(tf * (fc + pc))`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ochiai;

impl Formula for Ochiai {
    fn name(&self) -> &'static str {
        "ochiai"
    }

    fn score(&self, c: &CoverageCounts) -> f64 {
        let denominator = (c.total_failed as f64 * (c.failed_covered + c.passed_covered) as f64).sqrt();
        if denominator == 0.0 {
            return 0.0;
        }
        c.failed_covered as f64 / denominator
    }
}

/// `(fc / tf) / (fc / tf + pc / tp)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tarantula;

impl Formula for Tarantula {
    fn name(&self) -> &'static str {
        "tarantula"
    }

    fn score(&self, c: &CoverageCounts) -> f64 {
        let ratio = |n: usize, d: usize| if d == 0 { 0.0 } else { n as f64 / d as f64 };
        let failed = ratio(c.failed_covered, c.total_failed);
        let passed = ratio(c.passed_covered, c.total_passed);
        if failed + passed == 0.0 {
            return 0.0;
        }
        failed / (failed + passed)
    }
}

/// `fc / (tf + pc)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Jaccard;

impl Formula for Jaccard {
    fn name(&self) -> &'static str {
        "jaccard"
    }

    fn score(&self, c: &CoverageCounts) -> f64 {
        let denominator = c.total_failed + c.passed_covered;
        if denominator == 0 {
            return 0.0;
        }
        c.failed_covered as f64 / denominator as f64
    }
}

/// Configurable choice of formula.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultLocalizationKind {
    #[default]
    Ochiai,
    Tarantula,
    Jaccard,
}

impl FaultLocalizationKind {
    pub fn build(self) -> Arc<dyn FaultLocalization> {
        match self {
            Self::Ochiai => Arc::new(Ochiai),
            Self::Tarantula => Arc::new(Tarantula),
            Self::Jaccard => Arc::new(Jaccard),
        }
    }
}

impl fmt::Display for FaultLocalizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ochiai => write!(f, "ochiai"),
            Self::Tarantula => write!(f, "tarantula"),
            Self::Jaccard => write!(f, "jaccard"),
        }
    }
}

impl FromStr for FaultLocalizationKind {
    type Err = UnknownFormula;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ochiai" => Ok(Self::Ochiai),
            "tarantula" => Ok(Self::Tarantula),
            "jaccard" => Ok(Self::Jaccard),
            other => Err(UnknownFormula(other.to_string())),
        }
    }
}
