use mend_ga::{OrdinalNumber, Variant};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::metrics::RunMetrics;

/// Wall-clock budget of a run, started at construction.
#[derive(Clone, Copy, Debug)]
pub struct StopWatch {
    started: Instant,
    limit: Duration,
}

impl StopWatch {
    pub fn start(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_timeout(&self) -> bool {
        self.elapsed() >= self.limit
    }
}

/// Why the search loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    EnoughSolutions,
    TimeLimit,
    MaxGeneration,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnoughSolutions => write!(f, "enough solutions found"),
            Self::TimeLimit => write!(f, "time limit reached"),
            Self::MaxGeneration => write!(f, "maximum generation reached"),
        }
    }
}

/// Result of one repair run.
#[derive(Clone, Debug)]
pub struct RepairOutcome {
    /// Found solutions in discovery order, at most the required count.
    pub solutions: Vec<Arc<Variant>>,
    pub reason: TerminationReason,
    /// Last generation produced.
    pub generations: OrdinalNumber,
    pub elapsed: Duration,
    pub metrics: RunMetrics,
}

impl RepairOutcome {
    pub fn is_repaired(&self) -> bool {
        !self.solutions.is_empty()
    }
}
