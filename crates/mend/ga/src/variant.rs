use mend_ast::{AstSet, ContentHash};
use mend_exec::TestResults;
use mend_fl::Suspiciousness;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::fitness::Fitness;
use crate::gene::{Base, Gene};

/// Generation number. Generation 0 holds only the original program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrdinalNumber(pub u32);

impl OrdinalNumber {
    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> OrdinalNumber {
        OrdinalNumber(self.0 + 1)
    }
}

impl fmt::Display for OrdinalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a variant came to be. Used for lineage and patch output only.
#[derive(Clone, Debug)]
pub enum HistoricalElement {
    Original,
    Mutation {
        parent: Arc<Variant>,
        base: Base,
    },
    Crossover {
        parent_a: Arc<Variant>,
        parent_b: Arc<Variant>,
        cut_point: usize,
    },
}

impl HistoricalElement {
    pub fn parents(&self) -> Vec<&Arc<Variant>> {
        match self {
            Self::Original => Vec::new(),
            Self::Mutation { parent, .. } => vec![parent],
            Self::Crossover {
                parent_a, parent_b, ..
            } => vec![parent_a, parent_b],
        }
    }
}

impl fmt::Display for HistoricalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => f.write_str("original"),
            Self::Mutation { parent, base } => write!(f, "mutation of v{}: {}", parent.id, base),
            Self::Crossover {
                parent_a,
                parent_b,
                cut_point,
            } => write!(
                f,
                "crossover of v{} and v{} at {}",
                parent_a.id, parent_b.id, cut_point
            ),
        }
    }
}

/// A gene waiting to be evaluated, with its provenance.
#[derive(Clone, Debug)]
pub struct VariantRequest {
    pub gene: Gene,
    pub history: HistoricalElement,
}

impl VariantRequest {
    pub fn new(gene: Gene, history: HistoricalElement) -> Self {
        Self { gene, history }
    }
}

/// A fully evaluated candidate program. Immutable once built.
#[derive(Clone, Debug)]
pub struct Variant {
    pub id: u64,
    pub generation: OrdinalNumber,
    pub gene: Gene,
    pub source: Arc<AstSet>,
    pub fingerprint: ContentHash,
    pub test_results: TestResults,
    pub fitness: Fitness,
    pub suspiciousness: Vec<Suspiciousness>,
    pub history: HistoricalElement,
}

impl Variant {
    /// Every target test passes.
    pub fn is_completed(&self) -> bool {
        !self.test_results.build_failed && self.fitness.is_max()
    }

    pub fn is_build_success(&self) -> bool {
        !self.test_results.build_failed
    }

    /// Descriptions of this variant and its ancestors, newest first,
    /// following the first parent of each step.
    pub fn lineage(&self) -> Vec<String> {
        let mut out = vec![format!("v{} (gen {}): {}", self.id, self.generation, self.history)];
        let mut cursor = self.history.parents().first().map(|p| Arc::clone(p));
        while let Some(v) = cursor {
            out.push(format!("v{} (gen {}): {}", v.id, v.generation, v.history));
            cursor = v.history.parents().first().map(|p| Arc::clone(p));
        }
        out
    }
}
