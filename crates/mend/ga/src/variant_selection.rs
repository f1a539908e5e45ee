use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::variant::Variant;

/// Computes the next survivor set.
pub trait VariantSelection: Send + Sync {
    /// At most `headcount` variants.
    fn exec(&self, current: &[Arc<Variant>], generated: &[Arc<Variant>]) -> Vec<Arc<Variant>>;
}

fn rank(pool: Vec<Arc<Variant>>, headcount: usize) -> Vec<Arc<Variant>> {
    let mut pool = pool;
    // Stable: equal fitness keeps first-seen order.
    pool.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    pool.truncate(headcount);
    pool
}

/// Current and generated compete together; the fittest `headcount` survive.
#[derive(Clone, Copy, Debug)]
pub struct ElitistSelection {
    headcount: usize,
}

impl ElitistSelection {
    pub fn new(headcount: usize) -> Self {
        Self { headcount }
    }
}

impl VariantSelection for ElitistSelection {
    fn exec(&self, current: &[Arc<Variant>], generated: &[Arc<Variant>]) -> Vec<Arc<Variant>> {
        let pool = current.iter().chain(generated.iter()).cloned().collect();
        rank(pool, self.headcount)
    }
}

/// Only the newly generated pool competes. The current set carries over
/// unchanged when nothing was generated.
#[derive(Clone, Copy, Debug)]
pub struct GenerationalSelection {
    headcount: usize,
}

impl GenerationalSelection {
    pub fn new(headcount: usize) -> Self {
        Self { headcount }
    }
}

impl VariantSelection for GenerationalSelection {
    fn exec(&self, current: &[Arc<Variant>], generated: &[Arc<Variant>]) -> Vec<Arc<Variant>> {
        let pool = if generated.is_empty() { current } else { generated };
        rank(pool.to_vec(), self.headcount)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantSelectionKind {
    #[default]
    Elitist,
    Generational,
}

impl VariantSelectionKind {
    pub fn build(self, headcount: usize) -> Arc<dyn VariantSelection> {
        match self {
            Self::Elitist => Arc::new(ElitistSelection::new(headcount)),
            Self::Generational => Arc::new(GenerationalSelection::new(headcount)),
        }
    }
}

impl fmt::Display for VariantSelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elitist => write!(f, "elitist"),
            Self::Generational => write!(f, "generational"),
        }
    }
}
