use mend_fl::Suspiciousness;
use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::gene::{Base, Operation};
use crate::roulette::Roulette;
use crate::selection::CandidateSelection;
use crate::variant::{HistoricalElement, Variant, VariantRequest};

/// Produces edited copies of surviving variants.
pub trait Mutation: Send + Sync {
    fn exec(&self, current: &[Arc<Variant>], rng: &mut dyn RngCore) -> Vec<VariantRequest>;
}

/// Each draw picks a parent uniformly, a target by suspiciousness, an
/// operation uniformly, and a donor from the reuse pool when one is needed.
///
/// A draw is skipped when the parent has no scored statement or no donor is
/// available.
pub struct RandomMutation {
    count: usize,
    selection: Arc<dyn CandidateSelection>,
}

impl RandomMutation {
    pub fn new(count: usize, selection: Arc<dyn CandidateSelection>) -> Self {
        Self { count, selection }
    }

    /// Edit targets of `variant`, weighted by suspiciousness.
    pub fn targets(variant: &Variant) -> Roulette<Suspiciousness> {
        Roulette::new(variant.suspiciousness.clone(), |s: &Suspiciousness| s.value)
    }

    fn draw(
        &self,
        parent: &Arc<Variant>,
        targets: &Roulette<Suspiciousness>,
        rng: &mut dyn RngCore,
    ) -> Option<VariantRequest> {
        let target = targets.exec(rng)?.location.clone();
        let operation = match rng.gen_range(0..3) {
            0 => Operation::Delete,
            kind => {
                let fqn = &parent.source.unit(&target.path)?.fqn;
                let donor = self.selection.exec(fqn, rng)?;
                if kind == 1 {
                    Operation::InsertBefore { donor }
                } else {
                    Operation::Replace { donor }
                }
            }
        };
        let base = Base::new(target, operation);
        trace!(parent = parent.id, %base, "mutation");
        Some(VariantRequest::new(
            parent.gene.append(base.clone()),
            HistoricalElement::Mutation {
                parent: Arc::clone(parent),
                base,
            },
        ))
    }
}

impl Mutation for RandomMutation {
    fn exec(&self, current: &[Arc<Variant>], rng: &mut dyn RngCore) -> Vec<VariantRequest> {
        if current.is_empty() {
            return Vec::new();
        }
        let mut roulettes: HashMap<u64, Roulette<Suspiciousness>> = HashMap::new();
        let mut requests = Vec::with_capacity(self.count);
        let mut skipped = 0usize;
        for _ in 0..self.count {
            let parent = &current[rng.gen_range(0..current.len())];
            let targets = roulettes
                .entry(parent.id)
                .or_insert_with(|| Self::targets(parent));
            match self.draw(parent, targets, rng) {
                Some(request) => requests.push(request),
                None => skipped += 1,
            }
        }
        debug!(requested = self.count, produced = requests.len(), skipped, "mutation");
        requests
    }
}
