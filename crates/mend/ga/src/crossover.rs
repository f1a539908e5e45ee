use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use crate::gene::Gene;
use crate::roulette::Roulette;
use crate::variant::{HistoricalElement, Variant, VariantRequest};

/// Single-point recombination of two genes.
///
/// The cut is clamped to each parent's length independently. The first child
/// is `a`'s prefix followed by `b`'s suffix, the second the reverse.
pub fn cross(a: &Gene, b: &Gene, cut: usize) -> (Gene, Gene) {
    let ca = cut.min(a.len());
    let cb = cut.min(b.len());
    (
        Gene::concat(&a.bases()[..ca], &b.bases()[cb..]),
        Gene::concat(&b.bases()[..cb], &a.bases()[ca..]),
    )
}

/// Chooses two distinct parents from the survivors.
pub trait ParentPairing: Send + Sync {
    /// Indices into `current`, or `None` when fewer than two variants exist.
    fn pair(&self, current: &[Arc<Variant>], rng: &mut dyn RngCore) -> Option<(usize, usize)>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RandomPairing;

impl ParentPairing for RandomPairing {
    fn pair(&self, current: &[Arc<Variant>], rng: &mut dyn RngCore) -> Option<(usize, usize)> {
        let n = current.len();
        if n < 2 {
            return None;
        }
        let first = rng.gen_range(0..n);
        let mut second = rng.gen_range(0..n - 1);
        if second >= first {
            second += 1;
        }
        Some((first, second))
    }
}

/// Both parents drawn by roulette over fitness; the second excludes the first.
#[derive(Clone, Copy, Debug, Default)]
pub struct FitnessProportionalPairing;

impl ParentPairing for FitnessProportionalPairing {
    fn pair(&self, current: &[Arc<Variant>], rng: &mut dyn RngCore) -> Option<(usize, usize)> {
        if current.len() < 2 {
            return None;
        }
        let weights: Vec<f64> = current.iter().map(|v| v.fitness.value()).collect();
        let by_fitness = |indices: Vec<usize>| {
            let weights = weights.clone();
            Roulette::new(indices, move |i: &usize| weights[*i])
        };
        let first = *by_fitness((0..current.len()).collect()).exec(rng)?;
        let rest: Vec<usize> = (0..current.len()).filter(|i| *i != first).collect();
        let second = *by_fitness(rest).exec(rng)?;
        Some((first, second))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentPairingKind {
    #[default]
    Random,
    FitnessProportional,
}

impl ParentPairingKind {
    pub fn build(self) -> Arc<dyn ParentPairing> {
        match self {
            Self::Random => Arc::new(RandomPairing),
            Self::FitnessProportional => Arc::new(FitnessProportionalPairing),
        }
    }
}

impl fmt::Display for ParentPairingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::FitnessProportional => write!(f, "fitness_proportional"),
        }
    }
}

/// Produces recombined genes from pairs of survivors.
pub trait Crossover: Send + Sync {
    fn exec(&self, current: &[Arc<Variant>], rng: &mut dyn RngCore) -> Vec<VariantRequest>;
}

/// Up to `count` children per generation, two per pairing.
pub struct SinglePointCrossover {
    count: usize,
    pairing: Arc<dyn ParentPairing>,
}

impl SinglePointCrossover {
    pub fn new(count: usize, pairing: Arc<dyn ParentPairing>) -> Self {
        Self { count, pairing }
    }
}

impl Crossover for SinglePointCrossover {
    fn exec(&self, current: &[Arc<Variant>], rng: &mut dyn RngCore) -> Vec<VariantRequest> {
        let mut requests = Vec::with_capacity(self.count);
        let mut attempts = 0;
        while requests.len() < self.count && attempts < self.count {
            attempts += 1;
            let Some((i, j)) = self.pairing.pair(current, rng) else {
                break;
            };
            let (a, b) = (&current[i], &current[j]);
            let longest = a.gene.len().max(b.gene.len());
            if longest == 0 {
                continue;
            }
            let cut = rng.gen_range(0..=longest);
            let (first, second) = cross(&a.gene, &b.gene, cut);
            for gene in [first, second] {
                if requests.len() == self.count {
                    break;
                }
                requests.push(VariantRequest::new(
                    gene,
                    HistoricalElement::Crossover {
                        parent_a: Arc::clone(a),
                        parent_b: Arc::clone(b),
                        cut_point: cut,
                    },
                ));
            }
        }
        debug!(requested = self.count, produced = requests.len(), "crossover");
        requests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::{Base, Operation};
    use crate::variant::fixtures::variant;
    use mend_ast::{NodeId, SourcePath, StatementLocation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gene(nodes: &[u64]) -> Gene {
        Gene::new(
            nodes
                .iter()
                .map(|n| {
                    Base::new(
                        StatementLocation::new(SourcePath::product("src/A.java"), NodeId(*n)),
                        Operation::Delete,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn cut_zero_swaps_parents() {
        let (a, b) = (gene(&[1, 2]), gene(&[3]));
        let (first, second) = cross(&a, &b, 0);
        assert_eq!(first, b);
        assert_eq!(second, a);
    }

    #[test]
    fn cut_is_clamped_per_parent() {
        let (a, b) = (gene(&[1, 2, 3]), gene(&[4]));
        let (first, second) = cross(&a, &b, 2);
        assert_eq!(first, gene(&[1, 2]));
        assert_eq!(second, gene(&[4, 3]));
    }

    #[test]
    fn random_pairing_is_distinct() {
        let pool: Vec<_> = (0..3)
            .map(|i| variant(i, 1, 0.5, Gene::empty(), HistoricalElement::Original))
            .collect();
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let (i, j) = RandomPairing.pair(&pool, &mut rng).unwrap();
            assert_ne!(i, j);
        }
        assert!(RandomPairing.pair(&pool[..1], &mut rng).is_none());
    }

    #[test]
    fn fitness_pairing_prefers_fit_parents() {
        let pool = vec![
            variant(0, 1, 0.0, Gene::empty(), HistoricalElement::Original),
            variant(1, 1, 0.9, Gene::empty(), HistoricalElement::Original),
            variant(2, 1, 0.8, Gene::empty(), HistoricalElement::Original),
        ];
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..50 {
            let (i, j) = FitnessProportionalPairing.pair(&pool, &mut rng).unwrap();
            assert_ne!(i, j);
            assert!(i != 0 && j != 0);
        }
    }

    #[test]
    fn crossover_records_both_parents() {
        let pool = vec![
            variant(0, 1, 0.5, gene(&[1]), HistoricalElement::Original),
            variant(1, 1, 0.5, gene(&[2, 3]), HistoricalElement::Original),
        ];
        let mut rng = StdRng::seed_from_u64(21);
        let requests = SinglePointCrossover::new(5, Arc::new(RandomPairing)).exec(&pool, &mut rng);
        assert_eq!(requests.len(), 5);
        for r in requests {
            match r.history {
                HistoricalElement::Crossover {
                    parent_a, parent_b, ..
                } => assert_ne!(parent_a.id, parent_b.id),
                other => panic!("unexpected history {other}"),
            }
        }
    }

    #[test]
    fn single_survivor_yields_nothing() {
        let pool = vec![variant(0, 1, 0.5, gene(&[1]), HistoricalElement::Original)];
        let mut rng = StdRng::seed_from_u64(0);
        assert!(SinglePointCrossover::new(4, Arc::new(RandomPairing))
            .exec(&pool, &mut rng)
            .is_empty());
    }
}
