//! Property tests: single-point crossover conserves bases.

use mend_ast::{NodeId, SourcePath, StatementLocation};
use mend_ga::{cross, Base, Gene, Operation};
use proptest::prelude::*;

fn arb_gene() -> impl Strategy<Value = Gene> {
    prop::collection::vec(0u64..50, 0..6).prop_map(|nodes| {
        Gene::new(
            nodes
                .into_iter()
                .map(|n| {
                    Base::new(
                        StatementLocation::new(SourcePath::product("src/A.java"), NodeId(n)),
                        Operation::Delete,
                    )
                })
                .collect(),
        )
    })
}

proptest! {
    /// Cutting at zero swaps the parents.
    #[test]
    fn cut_at_zero_swaps(a in arb_gene(), b in arb_gene()) {
        let (x, y) = cross(&a, &b, 0);
        prop_assert_eq!(x, b);
        prop_assert_eq!(y, a);
    }

    /// Cutting past both genes reproduces the parents.
    #[test]
    fn cut_past_the_end_keeps_parents(a in arb_gene(), b in arb_gene(), extra in 0usize..4) {
        let cut = a.len().max(b.len()) + extra;
        let (x, y) = cross(&a, &b, cut);
        prop_assert_eq!(x, a);
        prop_assert_eq!(y, b);
    }

    /// The children hold exactly the parents' bases between them.
    #[test]
    fn children_conserve_bases(a in arb_gene(), b in arb_gene(), cut in 0usize..8) {
        let (x, y) = cross(&a, &b, cut);
        prop_assert_eq!(x.len() + y.len(), a.len() + b.len());

        let mut parents: Vec<_> = a.bases().iter().chain(b.bases()).map(|b| b.target.node).collect();
        let mut children: Vec<_> = x.bases().iter().chain(y.bases()).map(|b| b.target.node).collect();
        parents.sort();
        children.sort();
        prop_assert_eq!(parents, children);
    }
}
