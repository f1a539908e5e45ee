//! Property tests: spectrum formulas stay in range and reward failing coverage.

use mend_fl::{CoverageCounts, Formula, Jaccard, Ochiai, Tarantula};
use proptest::prelude::*;

fn arb_counts() -> impl Strategy<Value = CoverageCounts> {
    (0usize..20, 0usize..20)
        .prop_flat_map(|(total_failed, total_passed)| {
            (0..=total_failed, 0..=total_passed, Just(total_failed), Just(total_passed))
        })
        .prop_map(|(failed_covered, passed_covered, total_failed, total_passed)| CoverageCounts {
            failed_covered,
            passed_covered,
            total_failed,
            total_passed,
        })
}

fn formulas() -> Vec<Box<dyn Formula>> {
    vec![Box::new(Ochiai), Box::new(Tarantula), Box::new(Jaccard)]
}

proptest! {
    /// Every score is a finite value in [0, 1].
    #[test]
    fn scores_are_bounded(counts in arb_counts()) {
        for formula in formulas() {
            let value = formula.score(&counts);
            prop_assert!(value.is_finite(), "{} gave {}", formula.name(), value);
            prop_assert!((0.0..=1.0 + 1e-12).contains(&value), "{} gave {}", formula.name(), value);
        }
    }

    /// A statement no failing test executed is not suspicious.
    #[test]
    fn no_failing_coverage_scores_zero(counts in arb_counts()) {
        let counts = CoverageCounts { failed_covered: 0, ..counts };
        prop_assert_eq!(Ochiai.score(&counts), 0.0);
    }

    /// More failing coverage never lowers the Ochiai score.
    #[test]
    fn ochiai_grows_with_failing_coverage(counts in arb_counts()) {
        prop_assume!(counts.failed_covered < counts.total_failed);
        let more = CoverageCounts { failed_covered: counts.failed_covered + 1, ..counts };
        prop_assert!(Ochiai.score(&more) >= Ochiai.score(&counts));
    }
}
