use mend_ast::AstSet;
use mend_exec::TestResults;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

const EPSILON: f64 = 1e-12;

/// Scalar quality of a variant, in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Fitness(f64);

impl Fitness {
    pub const MIN: Fitness = Fitness(0.0);
    pub const MAX: Fitness = Fitness(1.0);

    /// Clamped into `[0, 1]`; NaN becomes the minimum.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// All target tests pass.
    pub fn is_max(&self) -> bool {
        (self.0 - 1.0).abs() < EPSILON
    }

    pub fn approx_eq(&self, other: &Fitness) -> bool {
        (self.0 - other.0).abs() < EPSILON
    }

    /// Total order for ranking; values are never NaN.
    pub fn total_cmp(&self, other: &Fitness) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Turns test outcomes into fitness.
pub trait CodeValidation: Send + Sync {
    fn exec(&self, source: &AstSet, results: &TestResults) -> Fitness;
}

/// Fraction of passing tests. A build failure or an empty run scores the minimum.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCodeValidation;

impl CodeValidation for DefaultCodeValidation {
    fn exec(&self, _source: &AstSet, results: &TestResults) -> Fitness {
        if results.build_failed || results.total() == 0 {
            return Fitness::MIN;
        }
        Fitness::new(results.success_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mend_ast::FullyQualifiedName;
    use mend_exec::TestResult;

    #[test]
    fn fitness_is_clamped() {
        assert_eq!(Fitness::new(1.5), Fitness::MAX);
        assert_eq!(Fitness::new(-0.1), Fitness::MIN);
        assert_eq!(Fitness::new(f64::NAN), Fitness::MIN);
        assert!(Fitness::new(1.0).is_max());
        assert!(!Fitness::new(0.99).is_max());
    }

    #[test]
    fn validation_uses_pass_rate() {
        let results = TestResults::new(vec![
            TestResult::passed(FullyQualifiedName::test("T.a")),
            TestResult::failed(FullyQualifiedName::test("T.b"), "x"),
        ]);
        let f = DefaultCodeValidation.exec(&AstSet::default(), &results);
        assert!(f.approx_eq(&Fitness::new(0.5)));
    }

    #[test]
    fn build_failure_and_empty_runs_score_minimum() {
        let v = DefaultCodeValidation;
        assert_eq!(v.exec(&AstSet::default(), &TestResults::build_failure()), Fitness::MIN);
        assert_eq!(v.exec(&AstSet::default(), &TestResults::default()), Fitness::MIN);
    }
}
