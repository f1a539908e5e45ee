#![deny(unsafe_code)]
//! # mend-fl
//!
//! Spectrum-based fault localization. Scores each executed statement from
//! how often passing and failing tests cover it.

pub mod formula;
pub mod types;

pub use formula::{FaultLocalization, FaultLocalizationKind, Formula, Jaccard, Ochiai, Tarantula};
pub use types::{CoverageCounts, Suspiciousness, UnknownFormula};
