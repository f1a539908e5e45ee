#![deny(unsafe_code)]
//! # mend-ga
//!
//! The generational search: genes and variants, weighted selection,
//! mutation and crossover, source generation, replacement policies, and the
//! variant store that evaluates candidates through the build and test oracle.

pub mod crossover;
pub mod error;
pub mod fitness;
pub mod gene;
pub mod generation;
pub mod logger;
pub mod mutation;
pub mod roulette;
pub mod selection;
pub mod store;
pub mod variant;
pub mod variant_selection;

pub use crossover::{
    cross, Crossover, FitnessProportionalPairing, ParentPairing, ParentPairingKind, RandomPairing,
    SinglePointCrossover,
};
pub use error::{GenerationError, StoreError};
pub use fitness::{CodeValidation, DefaultCodeValidation, Fitness};
pub use gene::{Base, Gene, Operation};
pub use generation::{DefaultSourceCodeGeneration, SourceCodeGeneration};
pub use logger::{EvolutionLogger, GenerationSummary};
pub use mutation::{Mutation, RandomMutation};
pub use roulette::Roulette;
pub use selection::{CandidateSelection, ReuseScope, RouletteStatementSelection};
pub use store::{StoreStats, Strategies, VariantStore};
pub use variant::{HistoricalElement, OrdinalNumber, Variant, VariantRequest};
pub use variant_selection::{
    ElitistSelection, GenerationalSelection, VariantSelection, VariantSelectionKind,
};
