#![deny(unsafe_code)]
//! # mend-engine
//!
//! The repair loop: configuration, termination, run metrics and the
//! collaborators that receive the found solutions.
//!
//! ```text
//! parse ─► generation 0 ─► [mutate ─► cross ─► evaluate ─► check ─► select]* ─► output
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod output;
pub mod types;

pub use config::{BuildConfig, Configuration, TestConfig};
pub use engine::RepairEngine;
pub use error::{EngineError, EngineResult};
pub use metrics::RunMetrics;
pub use output::{modified_files, LogPatchOutput, PatchOutput, SourceTreePatchOutput};
pub use types::{RepairOutcome, StopWatch, TerminationReason};
