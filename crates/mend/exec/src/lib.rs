#![deny(unsafe_code)]
//! # mend-exec
//!
//! Test execution side of the evaluation oracle: per-test outcomes with
//! statement-level coverage, and executors that produce them under a time
//! budget.

pub mod command;
pub mod error;
pub mod executor;
pub mod report;
pub mod types;

pub use command::CommandTestExecutor;
pub use error::ExecError;
pub use executor::{SimulatedTestExecutor, TestExecutor};
pub use report::{CoverageReport, TestReport, UnitCoverageReport};
pub use types::{Coverage, CoverageStatus, ExecutionTargets, TestResult, TestResults};
