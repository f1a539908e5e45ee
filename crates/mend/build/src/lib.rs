#![deny(unsafe_code)]
//! # mend-build
//!
//! Compilation side of the evaluation oracle: a compiler capability, a
//! content-addressed artifact cache, and a builder that only hands changed
//! units to the compiler.

pub mod builder;
pub mod cache;
pub mod command;
pub mod compiler;
pub mod error;
pub mod types;

pub use builder::ProjectBuilder;
pub use cache::{ArtifactCache, CacheStats};
pub use command::CommandCompiler;
pub use compiler::{Compiler, SimulatedCompiler};
pub use error::CompilerError;
pub use types::{BuildResults, ClassFile, CompileRequest, CompiledUnit, Diagnostic};
