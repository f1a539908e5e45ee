use serde::{Deserialize, Serialize};

use crate::types::Diagnostic;

/// Errors that can occur while compiling a program version.
#[derive(Clone, Debug, Serialize, Deserialize, thiserror::Error)]
pub enum CompilerError {
    /// The compiler ran and rejected the sources.
    #[error("compilation failed with {} diagnostic(s)", .0.len())]
    Diagnostics(Vec<Diagnostic>),

    /// Compilation exceeded the allowed time budget (in seconds).
    #[error("compilation timed out after {0}s")]
    Timeout(u64),

    /// The compiler process could not be started.
    #[error("failed to launch compiler: {0}")]
    Launch(String),

    /// Staging sources or collecting outputs failed.
    #[error("compiler i/o error: {0}")]
    Io(String),

    #[error("compiler command is empty")]
    EmptyCommand,
}

impl CompilerError {
    /// Diagnostics describing this failure, synthesizing one if none were reported.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            Self::Diagnostics(d) if !d.is_empty() => d,
            other => vec![Diagnostic::message(other.to_string())],
        }
    }
}
