use std::path::PathBuf;

use crate::project::SourcePath;
use crate::statement::NodeId;

/// Errors from project loading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum AstError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {path} at line {line}: {message}")]
    Parse {
        path: String,
        line: u32,
        message: String,
    },
    #[error("no type declaration found in {0}")]
    NoPrimaryType(String),
    #[error("no source files found under {0}")]
    NoSources(String),
    #[error("source root {root} is outside the project root {project}")]
    OutsideRoot { root: PathBuf, project: PathBuf },
}

/// Errors from applying a single edit to an [`AstSet`](crate::AstSet).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("source unit not found: {0}")]
    UnitNotFound(SourcePath),
    #[error("statement {node} not found in {path}")]
    TargetNotFound { path: SourcePath, node: NodeId },
}
