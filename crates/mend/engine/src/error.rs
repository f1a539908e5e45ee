use mend_ast::AstError;
use std::path::PathBuf;

/// Failures that stop a run before the search loop starts, or while
/// writing its results.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot read configuration {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ast(#[from] AstError),

    #[error("no reusable statements found in the product sources")]
    NoReuseCandidates,

    #[error("refusing to write outside the output directory: {0}")]
    UnsafeOutputPath(PathBuf),

    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
