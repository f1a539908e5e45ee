use mend_ast::{ContentHash, EditError, StatementLocation};

/// A gene that cannot be materialized against the original program.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// Base `index` targets a statement that is gone, usually because an
    /// earlier base of the same gene removed or replaced it.
    #[error("base {index} targets missing statement {location}")]
    TargetNotFound {
        index: usize,
        location: StatementLocation,
    },
    #[error("base {index} targets unknown source unit: {source}")]
    UnitNotFound {
        index: usize,
        #[source]
        source: EditError,
    },
}

impl GenerationError {
    pub(crate) fn from_edit(index: usize, location: &StatementLocation, err: EditError) -> Self {
        match err {
            EditError::TargetNotFound { .. } => Self::TargetNotFound {
                index,
                location: location.clone(),
            },
            other @ EditError::UnitNotFound(_) => Self::UnitNotFound {
                index,
                source: other,
            },
        }
    }
}

/// Why the store declined to evaluate a request. Neither case aborts a run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("ungenerable gene: {0}")]
    Ungenerable(#[from] GenerationError),
    #[error("source {0} was already evaluated")]
    DuplicateSource(ContentHash),
}
