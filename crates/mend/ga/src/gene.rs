use mend_ast::{Edit, Statement, StatementLocation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The edit a [`Base`] performs at its target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    InsertBefore { donor: Statement },
    Replace { donor: Statement },
    Delete,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertBefore { .. } => "insert",
            Self::Replace { .. } => "replace",
            Self::Delete => "delete",
        }
    }

    pub fn to_edit(&self) -> Edit {
        match self {
            Self::InsertBefore { donor } => Edit::InsertBefore(donor.clone()),
            Self::Replace { donor } => Edit::Replace(donor.clone()),
            Self::Delete => Edit::Delete,
        }
    }
}

/// One edit at one statement location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    pub target: StatementLocation,
    pub operation: Operation,
}

impl Base {
    pub fn new(target: StatementLocation, operation: Operation) -> Self {
        Self { target, operation }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation.name(), self.target)
    }
}

/// Ordered edits applied cumulatively to the original program.
///
/// The empty gene is the unmodified program. Genes never change in place;
/// extending one yields a new gene.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    bases: Vec<Base>,
}

impl Gene {
    pub fn new(bases: Vec<Base>) -> Self {
        Self { bases }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// A copy of this gene with `base` appended.
    pub fn append(&self, base: Base) -> Gene {
        let mut bases = self.bases.clone();
        bases.push(base);
        Gene { bases }
    }

    /// `prefix[..]` followed by `suffix[..]`.
    pub fn concat(prefix: &[Base], suffix: &[Base]) -> Gene {
        let mut bases = Vec::with_capacity(prefix.len() + suffix.len());
        bases.extend_from_slice(prefix);
        bases.extend_from_slice(suffix);
        Gene { bases }
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bases.is_empty() {
            return f.write_str("[]");
        }
        let parts: Vec<String> = self.bases.iter().map(Base::to_string).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
