#![deny(unsafe_code)]
//! Program model for mend.
//!
//! Parses Java sources into statement trees, applies single edits without
//! touching earlier versions, and renders edited trees back to text with a
//! line map so coverage can be attributed to statements.

pub mod ast_set;
pub mod construction;
pub mod error;
pub mod fqn;
pub mod hash;
pub mod parser;
pub mod project;
pub mod render;
pub mod statement;
pub mod unit;
pub mod visitor;

pub use ast_set::{AstSet, StatementLocation};
pub use construction::{AstConstruction, JavaAstConstruction};
pub use error::{AstError, EditError};
pub use fqn::{FqnKind, FullyQualifiedName};
pub use hash::{ContentHash, ContentHashError};
pub use parser::parse_unit;
pub use project::{SourceKind, SourcePath, TargetProject};
pub use render::{LineMap, SourceFile};
pub use statement::{CatchClause, Edit, NodeId, Statement, StatementKind};
pub use unit::{Member, Method, SourceUnit};
pub use visitor::{reuse_candidates, visit_statements, ReuseCandidate};
