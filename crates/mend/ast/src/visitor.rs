use serde::{Deserialize, Serialize};

use crate::ast_set::{AstSet, StatementLocation};
use crate::fqn::FullyQualifiedName;
use crate::statement::Statement;

/// A statement from the product code that may be copied elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReuseCandidate {
    pub statement: Statement,
    pub package_name: String,
    pub fqn: FullyQualifiedName,
}

/// Visit every non-block statement of the product code in pre-order.
pub fn visit_statements<'a>(ast: &'a AstSet, mut f: impl FnMut(StatementLocation, &'a Statement)) {
    for unit in ast.product_units() {
        for stmt in unit.statements() {
            if !stmt.is_block() {
                f(StatementLocation::new(unit.path.clone(), stmt.id), stmt);
            }
        }
    }
}

/// Collect reuse candidates; nested statements are candidates in their own right.
pub fn reuse_candidates(ast: &AstSet) -> Vec<ReuseCandidate> {
    let mut out = Vec::new();
    for unit in ast.product_units() {
        let package = unit.fqn.package_name().to_string();
        for stmt in unit.statements() {
            if stmt.is_block() {
                continue;
            }
            out.push(ReuseCandidate {
                statement: stmt.clone(),
                package_name: package.clone(),
                fqn: unit.fqn.clone(),
            });
        }
    }
    out
}
