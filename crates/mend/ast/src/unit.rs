use serde::{Deserialize, Serialize};

use crate::fqn::FullyQualifiedName;
use crate::project::SourcePath;
use crate::statement::{apply_in_list, Edit, NodeId, Statement};

/// A method whose body has been parsed into statements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Everything before the opening brace, e.g. `public int close_to_zero(int n)`.
    pub signature: String,
    pub body: Vec<Statement>,
}

impl Method {
    /// The simple name declared by the signature, e.g. `close_to_zero`.
    pub fn name(&self) -> &str {
        let sig = &self.signature;
        let Some(close) = sig.rfind(')') else {
            return "";
        };
        // the parameter list is the last parenthesized group
        let mut depth = 0;
        let mut open = 0;
        for (idx, c) in sig[..=close].char_indices().rev() {
            match c {
                ')' => depth += 1,
                '(' => {
                    depth -= 1;
                    if depth == 0 {
                        open = idx;
                        break;
                    }
                }
                _ => {}
            }
        }
        sig[..open].split_whitespace().last().unwrap_or("")
    }
}

/// A member of the primary type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    /// Fields, nested types, initializers, abstract methods: kept as source text.
    Verbatim(String),
    Method(Method),
}

/// One parsed compilation unit.
///
/// Only the members of the primary type are structured. Text before the type
/// body (package, imports, the type declaration up to `{`) and anything after
/// its closing brace is carried through untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUnit {
    pub path: SourcePath,
    pub fqn: FullyQualifiedName,
    pub header: String,
    pub members: Vec<Member>,
    pub footer: String,
}

impl SourceUnit {
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            Member::Verbatim(_) => None,
        })
    }

    /// Names of the test methods of this unit: the `@Test` annotated ones,
    /// or every method when none is annotated.
    pub fn test_method_names(&self) -> Vec<&str> {
        let annotated: Vec<&str> = self
            .methods()
            .filter(|m| m.signature.contains("@Test"))
            .map(Method::name)
            .collect();
        if !annotated.is_empty() {
            return annotated;
        }
        self.methods().map(Method::name).filter(|n| !n.is_empty()).collect()
    }

    /// Every statement of every method body, pre-order.
    pub fn statements(&self) -> Vec<&Statement> {
        let mut out = Vec::new();
        for method in self.methods() {
            for stmt in &method.body {
                stmt.walk(&mut |s| out.push(s));
            }
        }
        out
    }

    pub fn find(&self, id: NodeId) -> Option<&Statement> {
        self.methods()
            .flat_map(|m| m.body.iter())
            .find_map(|s| s.find(id))
    }

    pub fn max_id(&self) -> u64 {
        self.methods()
            .flat_map(|m| m.body.iter())
            .map(Statement::max_id)
            .max()
            .unwrap_or(0)
    }

    /// Apply one edit in place. Returns `false` if `target` is not in this unit.
    pub(crate) fn apply_edit(&mut self, target: NodeId, edit: Edit, next_id: &mut u64) -> bool {
        let mut edit = Some(edit);
        for member in &mut self.members {
            if let Member::Method(method) = member {
                if apply_in_list(&mut method.body, target, &mut edit, next_id) {
                    return true;
                }
            }
        }
        false
    }
}
