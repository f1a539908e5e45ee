use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a statement node. Unique within one [`AstSet`](crate::AstSet).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A statement node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: NodeId,
    pub kind: StatementKind,
}

/// The closed set of statement syntaxes the engine edits.
///
/// Leaf kinds keep their full source text including the trailing `;`.
/// Conditions and headers keep the text between the parentheses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Assert(String),
    Break(String),
    Continue(String),
    Do {
        body: Box<Statement>,
        condition: String,
    },
    Empty,
    Expression(String),
    For {
        header: String,
        body: Box<Statement>,
    },
    If {
        condition: String,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    Return(String),
    /// Switch bodies are kept as opaque text.
    Switch(String),
    Synchronized {
        lock: String,
        body: Box<Statement>,
    },
    Throw(String),
    Try {
        resources: Option<String>,
        body: Box<Statement>,
        catches: Vec<CatchClause>,
        finally: Option<Box<Statement>>,
    },
    VariableDeclaration(String),
    While {
        condition: String,
        body: Box<Statement>,
    },
    /// Container only: never a reuse candidate or an edit target.
    Block(Vec<Statement>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchClause {
    pub parameter: String,
    pub body: Box<Statement>,
}

impl Statement {
    pub fn new(id: NodeId, kind: StatementKind) -> Self {
        Self { id, kind }
    }

    pub fn is_block(&self) -> bool {
        matches!(self.kind, StatementKind::Block(_))
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StatementKind::Assert(_) => "assert",
            StatementKind::Break(_) => "break",
            StatementKind::Continue(_) => "continue",
            StatementKind::Do { .. } => "do",
            StatementKind::Empty => "empty",
            StatementKind::Expression(_) => "expression",
            StatementKind::For { .. } => "for",
            StatementKind::If { .. } => "if",
            StatementKind::Return(_) => "return",
            StatementKind::Switch(_) => "switch",
            StatementKind::Synchronized { .. } => "synchronized",
            StatementKind::Throw(_) => "throw",
            StatementKind::Try { .. } => "try",
            StatementKind::VariableDeclaration(_) => "variable-declaration",
            StatementKind::While { .. } => "while",
            StatementKind::Block(_) => "block",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Statement> {
        match &self.kind {
            StatementKind::Assert(_)
            | StatementKind::Break(_)
            | StatementKind::Continue(_)
            | StatementKind::Empty
            | StatementKind::Expression(_)
            | StatementKind::Return(_)
            | StatementKind::Switch(_)
            | StatementKind::Throw(_)
            | StatementKind::VariableDeclaration(_) => Vec::new(),
            StatementKind::Do { body, .. }
            | StatementKind::For { body, .. }
            | StatementKind::Synchronized { body, .. }
            | StatementKind::While { body, .. } => vec![body.as_ref()],
            StatementKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                let mut out = vec![then_branch.as_ref()];
                if let Some(e) = else_branch {
                    out.push(e.as_ref());
                }
                out
            }
            StatementKind::Try {
                body,
                catches,
                finally,
                ..
            } => {
                let mut out = vec![body.as_ref()];
                out.extend(catches.iter().map(|c| c.body.as_ref()));
                if let Some(f) = finally {
                    out.push(f.as_ref());
                }
                out
            }
            StatementKind::Block(list) => list.iter().collect(),
        }
    }

    fn children_mut(&mut self) -> Vec<&mut Statement> {
        match &mut self.kind {
            StatementKind::Do { body, .. }
            | StatementKind::For { body, .. }
            | StatementKind::Synchronized { body, .. }
            | StatementKind::While { body, .. } => vec![body.as_mut()],
            StatementKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                let mut out = vec![then_branch.as_mut()];
                if let Some(e) = else_branch {
                    out.push(e.as_mut());
                }
                out
            }
            StatementKind::Try {
                body,
                catches,
                finally,
                ..
            } => {
                let mut out = vec![body.as_mut()];
                out.extend(catches.iter_mut().map(|c| c.body.as_mut()));
                if let Some(f) = finally {
                    out.push(f.as_mut());
                }
                out
            }
            StatementKind::Block(list) => list.iter_mut().collect(),
            _ => Vec::new(),
        }
    }

    /// Pre-order traversal over this node and every descendant.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Statement)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Number of non-block statements in this subtree, itself included.
    pub fn structural_size(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |s| {
            if !s.is_block() {
                count += 1;
            }
        });
        count
    }

    pub fn find(&self, id: NodeId) -> Option<&Statement> {
        if self.id == id {
            return Some(self);
        }
        self.children().into_iter().find_map(|c| c.find(id))
    }

    pub fn max_id(&self) -> u64 {
        let mut max = 0;
        self.walk(&mut |s| max = max.max(s.id.0));
        max
    }

    /// Assign fresh ids to every node in this subtree, pre-order.
    pub fn renumber(&mut self, next_id: &mut u64) {
        self.id = NodeId(*next_id);
        *next_id += 1;
        for child in self.children_mut() {
            child.renumber(next_id);
        }
    }
}

/// One edit applied at a statement location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    InsertBefore(Statement),
    Replace(Statement),
    Delete,
}

/// Apply `edit` to the statement `target` somewhere inside `list`.
///
/// Returns `false` when the target does not occur. A target sitting in a
/// single-statement slot (an `if` branch, a loop body) is wrapped in a block
/// for insertion and replaced by an empty statement on deletion, so the
/// surrounding syntax stays valid.
pub(crate) fn apply_in_list(
    list: &mut Vec<Statement>,
    target: NodeId,
    edit: &mut Option<Edit>,
    next_id: &mut u64,
) -> bool {
    if let Some(pos) = list.iter().position(|s| s.id == target) {
        match edit.take() {
            Some(Edit::InsertBefore(s)) => list.insert(pos, s),
            Some(Edit::Replace(s)) => list[pos] = s,
            Some(Edit::Delete) => {
                list.remove(pos);
            }
            None => return false,
        }
        return true;
    }
    list.iter_mut()
        .any(|s| apply_in_statement(s, target, edit, next_id))
}

fn apply_in_statement(
    stmt: &mut Statement,
    target: NodeId,
    edit: &mut Option<Edit>,
    next_id: &mut u64,
) -> bool {
    if let StatementKind::Block(list) = &mut stmt.kind {
        return apply_in_list(list, target, edit, next_id);
    }
    for slot in stmt.children_mut() {
        if slot.id == target {
            return apply_in_slot(slot, edit, next_id);
        }
        if apply_in_statement(slot, target, edit, next_id) {
            return true;
        }
    }
    false
}

fn apply_in_slot(slot: &mut Statement, edit: &mut Option<Edit>, next_id: &mut u64) -> bool {
    let fresh = |next_id: &mut u64| {
        let id = NodeId(*next_id);
        *next_id += 1;
        id
    };
    match edit.take() {
        Some(Edit::InsertBefore(s)) => {
            let original = slot.clone();
            *slot = Statement::new(fresh(next_id), StatementKind::Block(vec![s, original]));
        }
        Some(Edit::Replace(s)) => *slot = s,
        Some(Edit::Delete) => *slot = Statement::new(fresh(next_id), StatementKind::Empty),
        None => return false,
    }
    true
}
