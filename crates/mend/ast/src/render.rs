use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fqn::FullyQualifiedName;
use crate::hash::ContentHash;
use crate::project::SourcePath;
use crate::statement::{NodeId, Statement, StatementKind};
use crate::unit::{Member, SourceUnit};

const INDENT: &str = "    ";

/// Maps 1-based source lines of a rendered file to the statement starting there.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMap(pub BTreeMap<u32, NodeId>);

impl LineMap {
    pub fn node_at(&self, line: u32) -> Option<NodeId> {
        self.0.get(&line).copied()
    }

    pub fn line_of(&self, node: NodeId) -> Option<u32> {
        self.0
            .iter()
            .find(|(_, n)| **n == node)
            .map(|(line, _)| *line)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A compilation unit rendered back to source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: SourcePath,
    pub fqn: FullyQualifiedName,
    pub text: String,
    /// Hash of path and text. Equal fingerprints mean identical files.
    pub fingerprint: ContentHash,
    pub line_map: LineMap,
}

impl SourceFile {
    pub fn render(unit: &SourceUnit) -> Self {
        let mut r = Renderer::default();
        r.raw(unit.header.trim_end());
        for member in &unit.members {
            match member {
                Member::Verbatim(text) => r.line(1, text.trim(), None),
                Member::Method(method) => {
                    r.line(1, &format!("{} {{", method.signature.trim()), None);
                    for stmt in &method.body {
                        r.statement(stmt, 2);
                    }
                    r.line(1, "}", None);
                }
            }
        }
        r.line(0, "}", None);
        let footer = unit.footer.trim();
        if !footer.is_empty() {
            r.raw(footer);
        }

        let path_str = unit.path.path.to_string_lossy();
        let fingerprint = ContentHash::hash_parts(&[path_str.as_bytes(), r.out.as_bytes()]);
        Self {
            path: unit.path.clone(),
            fqn: unit.fqn.clone(),
            text: r.out,
            fingerprint,
            line_map: LineMap(r.map),
        }
    }
}

#[derive(Default)]
struct Renderer {
    out: String,
    line: u32,
    map: BTreeMap<u32, NodeId>,
}

impl Renderer {
    fn current_line(&self) -> u32 {
        self.line + 1
    }

    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
        self.line += 1 + text.matches('\n').count() as u32;
    }

    fn line(&mut self, depth: usize, text: &str, node: Option<NodeId>) {
        if let Some(id) = node {
            self.map.insert(self.current_line(), id);
        }
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
        self.raw(text);
    }

    fn body(&mut self, stmt: &Statement, depth: usize) {
        if stmt.is_block() {
            self.statement(stmt, depth);
        } else {
            self.statement(stmt, depth + 1);
        }
    }

    fn statement(&mut self, stmt: &Statement, depth: usize) {
        let id = Some(stmt.id);
        match &stmt.kind {
            StatementKind::Assert(text)
            | StatementKind::Break(text)
            | StatementKind::Continue(text)
            | StatementKind::Expression(text)
            | StatementKind::Return(text)
            | StatementKind::Switch(text)
            | StatementKind::Throw(text)
            | StatementKind::VariableDeclaration(text) => self.line(depth, text.trim(), id),
            StatementKind::Empty => self.line(depth, ";", id),
            StatementKind::Block(list) => {
                self.line(depth, "{", None);
                for s in list {
                    self.statement(s, depth + 1);
                }
                self.line(depth, "}", None);
            }
            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.line(depth, &format!("if ({})", condition), id);
                self.body(then_branch, depth);
                if let Some(e) = else_branch {
                    self.line(depth, "else", None);
                    self.body(e, depth);
                }
            }
            StatementKind::While { condition, body } => {
                self.line(depth, &format!("while ({})", condition), id);
                self.body(body, depth);
            }
            StatementKind::For { header, body } => {
                self.line(depth, &format!("for ({})", header), id);
                self.body(body, depth);
            }
            StatementKind::Do { body, condition } => {
                self.line(depth, "do", id);
                self.body(body, depth);
                self.line(depth, &format!("while ({});", condition), id);
            }
            StatementKind::Synchronized { lock, body } => {
                self.line(depth, &format!("synchronized ({})", lock), id);
                self.body(body, depth);
            }
            StatementKind::Try {
                resources,
                body,
                catches,
                finally,
            } => {
                let head = match resources {
                    Some(r) => format!("try ({})", r),
                    None => "try".to_string(),
                };
                self.line(depth, &head, id);
                self.body(body, depth);
                for c in catches {
                    self.line(depth, &format!("catch ({})", c.parameter), None);
                    self.body(&c.body, depth);
                }
                if let Some(f) = finally {
                    self.line(depth, "finally", None);
                    self.body(f, depth);
                }
            }
        }
    }
}
