//! A small recursive-descent parser for Java compilation units.
//!
//! Only method bodies are parsed into [`Statement`] trees. Expressions, field
//! declarations, nested types and `switch` bodies are kept as source slices.
//! The parser is tolerant: it does not validate Java, it only finds statement
//! boundaries.

use crate::error::AstError;
use crate::fqn::{FqnKind, FullyQualifiedName};
use crate::project::{SourceKind, SourcePath};
use crate::statement::{CatchClause, NodeId, Statement, StatementKind};
use crate::unit::{Member, Method, SourceUnit};

const TYPE_KEYWORDS: &[&str] = &["class", "interface", "enum", "record"];
const MODIFIERS: &[&str] = &["final", "abstract", "static", "strictfp"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tok {
    Ident,
    Number,
    Literal,
    Punct(char),
}

#[derive(Clone, Copy, Debug)]
struct Token {
    kind: Tok,
    start: usize,
    end: usize,
    line: u32,
}

fn lex(src: &str, path: &str) -> Result<Vec<Token>, AstError> {
    let chars: Vec<(usize, char)> = src.char_indices().collect();
    let offset = |i: usize| chars.get(i).map(|(o, _)| *o).unwrap_or(src.len());
    let at = |i: usize| chars.get(i).map(|(_, c)| *c);
    let unterminated = |line: u32, what: &str| AstError::Parse {
        path: path.to_string(),
        line,
        message: format!("unterminated {}", what),
    };

    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut i = 0;
    while let Some(c) = at(i) {
        if c == '\n' {
            line += 1;
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '/' && at(i + 1) == Some('/') {
            while at(i).is_some_and(|c| c != '\n') {
                i += 1;
            }
            continue;
        }
        if c == '/' && at(i + 1) == Some('*') {
            let start_line = line;
            i += 2;
            loop {
                match at(i) {
                    None => return Err(unterminated(start_line, "comment")),
                    Some('*') if at(i + 1) == Some('/') => {
                        i += 2;
                        break;
                    }
                    Some('\n') => line += 1,
                    Some(_) => {}
                }
                i += 1;
            }
            continue;
        }

        let start = i;
        let start_line = line;
        let kind = if c == '"' && at(i + 1) == Some('"') && at(i + 2) == Some('"') {
            i += 3;
            loop {
                match at(i) {
                    None => return Err(unterminated(start_line, "text block")),
                    Some('\\') => {
                        if at(i + 1) == Some('\n') {
                            line += 1;
                        }
                        i += 1;
                    }
                    Some('"') if at(i + 1) == Some('"') && at(i + 2) == Some('"') => {
                        i += 3;
                        break;
                    }
                    Some('\n') => line += 1,
                    Some(_) => {}
                }
                i += 1;
            }
            Tok::Literal
        } else if c == '"' || c == '\'' {
            i += 1;
            loop {
                match at(i) {
                    None | Some('\n') => return Err(unterminated(start_line, "literal")),
                    Some('\\') => i += 2,
                    Some(q) if q == c => {
                        i += 1;
                        break;
                    }
                    Some(_) => i += 1,
                }
            }
            Tok::Literal
        } else if c.is_alphabetic() || c == '_' || c == '$' {
            while at(i).is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$') {
                i += 1;
            }
            Tok::Ident
        } else if c.is_ascii_digit() {
            while at(i).is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.') {
                i += 1;
            }
            Tok::Number
        } else {
            i += 1;
            Tok::Punct(c)
        };
        tokens.push(Token {
            kind,
            start: offset(start),
            end: offset(i),
            line: start_line,
        });
    }
    Ok(tokens)
}

struct Parser<'a> {
    src: &'a str,
    path: String,
    toks: Vec<Token>,
    pos: usize,
    next_id: u64,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> AstError {
        let line = self
            .toks
            .get(self.pos)
            .or_else(|| self.toks.last())
            .map(|t| t.line)
            .unwrap_or(1);
        AstError::Parse {
            path: self.path.clone(),
            line,
            message: message.into(),
        }
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn text(&self, idx: usize) -> &'a str {
        let t = &self.toks[idx];
        &self.src[t.start..t.end]
    }

    fn is_ident(&self, idx: usize) -> bool {
        self.toks.get(idx).is_some_and(|t| t.kind == Tok::Ident)
    }

    fn is_keyword(&self, idx: usize, kw: &str) -> bool {
        self.is_ident(idx) && self.text(idx) == kw
    }

    fn is_punct(&self, idx: usize, c: char) -> bool {
        self.toks.get(idx).is_some_and(|t| t.kind == Tok::Punct(c))
    }

    /// Source text covering tokens `from..=to`.
    fn slice(&self, from: usize, to: usize) -> String {
        self.src[self.toks[from].start..self.toks[to].end].to_string()
    }

    fn expect_punct(&mut self, c: char) -> Result<(), AstError> {
        if self.is_punct(self.pos, c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", c)))
        }
    }

    /// Index of the bracket closing the one at `open`.
    fn matching(&self, open: usize) -> Result<usize, AstError> {
        let mut depth = 0i32;
        for idx in open..self.toks.len() {
            match self.toks[idx].kind {
                Tok::Punct('(' | '[' | '{') => depth += 1,
                Tok::Punct(')' | ']' | '}') => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(idx);
                    }
                }
                _ => {}
            }
        }
        Err(AstError::Parse {
            path: self.path.clone(),
            line: self.toks[open].line,
            message: "unbalanced brackets".into(),
        })
    }

    /// Index of the first `;` at bracket depth zero, starting at `from`.
    fn semicolon(&self, from: usize) -> Result<usize, AstError> {
        let mut idx = from;
        while idx < self.toks.len() {
            match self.toks[idx].kind {
                Tok::Punct(';') => return Ok(idx),
                Tok::Punct('(' | '[' | '{') => idx = self.matching(idx)?,
                Tok::Punct(')' | ']' | '}') => break,
                _ => {}
            }
            idx += 1;
        }
        Err(AstError::Parse {
            path: self.path.clone(),
            line: self.toks.get(from).map(|t| t.line).unwrap_or(1),
            message: "missing ';'".into(),
        })
    }

    /// Consume `( ... )` and return the trimmed inner text.
    fn paren_text(&mut self) -> Result<String, AstError> {
        if !self.is_punct(self.pos, '(') {
            return Err(self.error("expected '('"));
        }
        let close = self.matching(self.pos)?;
        let inner = &self.src[self.toks[self.pos].end..self.toks[close].start];
        self.pos = close + 1;
        Ok(inner.trim().to_string())
    }

    /// Consume everything up to and including the next top-level `;`.
    fn raw_to_semicolon(&mut self) -> Result<String, AstError> {
        let start = self.pos;
        let end = self.semicolon(start)?;
        self.pos = end + 1;
        Ok(self.slice(start, end))
    }

    fn block_contents(&mut self) -> Result<Vec<Statement>, AstError> {
        let mut list = Vec::new();
        loop {
            if self.pos >= self.toks.len() {
                return Err(self.error("unexpected end of input"));
            }
            if self.is_punct(self.pos, '}') {
                self.pos += 1;
                return Ok(list);
            }
            list.push(self.statement()?);
        }
    }

    fn block(&mut self) -> Result<Statement, AstError> {
        let id = self.fresh_id();
        self.expect_punct('{')?;
        Ok(Statement::new(id, StatementKind::Block(self.block_contents()?)))
    }

    fn statement(&mut self) -> Result<Statement, AstError> {
        if self.pos >= self.toks.len() {
            return Err(self.error("unexpected end of input"));
        }
        if self.is_punct(self.pos, '{') {
            return self.block();
        }
        let id = self.fresh_id();
        if self.is_punct(self.pos, ';') {
            self.pos += 1;
            return Ok(Statement::new(id, StatementKind::Empty));
        }

        let word = if self.is_ident(self.pos) {
            self.text(self.pos)
        } else {
            ""
        };
        let kind = match word {
            "if" => {
                self.pos += 1;
                let condition = self.paren_text()?;
                let then_branch = Box::new(self.statement()?);
                let else_branch = if self.is_keyword(self.pos, "else") {
                    self.pos += 1;
                    Some(Box::new(self.statement()?))
                } else {
                    None
                };
                StatementKind::If {
                    condition,
                    then_branch,
                    else_branch,
                }
            }
            "while" => {
                self.pos += 1;
                let condition = self.paren_text()?;
                let body = Box::new(self.statement()?);
                StatementKind::While { condition, body }
            }
            "for" => {
                self.pos += 1;
                let header = self.paren_text()?;
                let body = Box::new(self.statement()?);
                StatementKind::For { header, body }
            }
            "do" => {
                self.pos += 1;
                let body = Box::new(self.statement()?);
                if !self.is_keyword(self.pos, "while") {
                    return Err(self.error("expected 'while' after do body"));
                }
                self.pos += 1;
                let condition = self.paren_text()?;
                self.expect_punct(';')?;
                StatementKind::Do { body, condition }
            }
            "synchronized" if self.is_punct(self.pos + 1, '(') => {
                self.pos += 1;
                let lock = self.paren_text()?;
                let body = Box::new(self.block()?);
                StatementKind::Synchronized { lock, body }
            }
            "try" => self.try_statement()?,
            "switch" => {
                let start = self.pos;
                self.pos += 1;
                self.paren_text()?;
                if !self.is_punct(self.pos, '{') {
                    return Err(self.error("expected switch body"));
                }
                let close = self.matching(self.pos)?;
                self.pos = close + 1;
                // Switch expressions used as statements end with ';'.
                let end = if self.is_punct(self.pos, ';') {
                    self.pos += 1;
                    close + 1
                } else {
                    close
                };
                StatementKind::Switch(self.slice(start, end))
            }
            "return" => StatementKind::Return(self.raw_to_semicolon()?),
            "throw" => StatementKind::Throw(self.raw_to_semicolon()?),
            "break" => StatementKind::Break(self.raw_to_semicolon()?),
            "continue" => StatementKind::Continue(self.raw_to_semicolon()?),
            "assert" => StatementKind::Assert(self.raw_to_semicolon()?),
            _ if self.is_ident(self.pos) && self.is_punct(self.pos + 1, ':') => {
                let start = self.pos;
                self.pos += 2;
                let saved = self.next_id;
                self.statement()?;
                self.next_id = saved;
                StatementKind::Expression(self.slice(start, self.pos - 1))
            }
            _ if self.local_type_declaration() => {
                let start = self.pos;
                let mut open = start;
                while open < self.toks.len() && !self.is_punct(open, '{') {
                    open += 1;
                }
                if open >= self.toks.len() {
                    return Err(self.error("expected type body"));
                }
                let close = self.matching(open)?;
                self.pos = close + 1;
                StatementKind::Expression(self.slice(start, close))
            }
            _ if self.declaration() => StatementKind::VariableDeclaration(self.raw_to_semicolon()?),
            _ => StatementKind::Expression(self.raw_to_semicolon()?),
        };
        Ok(Statement::new(id, kind))
    }

    fn try_statement(&mut self) -> Result<StatementKind, AstError> {
        self.pos += 1;
        let resources = if self.is_punct(self.pos, '(') {
            Some(self.paren_text()?)
        } else {
            None
        };
        let body = Box::new(self.block()?);
        let mut catches = Vec::new();
        while self.is_keyword(self.pos, "catch") {
            self.pos += 1;
            let parameter = self.paren_text()?;
            let body = Box::new(self.block()?);
            catches.push(CatchClause { parameter, body });
        }
        let finally = if self.is_keyword(self.pos, "finally") {
            self.pos += 1;
            Some(Box::new(self.block()?))
        } else {
            None
        };
        Ok(StatementKind::Try {
            resources,
            body,
            catches,
            finally,
        })
    }

    fn local_type_declaration(&self) -> bool {
        let mut idx = self.pos;
        while self.is_ident(idx) && MODIFIERS.contains(&self.text(idx)) {
            idx += 1;
        }
        if !self.is_ident(idx) {
            return false;
        }
        match self.text(idx) {
            "class" | "interface" | "enum" => self.is_ident(idx + 1),
            "record" => self.is_ident(idx + 1) && self.is_punct(idx + 2, '('),
            _ => false,
        }
    }

    /// `Type name =`, `Type name;`, `Type name,` or `Type name[` at the cursor.
    fn declaration(&self) -> bool {
        let mut idx = self.pos;
        loop {
            if self.is_keyword(idx, "final") {
                idx += 1;
            } else if self.is_punct(idx, '@') && self.is_ident(idx + 1) {
                idx += 2;
                while self.is_punct(idx, '.') && self.is_ident(idx + 1) {
                    idx += 2;
                }
                if self.is_punct(idx, '(') {
                    match self.matching(idx) {
                        Ok(close) => idx = close + 1,
                        Err(_) => return false,
                    }
                }
            } else {
                break;
            }
        }

        if !self.is_ident(idx) {
            return false;
        }
        idx += 1;
        loop {
            if self.is_punct(idx, '.') && self.is_ident(idx + 1) {
                idx += 2;
            } else if self.is_punct(idx, '<') {
                match self.skip_type_arguments(idx) {
                    Some(next) => idx = next,
                    None => return false,
                }
            } else {
                break;
            }
        }
        while self.is_punct(idx, '[') && self.is_punct(idx + 1, ']') {
            idx += 2;
        }
        if !self.is_ident(idx) || self.is_keyword(idx, "instanceof") {
            return false;
        }
        idx += 1;
        ['=', ';', ',', '['].iter().any(|c| self.is_punct(idx, *c))
    }

    fn skip_type_arguments(&self, open: usize) -> Option<usize> {
        let mut depth = 0;
        let mut idx = open;
        while let Some(tok) = self.toks.get(idx) {
            match tok.kind {
                Tok::Punct('<') => depth += 1,
                Tok::Punct('>') => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx + 1);
                    }
                }
                Tok::Ident | Tok::Punct('.' | ',' | '?' | '&' | '[' | ']' | '@') => {}
                _ => return None,
            }
            idx += 1;
        }
        None
    }

    fn members(&mut self, close: usize) -> Result<Vec<Member>, AstError> {
        let mut members = Vec::new();
        while self.pos < close {
            let start = self.pos;
            let mut idx = start;
            let mut saw_paren = false;
            let mut saw_assign = false;
            let mut saw_type = false;
            let member = loop {
                if idx >= close {
                    members.push(Member::Verbatim(self.slice(start, close - 1)));
                    self.pos = close;
                    return Ok(members);
                }
                match self.toks[idx].kind {
                    Tok::Punct(';') => {
                        self.pos = idx + 1;
                        break Member::Verbatim(self.slice(start, idx));
                    }
                    Tok::Punct('=') => saw_assign = true,
                    Tok::Punct('(') => {
                        if !saw_assign {
                            saw_paren = true;
                        }
                        idx = self.matching(idx)?;
                    }
                    Tok::Punct('[') => idx = self.matching(idx)?,
                    Tok::Ident if TYPE_KEYWORDS.contains(&self.text(idx)) && !saw_assign => {
                        saw_type = true
                    }
                    Tok::Punct('{') if saw_paren && !saw_assign && !saw_type => {
                        let signature = self.slice(start, idx - 1);
                        self.pos = idx + 1;
                        let body = self.block_contents()?;
                        break Member::Method(Method { signature, body });
                    }
                    Tok::Punct('{') => {
                        let end = self.matching(idx)?;
                        if saw_assign {
                            idx = end;
                        } else {
                            self.pos = end + 1;
                            break Member::Verbatim(self.slice(start, end));
                        }
                    }
                    _ => {}
                }
                idx += 1;
            };
            members.push(member);
        }
        Ok(members)
    }
}

/// Parse one compilation unit. Node ids are drawn from `next_id`.
pub fn parse_unit(path: SourcePath, src: &str, next_id: &mut u64) -> Result<SourceUnit, AstError> {
    let path_str = path.path.display().to_string();
    let toks = lex(src, &path_str)?;
    let mut p = Parser {
        src,
        path: path_str.clone(),
        toks,
        pos: 0,
        next_id: *next_id,
    };

    let package = if p.is_keyword(0, "package") {
        let end = p.semicolon(1)?;
        src[p.toks[0].end..p.toks[end].start]
            .split_whitespace()
            .collect::<String>()
    } else {
        String::new()
    };

    let stem = path
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let mut candidates: Vec<(String, usize, usize)> = Vec::new();
    let mut idx = 0;
    while idx < p.toks.len() {
        match p.toks[idx].kind {
            Tok::Punct('(' | '[' | '{') => idx = p.matching(idx)?,
            Tok::Ident
                if TYPE_KEYWORDS.contains(&p.text(idx))
                    && p.is_ident(idx + 1)
                    && !(idx > 0 && p.is_punct(idx - 1, '.')) =>
            {
                let name = p.text(idx + 1).to_string();
                let mut open = idx + 2;
                while open < p.toks.len() && !p.is_punct(open, '{') {
                    if p.is_punct(open, '(') {
                        open = p.matching(open)?;
                    }
                    open += 1;
                }
                if open >= p.toks.len() {
                    break;
                }
                let close = p.matching(open)?;
                candidates.push((name, open, close));
                idx = close;
            }
            _ => {}
        }
        idx += 1;
    }
    let (name, open, close) = candidates
        .iter()
        .find(|(name, _, _)| *name == stem)
        .or_else(|| candidates.first())
        .cloned()
        .ok_or_else(|| AstError::NoPrimaryType(path_str.clone()))?;

    let header = src[..p.toks[open].end].to_string();
    let footer = src[p.toks[close].end..].to_string();
    p.pos = open + 1;
    let members = p.members(close)?;

    let kind = match path.kind {
        SourceKind::Product => FqnKind::Target,
        SourceKind::Test => FqnKind::Test,
    };
    *next_id = p.next_id;
    Ok(SourceUnit {
        fqn: FullyQualifiedName::from_parts(&package, &name, kind),
        path,
        header,
        members,
        footer,
    })
}
