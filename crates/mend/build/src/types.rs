use mend_ast::{ContentHash, FullyQualifiedName, SourceFile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One compiled class file, named by its path relative to the output root
/// (`example/Calc$Inner.class`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// The compiler output for one source unit.
///
/// Keyed by the fingerprint of the exact source text it was compiled from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledUnit {
    pub fqn: FullyQualifiedName,
    pub source_fingerprint: ContentHash,
    pub class_files: Vec<ClassFile>,
}

/// A compiler message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: Option<String>,
    pub line: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            path: None,
            line: None,
            message: message.into(),
        }
    }

    /// Parse a `javac`-style line: `path:line: error: message`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (location, message) = line.split_once(": error: ")?;
        let (path, line_no) = location.rsplit_once(':')?;
        Some(Self {
            path: Some(path.trim().to_string()),
            line: line_no.trim().parse().ok(),
            message: message.trim().to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, self.line) {
            (Some(p), Some(l)) => write!(f, "{}:{}: {}", p, l, self.message),
            (Some(p), None) => write!(f, "{}: {}", p, self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Input to a [`Compiler`](crate::Compiler).
#[derive(Clone, Debug, Default)]
pub struct CompileRequest {
    /// Units that must be compiled.
    pub sources: Vec<SourceFile>,
    /// Previously compiled units available on the class path.
    pub reused: Vec<CompiledUnit>,
    pub class_paths: Vec<PathBuf>,
}

/// Outcome of building one program version.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BuildResults {
    pub success: bool,
    /// Compiled units in source order. Empty on failure.
    pub units: Vec<CompiledUnit>,
    /// Rendered sources, kept for line-to-statement mapping.
    pub sources: Vec<SourceFile>,
    pub diagnostics: Vec<Diagnostic>,
    pub cache_hits: usize,
    pub compiled: usize,
}

impl BuildResults {
    /// Nothing to compile. Treated as a failed build.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failed(sources: Vec<SourceFile>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: false,
            sources,
            diagnostics,
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn unit(&self, fqn: &FullyQualifiedName) -> Option<&CompiledUnit> {
        self.units.iter().find(|u| &u.fqn == fqn)
    }

    pub fn source(&self, fqn: &FullyQualifiedName) -> Option<&SourceFile> {
        self.sources.iter().find(|s| &s.fqn == fqn)
    }
}
