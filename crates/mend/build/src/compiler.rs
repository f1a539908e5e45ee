use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::CompilerError;
use crate::types::{ClassFile, CompileRequest, CompiledUnit, Diagnostic};

/// Compilation capability consumed by the builder.
///
/// Implementations must only read the request: concurrent calls for
/// different program versions must not observe each other.
#[async_trait]
pub trait Compiler: Send + Sync {
    /// Compile `request.sources`, returning one unit per source in order.
    async fn compile(&self, request: &CompileRequest) -> Result<Vec<CompiledUnit>, CompilerError>;
}

/// An in-process compiler used for testing and development.
///
/// The artifact of a unit is its source text. Sources containing any of the
/// configured markers are rejected with a diagnostic.
#[derive(Debug, Default)]
pub struct SimulatedCompiler {
    reject_markers: Vec<String>,
    invocations: AtomicUsize,
}

impl SimulatedCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any source containing `marker`.
    pub fn rejecting(mut self, marker: impl Into<String>) -> Self {
        self.reject_markers.push(marker.into());
        self
    }

    /// Number of times `compile` has been called.
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Compiler for SimulatedCompiler {
    async fn compile(&self, request: &CompileRequest) -> Result<Vec<CompiledUnit>, CompilerError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);

        let mut diagnostics = Vec::new();
        for source in &request.sources {
            for marker in &self.reject_markers {
                if let Some(line) = source.text.lines().position(|l| l.contains(marker.as_str())) {
                    diagnostics.push(Diagnostic {
                        path: Some(source.path.to_string()),
                        line: Some(line as u32 + 1),
                        message: format!("rejected marker `{}`", marker),
                    });
                }
            }
        }
        if !diagnostics.is_empty() {
            return Err(CompilerError::Diagnostics(diagnostics));
        }

        Ok(request
            .sources
            .iter()
            .map(|source| CompiledUnit {
                fqn: source.fqn.clone(),
                source_fingerprint: source.fingerprint,
                class_files: vec![ClassFile {
                    name: format!("{}.class", source.fqn.as_str().replace('.', "/")),
                    bytes: source.text.as_bytes().to_vec(),
                }],
            })
            .collect())
    }
}
