use mend_ast::AstSet;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::cache::ArtifactCache;
use crate::compiler::Compiler;
use crate::types::{BuildResults, CompileRequest, Diagnostic};

/// Compiles program versions, reusing cached units whose source is unchanged.
#[derive(Clone)]
pub struct ProjectBuilder {
    compiler: Arc<dyn Compiler>,
    cache: Arc<ArtifactCache>,
    class_paths: Vec<PathBuf>,
}

impl ProjectBuilder {
    pub fn new(compiler: Arc<dyn Compiler>, cache: Arc<ArtifactCache>) -> Self {
        Self {
            compiler,
            cache,
            class_paths: Vec::new(),
        }
    }

    pub fn with_class_paths(mut self, class_paths: Vec<PathBuf>) -> Self {
        self.class_paths = class_paths;
        self
    }

    pub fn cache(&self) -> &Arc<ArtifactCache> {
        &self.cache
    }

    /// Build one program version.
    ///
    /// An empty set fails without invoking the compiler. When every unit is
    /// cached the result is assembled from the cache alone.
    #[instrument(skip_all, fields(units = ast.units().len()))]
    pub async fn build(&self, ast: &AstSet) -> BuildResults {
        if ast.is_empty() {
            debug!("nothing to compile");
            return BuildResults::empty();
        }

        let sources = ast.source_files();
        let mut cached = HashMap::new();
        let mut reused = Vec::new();
        let mut to_compile = Vec::new();
        for source in &sources {
            match self.cache.get(&source.fingerprint) {
                Some(unit) => {
                    cached.insert(source.fingerprint, unit.clone());
                    reused.push(unit);
                }
                None => to_compile.push(source.clone()),
            }
        }
        let cache_hits = reused.len();
        let compiled = to_compile.len();

        if !to_compile.is_empty() {
            let request = CompileRequest {
                sources: to_compile,
                reused,
                class_paths: self.class_paths.clone(),
            };
            match self.compiler.compile(&request).await {
                Ok(units) => {
                    for unit in units {
                        self.cache.publish(unit.clone());
                        cached.insert(unit.source_fingerprint, unit);
                    }
                }
                Err(e) => {
                    debug!(error = %e, "build failed");
                    return BuildResults::failed(sources, e.into_diagnostics());
                }
            }
        }

        let mut units = Vec::with_capacity(sources.len());
        for source in &sources {
            match cached.remove(&source.fingerprint) {
                Some(unit) => units.push(unit),
                None => {
                    return BuildResults::failed(
                        sources.clone(),
                        vec![Diagnostic {
                            path: Some(source.path.to_string()),
                            line: None,
                            message: "compiler produced no output for unit".into(),
                        }],
                    )
                }
            }
        }

        debug!(cache_hits, compiled, "build succeeded");
        BuildResults {
            success: true,
            units,
            sources,
            diagnostics: Vec::new(),
            cache_hits,
            compiled,
        }
    }
}
