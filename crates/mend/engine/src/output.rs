use mend_ast::{AstSet, SourceFile};
use mend_ga::Variant;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};

/// Receives the solutions of a finished run.
pub trait PatchOutput: Send + Sync {
    fn write(&self, original: &AstSet, solutions: &[Arc<Variant>]) -> EngineResult<()>;
}

/// Product files of `variant` whose text differs from the original.
pub fn modified_files(original: &AstSet, variant: &Variant) -> Vec<SourceFile> {
    let before: HashMap<_, _> = original
        .source_files()
        .into_iter()
        .map(|f| (f.path.clone(), f.fingerprint))
        .collect();
    variant
        .source
        .source_files()
        .into_iter()
        .filter(|f| f.path.is_product() && before.get(&f.path) != Some(&f.fingerprint))
        .collect()
}

/// Logs each solution's edits, lineage and touched files.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogPatchOutput;

impl PatchOutput for LogPatchOutput {
    fn write(&self, original: &AstSet, solutions: &[Arc<Variant>]) -> EngineResult<()> {
        if solutions.is_empty() {
            warn!("no solution found");
            return Ok(());
        }
        for solution in solutions {
            info!(
                id = solution.id,
                generation = %solution.generation,
                fitness = %solution.fitness,
                gene = %solution.gene,
                "solution"
            );
            for step in solution.lineage() {
                info!("  {step}");
            }
            for file in modified_files(original, solution) {
                info!(path = %file.path, "  modified");
            }
        }
        Ok(())
    }
}

/// Writes each solution under `out_dir/variant-<id>/`: the modified product
/// files at their project-relative paths, `gene.json` and `lineage.txt`.
#[derive(Clone, Debug)]
pub struct SourceTreePatchOutput {
    out_dir: PathBuf,
}

impl SourceTreePatchOutput {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn variant_dir(&self, variant: &Variant) -> PathBuf {
        self.out_dir.join(format!("variant-{}", variant.id))
    }
}

/// `path` itself when it stays below the directory it is joined to.
fn contained(path: &Path) -> EngineResult<&Path> {
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(EngineError::UnsafeOutputPath(path.to_path_buf()));
    }
    Ok(path)
}

fn write_file(path: &Path, contents: &[u8]) -> EngineResult<()> {
    let io_err = |source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}

impl PatchOutput for SourceTreePatchOutput {
    fn write(&self, original: &AstSet, solutions: &[Arc<Variant>]) -> EngineResult<()> {
        for solution in solutions {
            let dir = self.variant_dir(solution);
            for file in modified_files(original, solution) {
                write_file(&dir.join(contained(&file.path.path)?), file.text.as_bytes())?;
            }
            let gene = serde_json::to_vec_pretty(&solution.gene).map_err(|e| EngineError::Output {
                path: dir.join("gene.json"),
                source: std::io::Error::other(e),
            })?;
            write_file(&dir.join("gene.json"), &gene)?;
            write_file(&dir.join("lineage.txt"), solution.lineage().join("\n").as_bytes())?;
            info!(dir = %dir.display(), "solution written");
        }
        Ok(())
    }
}
