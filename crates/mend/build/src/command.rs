use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::compiler::Compiler;
use crate::error::CompilerError;
use crate::types::{ClassFile, CompileRequest, CompiledUnit, Diagnostic};

/// Runs an external compiler (`javac` by default) in a scratch directory.
///
/// The configured command receives `-d <out> -cp <classpath>` followed by the
/// staged source files. Reused units are written as class files and placed
/// first on the class path.
#[derive(Clone, Debug)]
pub struct CommandCompiler {
    command: Vec<String>,
    timeout: Duration,
}

impl CommandCompiler {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    pub fn javac(timeout: Duration) -> Self {
        Self::new(
            vec!["javac".into(), "-encoding".into(), "UTF-8".into()],
            timeout,
        )
    }
}

fn io_err(context: &str, path: &Path, e: std::io::Error) -> CompilerError {
    CompilerError::Io(format!("{} {}: {}", context, path.display(), e))
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CompilerError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_err("create", parent, e))?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| io_err("write", path, e))
}

/// Class files for the top-level type `simple` (and its nested types) in `dir`.
async fn collect_class_files(
    out_root: &Path,
    dir: &Path,
    simple: &str,
) -> Result<Vec<ClassFile>, CompilerError> {
    let mut files = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
        Err(e) => return Err(io_err("read", dir, e)),
    };
    let nested_prefix = format!("{}$", simple);
    let exact = format!("{}.class", simple);
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| io_err("read", dir, e))?
    {
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name != exact
            && !(file_name.starts_with(&nested_prefix) && file_name.ends_with(".class"))
        {
            continue;
        }
        let path = entry.path();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| io_err("read", &path, e))?;
        let name = path
            .strip_prefix(out_root)
            .unwrap_or(path.as_path())
            .to_string_lossy()
            .replace('\\', "/");
        files.push(ClassFile { name, bytes });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

#[async_trait]
impl Compiler for CommandCompiler {
    #[instrument(skip_all, fields(sources = request.sources.len(), reused = request.reused.len()))]
    async fn compile(&self, request: &CompileRequest) -> Result<Vec<CompiledUnit>, CompilerError> {
        let (program, base_args) = self.command.split_first().ok_or(CompilerError::EmptyCommand)?;

        let scratch = tempfile::tempdir().map_err(|e| CompilerError::Io(e.to_string()))?;
        let src_dir = scratch.path().join("src");
        let out_dir = scratch.path().join("classes");
        let reused_dir = scratch.path().join("reused");
        tokio::fs::create_dir_all(&out_dir)
            .await
            .map_err(|e| io_err("create", &out_dir, e))?;

        let mut staged = Vec::with_capacity(request.sources.len());
        for source in &request.sources {
            let rel = format!("{}.java", source.fqn.as_str().replace('.', "/"));
            let path = src_dir.join(rel);
            write_file(&path, source.text.as_bytes()).await?;
            staged.push(path);
        }
        for unit in &request.reused {
            for class in &unit.class_files {
                write_file(&reused_dir.join(&class.name), &class.bytes).await?;
            }
        }

        let mut class_path: Vec<PathBuf> = vec![reused_dir.clone()];
        class_path.extend(request.class_paths.iter().cloned());
        let class_path = std::env::join_paths(&class_path)
            .map_err(|e| CompilerError::Io(e.to_string()))?;

        let mut cmd = Command::new(program);
        cmd.args(base_args)
            .arg("-d")
            .arg(&out_dir)
            .arg("-cp")
            .arg(&class_path)
            .args(&staged)
            .kill_on_drop(true);

        debug!(program = %program, "invoking compiler");
        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(|e| CompilerError::Launch(e.to_string()))?,
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "compiler timed out");
                return Err(CompilerError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut diagnostics: Vec<Diagnostic> =
                stderr.lines().filter_map(Diagnostic::parse_line).collect();
            if diagnostics.is_empty() {
                diagnostics.push(Diagnostic::message(stderr.trim().to_string()));
            }
            return Err(CompilerError::Diagnostics(diagnostics));
        }

        let mut units = Vec::with_capacity(request.sources.len());
        for source in &request.sources {
            let package_dir = source
                .fqn
                .package_name()
                .split('.')
                .filter(|s| !s.is_empty())
                .fold(out_dir.clone(), |dir, part| dir.join(part));
            let class_files =
                collect_class_files(&out_dir, &package_dir, source.fqn.simple_name()).await?;
            units.push(CompiledUnit {
                fqn: source.fqn.clone(),
                source_fingerprint: source.fingerprint,
                class_files,
            });
        }
        Ok(units)
    }
}
