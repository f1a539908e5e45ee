use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::AstError;

/// Whether a source file belongs to the product under repair or to its tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceKind {
    Product,
    Test,
}

/// Path of a source file, relative to the project root when possible.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourcePath {
    pub kind: SourceKind,
    pub path: PathBuf,
}

impl SourcePath {
    pub fn product(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Product,
            path: path.into(),
        }
    }

    pub fn test(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Test,
            path: path.into(),
        }
    }

    pub fn is_product(&self) -> bool {
        self.kind == SourceKind::Product
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// The project being repaired: where its sources, tests and libraries live.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProject {
    pub root_dir: PathBuf,
    pub product_source_paths: Vec<PathBuf>,
    pub test_source_paths: Vec<PathBuf>,
    pub class_paths: Vec<PathBuf>,
}

impl TargetProject {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_product_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.product_source_paths.push(path.into());
        self
    }

    pub fn with_test_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.test_source_paths.push(path.into());
        self
    }

    pub fn with_class_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.class_paths.push(path.into());
        self
    }

    /// Class path entries resolved against the project root.
    pub fn resolved_class_paths(&self) -> Vec<PathBuf> {
        self.class_paths.iter().map(|p| self.resolve(p)).collect()
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    /// Every `.java` file under the configured roots, sorted for determinism.
    ///
    /// Returns `(logical path, absolute path)` pairs. A file listed under both a
    /// product root and a test root is reported once, as a test file.
    pub fn collect_sources(&self) -> Result<Vec<(SourcePath, PathBuf)>, AstError> {
        let mut sources = Vec::new();
        for root in &self.test_source_paths {
            self.collect_under(root, SourceKind::Test, &mut sources)?;
        }
        for root in &self.product_source_paths {
            self.collect_under(root, SourceKind::Product, &mut sources)?;
        }
        sources.sort();
        sources.dedup_by(|a, b| a.0.path == b.0.path);
        Ok(sources)
    }

    fn collect_under(
        &self,
        root: &Path,
        kind: SourceKind,
        out: &mut Vec<(SourcePath, PathBuf)>,
    ) -> Result<(), AstError> {
        let project_root = canonical(self.project_root())?;
        let abs_root = self.resolve(root);
        if !abs_root.exists() {
            return Err(AstError::NoSources(abs_root.display().to_string()));
        }
        let abs_root = canonical(&abs_root)?;
        if !abs_root.starts_with(&project_root) {
            return Err(AstError::OutsideRoot {
                root: abs_root,
                project: project_root,
            });
        }
        for entry in WalkDir::new(&abs_root).follow_links(true) {
            let entry = entry.map_err(|e| AstError::Io {
                path: abs_root.clone(),
                source: e.into(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("java")
            {
                continue;
            }
            let logical = path
                .strip_prefix(&project_root)
                .map_err(|_| AstError::OutsideRoot {
                    root: path.to_path_buf(),
                    project: project_root.clone(),
                })?
                .to_path_buf();
            if out.iter().any(|(p, _)| p.path == logical) {
                continue;
            }
            out.push((SourcePath { kind, path: logical }, path.to_path_buf()));
        }
        Ok(())
    }

    fn project_root(&self) -> &Path {
        if self.root_dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.root_dir
        }
    }
}

fn canonical(path: &Path) -> Result<PathBuf, AstError> {
    path.canonicalize().map_err(|source| AstError::Io {
        path: path.to_path_buf(),
        source,
    })
}
