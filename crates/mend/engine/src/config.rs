//! Run configuration, loadable from TOML.

use mend_ast::TargetProject;
use mend_fl::FaultLocalizationKind;
use mend_ga::{ParentPairingKind, ReuseScope, VariantSelectionKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{EngineError, EngineResult};

/// Everything a repair run needs to know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Project to repair
    #[serde(default)]
    pub project: TargetProject,

    /// Survivors kept per generation
    #[serde(default = "default_headcount")]
    pub headcount: usize,

    #[serde(default = "default_max_generation")]
    pub max_generation: u32,

    /// Wall-clock limit for the whole run in seconds
    #[serde(default = "default_time_limit")]
    pub time_limit_secs: u64,

    /// Limit for one test method in seconds
    #[serde(default = "default_test_time_limit")]
    pub test_time_limit_secs: u64,

    /// Stop once this many solutions were found
    #[serde(default = "default_required_solutions")]
    pub required_solutions: usize,

    #[serde(default = "default_generating_count")]
    pub mutation_generating_count: usize,

    #[serde(default = "default_generating_count")]
    pub crossover_generating_count: usize,

    #[serde(default)]
    pub random_seed: u64,

    /// Variant evaluations in flight at once
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    #[serde(default)]
    pub fault_localization: FaultLocalizationKind,

    #[serde(default)]
    pub reuse_scope: ReuseScope,

    #[serde(default)]
    pub variant_selection: VariantSelectionKind,

    #[serde(default)]
    pub parent_pairing: ParentPairingKind,

    #[serde(default = "default_true")]
    pub skip_duplicate_sources: bool,

    /// Where solutions are written
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Only log solutions, never write them
    #[serde(default)]
    pub need_not_output: bool,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub test: TestConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            project: TargetProject::default(),
            headcount: default_headcount(),
            max_generation: default_max_generation(),
            time_limit_secs: default_time_limit(),
            test_time_limit_secs: default_test_time_limit(),
            required_solutions: default_required_solutions(),
            mutation_generating_count: default_generating_count(),
            crossover_generating_count: default_generating_count(),
            random_seed: 0,
            parallelism: default_parallelism(),
            fault_localization: FaultLocalizationKind::default(),
            reuse_scope: ReuseScope::default(),
            variant_selection: VariantSelectionKind::default(),
            parent_pairing: ParentPairingKind::default(),
            skip_duplicate_sources: true,
            out_dir: default_out_dir(),
            need_not_output: false,
            build: BuildConfig::default(),
            test: TestConfig::default(),
        }
    }
}

/// Compiler invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Program and leading arguments; output and class path flags are appended
    #[serde(default = "default_compiler_command")]
    pub compiler_command: Vec<String>,

    /// Limit for one compiler invocation in seconds
    #[serde(default = "default_compile_timeout")]
    pub timeout_secs: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            compiler_command: default_compiler_command(),
            timeout_secs: default_compile_timeout(),
        }
    }
}

/// Test runner invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestConfig {
    /// Program and leading arguments. Empty disables command execution.
    #[serde(default)]
    pub runner_command: Vec<String>,
}

fn default_headcount() -> usize {
    100
}

fn default_max_generation() -> u32 {
    10
}

fn default_time_limit() -> u64 {
    60
}

fn default_test_time_limit() -> u64 {
    10
}

fn default_compile_timeout() -> u64 {
    60
}

fn default_required_solutions() -> usize {
    1
}

fn default_generating_count() -> usize {
    10
}

fn default_parallelism() -> usize {
    num_cpus::get()
}

fn default_true() -> bool {
    true
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("mend-out")
}

fn default_compiler_command() -> Vec<String> {
    vec!["javac".into(), "-encoding".into(), "UTF-8".into()]
}

impl Configuration {
    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigIo {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.headcount == 0 {
            return Err(EngineError::Config("headcount must be at least 1".into()));
        }
        if self.parallelism == 0 {
            return Err(EngineError::Config("parallelism must be at least 1".into()));
        }
        if self.project.product_source_paths.is_empty() {
            return Err(EngineError::Config("no product source path given".into()));
        }
        if self.project.test_source_paths.is_empty() {
            return Err(EngineError::Config("no test source path given".into()));
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    pub fn test_time_limit(&self) -> Duration {
        Duration::from_secs(self.test_time_limit_secs)
    }

    pub fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.build.timeout_secs)
    }
}
