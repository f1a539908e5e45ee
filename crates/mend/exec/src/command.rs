use async_trait::async_trait;
use mend_ast::{AstSet, FullyQualifiedName};
use mend_build::BuildResults;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::ExecError;
use crate::executor::TestExecutor;
use crate::report::CoverageReport;
use crate::types::{ExecutionTargets, TestResult, TestResults};

/// Runs each test class in an external runner process.
///
/// The runner is invoked as
/// `<command...> --class-path <cp> --report <file> --targets <a,b> <TestClass>`
/// and must write a [`CoverageReport`] to `<file>`. Artifacts are staged in a
/// fresh directory per evaluation.
#[derive(Clone, Debug)]
pub struct CommandTestExecutor {
    command: Vec<String>,
    class_paths: Vec<PathBuf>,
}

impl CommandTestExecutor {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            class_paths: Vec::new(),
        }
    }

    pub fn with_class_paths(mut self, class_paths: Vec<PathBuf>) -> Self {
        self.class_paths = class_paths;
        self
    }

    async fn stage(&self, build: &BuildResults, dir: &Path) -> Result<(), ExecError> {
        for unit in &build.units {
            for class in &unit.class_files {
                let path = dir.join(&class.name);
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| ExecError::Io(e.to_string()))?;
                }
                tokio::fs::write(&path, &class.bytes)
                    .await
                    .map_err(|e| ExecError::Io(e.to_string()))?;
            }
        }
        Ok(())
    }

    async fn run_class(
        &self,
        test: &FullyQualifiedName,
        class_path: &std::ffi::OsStr,
        report_path: &Path,
        targets: &str,
        budget: Duration,
        build: &BuildResults,
    ) -> ClassRun {
        let Some((program, base_args)) = self.command.split_first() else {
            return ClassRun::failed(ExecError::EmptyCommand);
        };
        let mut cmd = Command::new(program);
        cmd.args(base_args)
            .arg("--class-path")
            .arg(class_path)
            .arg("--report")
            .arg(report_path)
            .arg("--targets")
            .arg(targets)
            .arg(test.as_str())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(budget, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return ClassRun::failed(ExecError::Launch(e.to_string())),
            Err(_) => {
                // keep whatever the runner reported before it was killed
                let results = match read_report(test, report_path, build).await {
                    Some(Ok(results)) => results,
                    _ => Vec::new(),
                };
                return ClassRun {
                    results,
                    error: Some(ExecError::Timeout {
                        test: test.to_string(),
                        secs: budget.as_secs(),
                    }),
                };
            }
        };

        match read_report(test, report_path, build).await {
            Some(Ok(results)) => ClassRun {
                results,
                error: None,
            },
            Some(Err(e)) => ClassRun::failed(e),
            None => ClassRun::failed(ExecError::Report {
                test: test.to_string(),
                message: format!(
                    "no report written (exit {}): {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            }),
        }
    }
}

/// `None` when the runner wrote no report.
async fn read_report(
    test: &FullyQualifiedName,
    report_path: &Path,
    build: &BuildResults,
) -> Option<Result<Vec<TestResult>, ExecError>> {
    let json = tokio::fs::read_to_string(report_path).await.ok()?;
    Some(CoverageReport::parse(test.as_str(), &json).map(|r| r.into_results(build)))
}

/// What one runner process produced for a test class.
struct ClassRun {
    results: Vec<TestResult>,
    error: Option<ExecError>,
}

impl ClassRun {
    fn failed(error: ExecError) -> Self {
        Self {
            results: Vec::new(),
            error: Some(error),
        }
    }

    /// Results for the class, with a failure for every known method that
    /// did not finish. Falls back to one failure named after the class.
    fn complete(self, class: &FullyQualifiedName, methods: &[&str], elapsed: Duration) -> Vec<TestResult> {
        let Some(error) = self.error else {
            return self.results;
        };
        let message = error.to_string();
        let mut results = self.results;
        let mut missing: Vec<FullyQualifiedName> = methods
            .iter()
            .map(|m| FullyQualifiedName::test(format!("{}.{}", class.as_str(), m)))
            .filter(|name| !results.iter().any(|r| &r.name == name))
            .collect();
        if methods.is_empty() {
            missing.push(class.clone());
        }
        for name in missing {
            let mut failed = TestResult::failed(name, message.clone());
            failed.duration_ms = elapsed.as_millis() as u64;
            results.push(failed);
        }
        results
    }
}

#[async_trait]
impl TestExecutor for CommandTestExecutor {
    #[instrument(skip_all, fields(tests = targets.tests.len()))]
    async fn run(
        &self,
        ast: &AstSet,
        build: &BuildResults,
        targets: &ExecutionTargets,
        budget: Duration,
    ) -> TestResults {
        if !build.is_success() {
            return TestResults::build_failure();
        }

        let fail_all = |message: String| {
            TestResults::new(
                targets
                    .tests
                    .iter()
                    .map(|t| TestResult::failed(t.clone(), message.clone()))
                    .collect(),
            )
        };

        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => return fail_all(e.to_string()),
        };
        let classes = scratch.path().join("classes");
        if let Err(e) = self.stage(build, &classes).await {
            return fail_all(e.to_string());
        }
        let mut class_path = vec![classes];
        class_path.extend(self.class_paths.iter().cloned());
        let class_path = match std::env::join_paths(&class_path) {
            Ok(cp) => cp,
            Err(e) => return fail_all(e.to_string()),
        };
        let target_list = targets
            .targets
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut results = Vec::new();
        for (i, test) in targets.tests.iter().enumerate() {
            let methods: Vec<&str> = ast
                .test_units()
                .filter(|u| u.fqn.as_str() == test.as_str())
                .flat_map(|u| u.test_method_names())
                .collect();
            // each method gets the per-test budget
            let class_budget = budget.saturating_mul(methods.len().max(1) as u32);
            let report_path = scratch.path().join(format!("report-{}.json", i));
            let started = Instant::now();
            let run = self
                .run_class(test, &class_path, &report_path, &target_list, class_budget, build)
                .await;
            match &run.error {
                None => debug!(test = %test, count = run.results.len(), "test class finished"),
                Some(e) => warn!(
                    test = %test,
                    error = %e,
                    finished = run.results.len(),
                    "test class failed to run"
                ),
            }
            results.extend(run.complete(test, &methods, started.elapsed()));
        }
        TestResults::new(results)
    }
}
