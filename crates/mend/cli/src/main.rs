//! mend - automated program repair for Java projects
//!
//! Parses the target project, then evolves edit sequences over its product
//! statements until enough variants pass every test.

use anyhow::{bail, Context};
use clap::Parser;
use mend_ast::JavaAstConstruction;
use mend_build::CommandCompiler;
use mend_engine::{Configuration, LogPatchOutput, RepairEngine, SourceTreePatchOutput};
use mend_exec::CommandTestExecutor;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_filter().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = match &cli.config {
        Some(path) => Configuration::load(path)?,
        None => Configuration::default(),
    };
    cli.apply(&mut config);

    let cwd = std::env::current_dir().context("current directory is not accessible")?;
    if config.project.root_dir.as_os_str().is_empty() {
        config.project.root_dir = cwd.clone();
    }
    let root = config
        .project
        .root_dir
        .canonicalize()
        .with_context(|| format!("cannot access {}", config.project.root_dir.display()))?;
    if cwd.canonicalize().ok().as_ref() != Some(&root) {
        warn!("the directory where mend is running is different from the root of the target project");
        warn!("relative paths in the target's tests may not resolve");
        warn!("run mend from the root directory of the target project if the tests touch files");
    }

    if config.test.runner_command.is_empty() {
        bail!("no test runner configured; set [test] runner_command");
    }

    let compiler = CommandCompiler::new(
        config.build.compiler_command.clone(),
        config.compile_timeout(),
    );
    let executor = CommandTestExecutor::new(config.test.runner_command.clone())
        .with_class_paths(config.project.resolved_class_paths());

    let mut engine = RepairEngine::new(
        config.clone(),
        Arc::new(JavaAstConstruction::new()),
        Arc::new(compiler),
        Arc::new(executor),
    )
    .with_output(Arc::new(LogPatchOutput));
    if !config.need_not_output {
        engine = engine.with_output(Arc::new(SourceTreePatchOutput::new(config.out_dir.clone())));
    }

    info!(
        root = %root.display(),
        seed = config.random_seed,
        headcount = config.headcount,
        max_generation = config.max_generation,
        "mend starting"
    );
    let outcome = engine.run().await?;

    info!(
        reason = %outcome.reason,
        solutions = outcome.solutions.len(),
        generations = %outcome.generations,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        evaluated = outcome.metrics.variants_evaluated,
        build_failures = outcome.metrics.build_failures,
        cache_hit_rate = outcome.metrics.cache_hit_rate(),
        "mend finished"
    );
    if !outcome.is_repaired() {
        warn!("no program passing every test was found");
    }
    Ok(())
}
