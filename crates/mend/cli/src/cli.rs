//! Command line options.

use clap::{ArgAction, Parser};
use mend_engine::Configuration;
use std::path::PathBuf;

/// mend - test-driven generational program repair
#[derive(Debug, Parser)]
#[command(name = "mend")]
#[command(about = "Repair a Java project until its tests pass", long_about = None)]
#[command(version, disable_help_flag = true)]
pub struct Cli {
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Configuration file path
    #[arg(long, env = "MEND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root directory of the target project
    #[arg(short = 'r', long = "root-dir", value_name = "PATH")]
    pub root_dir: Option<PathBuf>,

    /// Product source roots
    #[arg(short = 's', long = "src", value_name = "PATH", num_args = 1..)]
    pub src: Vec<PathBuf>,

    /// Test source roots
    #[arg(short = 't', long = "test", value_name = "PATH", num_args = 1..)]
    pub test: Vec<PathBuf>,

    /// Class path entries
    #[arg(short = 'c', long = "cp", value_name = "PATH", num_args = 1..)]
    pub cp: Vec<PathBuf>,

    /// Print DEBUG level logs
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Print ERROR level logs only
    #[arg(short, long)]
    pub quiet: bool,

    /// Variants kept per generation
    #[arg(short = 'h', long)]
    pub headcount: Option<usize>,

    /// Maximum generation
    #[arg(short = 'g', long)]
    pub max_generation: Option<u32>,

    /// Time limit for repairing in seconds
    #[arg(short = 'l', long)]
    pub time_limit: Option<u64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop after this many solutions
    #[arg(long)]
    pub required_solutions: Option<usize>,

    /// Mutants per generation
    #[arg(long)]
    pub mutation_count: Option<usize>,

    /// Crossover children per generation
    #[arg(long)]
    pub crossover_count: Option<usize>,

    /// Time limit for one test method in seconds
    #[arg(long)]
    pub test_time_limit: Option<u64>,

    /// Variants evaluated at once
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Output directory for solutions
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Only log solutions
    #[arg(long)]
    pub no_output: bool,

    /// Log level
    #[arg(long, env = "MEND_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "MEND_LOG_JSON")]
    pub json: bool,
}

impl Cli {
    /// Effective log filter.
    pub fn log_filter(&self) -> String {
        if self.verbose {
            "debug".into()
        } else if self.quiet {
            "error".into()
        } else {
            self.log_level.clone()
        }
    }

    /// Command line values override file values.
    pub fn apply(&self, config: &mut Configuration) {
        if let Some(root) = &self.root_dir {
            config.project.root_dir = root.clone();
        }
        if !self.src.is_empty() {
            config.project.product_source_paths = self.src.clone();
        }
        if !self.test.is_empty() {
            config.project.test_source_paths = self.test.clone();
        }
        if !self.cp.is_empty() {
            config.project.class_paths = self.cp.clone();
        }
        if let Some(v) = self.headcount {
            config.headcount = v;
        }
        if let Some(v) = self.max_generation {
            config.max_generation = v;
        }
        if let Some(v) = self.time_limit {
            config.time_limit_secs = v;
        }
        if let Some(v) = self.seed {
            config.random_seed = v;
        }
        if let Some(v) = self.required_solutions {
            config.required_solutions = v;
        }
        if let Some(v) = self.mutation_count {
            config.mutation_generating_count = v;
        }
        if let Some(v) = self.crossover_count {
            config.crossover_generating_count = v;
        }
        if let Some(v) = self.test_time_limit {
            config.test_time_limit_secs = v;
        }
        if let Some(v) = self.parallelism {
            config.parallelism = v;
        }
        if let Some(dir) = &self.out_dir {
            config.out_dir = dir.clone();
        }
        if self.no_output {
            config.need_not_output = true;
        }
    }
}
