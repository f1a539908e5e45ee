/// Errors raised while staging or interpreting a test run.
///
/// These never escape an evaluation: the executor turns them into failing
/// test results.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("test runner command is empty")]
    EmptyCommand,

    #[error("failed to launch test runner: {0}")]
    Launch(String),

    #[error("test staging i/o error: {0}")]
    Io(String),

    #[error("invalid test report for {test}: {message}")]
    Report { test: String, message: String },

    #[error("test {test} timed out after {secs}s")]
    Timeout { test: String, secs: u64 },
}
