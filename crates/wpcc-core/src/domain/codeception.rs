//! Typed arguments for the delegated Codeception run.

use thiserror::Error;

/// Errors building a Codeception argument list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunArgsError {
    #[error("a test name requires a suite")]
    TestWithoutSuite,

    #[error("{what} cannot be empty")]
    Empty { what: &'static str },
}

/// Arguments forwarded to `codecept run`.
///
/// The argument vector is always built from these fields; nothing from the
/// process's own argv is passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Suite to run; all suites when `None`.
    pub suite: Option<String>,
    /// Single test within the suite.
    pub test: Option<String>,
    /// Show test steps.
    pub steps: bool,
    /// Show debug and scenario output.
    pub debug: bool,
}

impl RunArgs {
    pub fn new(
        suite: Option<String>,
        test: Option<String>,
        steps: bool,
        debug: bool,
    ) -> Result<Self, RunArgsError> {
        if suite.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(RunArgsError::Empty { what: "suite" });
        }
        if test.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(RunArgsError::Empty { what: "test" });
        }
        if test.is_some() && suite.is_none() {
            return Err(RunArgsError::TestWithoutSuite);
        }
        Ok(Self {
            suite,
            test,
            steps,
            debug,
        })
    }

    /// `codecept` argv, starting with the `run` subcommand.
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = vec!["run".to_string()];
        argv.extend(self.suite.iter().cloned());
        argv.extend(self.test.iter().cloned());
        if self.steps {
            argv.push("--steps".to_string());
        }
        if self.debug {
            argv.push("--debug".to_string());
        }
        argv
    }
}
