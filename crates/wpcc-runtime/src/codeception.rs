//! Delegated task: a `codecept run` child process.
//!
//! Output is inherited so the test report reaches the terminal untouched;
//! the exit code is returned for the CLI to propagate.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};
use wpcc_core::RunArgs;

use crate::process::is_executable;

/// Failures launching Codeception (test failures are an exit code, not an error).
#[derive(Debug, Error)]
pub enum CodeceptionError {
    #[error("Codeception executable not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to launch Codeception: {0}")]
    Launch(#[source] std::io::Error),
}

/// Runs Codeception from a project root.
#[derive(Debug, Clone)]
pub struct CodeceptionRunner {
    executable: PathBuf,
    working_dir: PathBuf,
}

impl CodeceptionRunner {
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            working_dir: working_dir.into(),
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Fail early, before any server is started, when Codeception is missing.
    pub fn ensure_available(&self) -> Result<(), CodeceptionError> {
        if is_executable(&self.executable) {
            Ok(())
        } else {
            Err(CodeceptionError::NotFound {
                path: self.executable.clone(),
            })
        }
    }

    /// Build the command; argv comes only from `args`.
    pub fn command(&self, args: &RunArgs) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(args.to_argv())
            .current_dir(&self.working_dir)
            .kill_on_drop(true);
        command
    }

    /// Run to completion and return Codeception's exit code.
    ///
    /// A child killed by a signal reports `128 + signal`, as shells do.
    pub async fn run(&self, args: &RunArgs) -> Result<i32, CodeceptionError> {
        self.ensure_available()?;

        let argv = args.to_argv();
        info!(
            executable = %self.executable.display(),
            args = ?argv,
            "Running Codeception"
        );

        let status = self
            .command(args)
            .status()
            .await
            .map_err(CodeceptionError::Launch)?;

        let code = exit_code(status);
        debug!(code, "Codeception finished");
        Ok(code)
    }
}

fn exit_code(status: std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status.signal().map_or(1, |sig| 128 + sig)
    }

    #[cfg(not(unix))]
    {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_uses_only_typed_args() {
        let runner = CodeceptionRunner::new("/srv/wp/vendor/bin/codecept", "/srv/wp");
        let args = RunArgs::new(Some("acceptance".into()), None, true, false).unwrap();

        let command = runner.command(&args);
        let std_command = command.as_std();

        let argv: Vec<_> = std_command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(argv, vec!["run", "acceptance", "--steps"]);
        assert_eq!(std_command.get_current_dir(), Some(Path::new("/srv/wp")));
    }

    #[tokio::test]
    async fn missing_codecept_is_reported() {
        let runner = CodeceptionRunner::new("/nonexistent/vendor/bin/codecept", "/");

        let err = runner.run(&RunArgs::default()).await.unwrap_err();

        assert!(matches!(err, CodeceptionError::NotFound { .. }));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn exit_code_and_argv_reach_the_child() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("codecept");
        std::fs::write(&script, "#!/bin/sh\necho \"$@\" > args.txt\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        let runner = CodeceptionRunner::new(&script, dir.path());
        let args = RunArgs::new(
            Some("acceptance".into()),
            Some("LoginCest".into()),
            false,
            true,
        )
        .unwrap();

        let code = runner.run(&args).await.unwrap();

        assert_eq!(code, 3);
        let recorded = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert_eq!(recorded.trim(), "run acceptance LoginCest --debug");
    }
}
