//! CLI-specific error types and mappings.
//!
//! This module provides the error type for the CLI adapter and mappings
//! from library errors to exit codes and user-facing messages.

use std::process::ExitCode;

use thiserror::Error;
use wpcc_core::{GuardError, GuardedRunError, PathError, RunArgsError};
use wpcc_runtime::{CodeceptionError, LockError};

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// A required executable or service is not available.
    #[error("{0}")]
    Unavailable(String),

    /// Process execution error.
    #[error("Process error: {0}")]
    Process(String),

    /// Another run holds the guard lock.
    #[error("{0}")]
    Busy(String),

    /// IO error (lock files, data directory).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interrupted by the user.
    #[error("Interrupted")]
    Cancelled,
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Specific error categories (see sysexits.h)
    /// - 130: Terminated by Ctrl-C
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) => 2,
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Process(_) => 71,     // EX_OSERR
            Self::Io(_) => 74,          // EX_IOERR
            Self::Busy(_) => 75,        // EX_TEMPFAIL
            Self::Config(_) => 78,      // EX_CONFIG
            Self::Cancelled => 130,
        }
    }
}

/// Process exit status for a raw exit code; out-of-range codes become 1.
pub fn exit_status(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

impl From<GuardError> for CliError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::ExecutableNotFound { .. } | GuardError::NotReady { .. } => {
                Self::Unavailable(err.to_string())
            }
            GuardError::SpawnFailed { .. } => Self::Process(err.to_string()),
            GuardError::Cancelled => Self::Cancelled,
        }
    }
}

impl From<CodeceptionError> for CliError {
    fn from(err: CodeceptionError) -> Self {
        match err {
            CodeceptionError::NotFound { .. } => Self::Unavailable(err.to_string()),
            CodeceptionError::Launch(_) => Self::Process(err.to_string()),
        }
    }
}

impl From<GuardedRunError<CodeceptionError>> for CliError {
    fn from(err: GuardedRunError<CodeceptionError>) -> Self {
        match err {
            GuardedRunError::Guard(guard) => guard.into(),
            GuardedRunError::Task(task) => task.into(),
        }
    }
}

impl From<LockError> for CliError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::Busy { .. } => Self::Busy(err.to_string()),
            LockError::Cancelled => Self::Cancelled,
            LockError::Io { .. } => Self::Io(err.to_string()),
            LockError::Path(path) => path.into(),
        }
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::CreateFailed { .. } => Self::Io(err.to_string()),
            PathError::NoDataDir | PathError::CurrentDirError(_) => Self::Config(err.to_string()),
        }
    }
}

impl From<RunArgsError> for CliError {
    fn from(err: RunArgsError) -> Self {
        Self::Arguments(err.to_string())
    }
}
