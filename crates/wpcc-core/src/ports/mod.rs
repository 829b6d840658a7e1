//! Port definitions (trait abstractions) for the guard's external systems.
//!
//! Ports define the interfaces the guard expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sysinfo`/`nix` types in any signature
//! - Process access is intent-based: list, terminate, spawn
//! - Readiness is pluggable so the fixed delay can be swapped for a real probe

pub mod process_inspector;
pub mod readiness;

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::Pid;

pub use process_inspector::ProcessInspector;
pub use readiness::{FixedDelay, ReadinessProbe};

#[cfg(test)]
pub use process_inspector::MockProcessInspector;

/// Errors reported by a `ProcessInspector` implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    /// The OS refused to start the executable.
    #[error("Failed to spawn: {0}")]
    SpawnFailed(String),

    /// Delivering a termination signal failed.
    #[error("Failed to signal PID {pid}: {reason}")]
    SignalFailed { pid: Pid, reason: String },

    /// Operation not available on this platform.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Failures of the guard itself, as opposed to the guarded task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardError {
    /// The server executable is missing or not executable. Nothing was spawned.
    #[error("Server executable not found: {}", path.display())]
    ExecutableNotFound { path: PathBuf },

    /// Spawning the server failed. No retry is attempted.
    #[error("Failed to start server {}: {reason}", path.display())]
    SpawnFailed { path: PathBuf, reason: String },

    /// The server was spawned but never reported ready.
    #[error("Server did not become ready: {reason}")]
    NotReady { reason: String },

    /// The caller cancelled the run.
    #[error("Cancelled")]
    Cancelled,
}

impl GuardError {
    /// Whether the failure happened after a server may have been spawned,
    /// so the stop step still applies.
    pub const fn requires_cleanup(&self) -> bool {
        matches!(self, Self::NotReady { .. } | Self::Cancelled)
    }
}

/// Outcome error of `ProcessGuard::run_with_guarded_server`.
///
/// Task errors pass through verbatim; guard errors (including cancellation)
/// stay distinguishable from them.
#[derive(Debug, Error)]
pub enum GuardedRunError<E> {
    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("{0}")]
    Task(E),
}

impl<E> GuardedRunError<E> {
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Guard(GuardError::Cancelled))
    }
}
