//! Process inspection and control port.
//!
//! Abstracts the operating-system process table so the guard can be driven
//! by a fake in tests and by native APIs in production.

use std::path::Path;

use super::ProcessError;
use crate::domain::{Pid, ProcessSet};

/// Capability interface over the OS process table.
///
/// All methods are synchronous: the guard is sequential and every call
/// here is a single, short OS interaction.
#[cfg_attr(test, mockall::automock)]
pub trait ProcessInspector: Send + Sync {
    /// PIDs whose command line contains `pattern`.
    ///
    /// Zero matches is an empty set, not an error.
    fn list_matching(&self, pattern: &str) -> ProcessSet;

    /// Send a graceful termination request (SIGTERM or equivalent).
    fn terminate(&self, pid: Pid) -> Result<(), ProcessError>;

    /// Launch `executable` detached, with its output discarded, without waiting.
    fn spawn_detached(&self, executable: &Path) -> Result<Pid, ProcessError>;

    /// Whether `path` resolves to an executable file.
    fn is_executable(&self, path: &Path) -> bool;
}
