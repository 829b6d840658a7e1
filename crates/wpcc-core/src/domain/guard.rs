//! Guard configuration and lifecycle outcomes.

use std::path::{Path, PathBuf};

use super::server::{Pid, ProcessSet, ServerDescriptor};

/// When the guard stops the server after the task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopPolicy {
    /// Stop every matching process, including servers found already running.
    #[default]
    Always,
    /// Stop only when this invocation spawned the server.
    OnlyIfStartedByUs,
}

/// Per-invocation guard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Leave the server running after the task completes.
    pub keep_alive: bool,
    pub stop_policy: StopPolicy,
    pub descriptor: ServerDescriptor,
}

impl GuardConfig {
    /// Configuration for the server at `executable_path` with default timing.
    pub fn new(executable_path: impl Into<PathBuf>) -> Self {
        Self::with_descriptor(ServerDescriptor::from_executable(executable_path))
    }

    pub const fn with_descriptor(descriptor: ServerDescriptor) -> Self {
        Self {
            keep_alive: false,
            stop_policy: StopPolicy::Always,
            descriptor,
        }
    }

    #[must_use]
    pub const fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    #[must_use]
    pub const fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }

    pub fn executable_path(&self) -> &Path {
        self.descriptor.executable_path()
    }

    /// Whether the stop step runs for the given start outcome.
    ///
    /// `None` means the start phase failed after possibly spawning, which is
    /// treated as "started by us".
    pub fn should_stop(&self, outcome: Option<&StartOutcome>) -> bool {
        if self.keep_alive {
            return false;
        }
        match self.stop_policy {
            StopPolicy::Always => true,
            StopPolicy::OnlyIfStartedByUs => outcome.is_none_or(StartOutcome::started_by_us),
        }
    }
}

/// Result of `ensure_started`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Enough matching processes were found; nothing was spawned.
    AlreadyRunning(ProcessSet),
    /// A new server was spawned and the readiness wait completed.
    Started { pid: Pid },
}

impl StartOutcome {
    pub const fn started_by_us(&self) -> bool {
        matches!(self, Self::Started { .. })
    }
}

/// What `ensure_stopped` did. Informational only; never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopReport {
    /// PIDs a termination signal was delivered to.
    pub signalled: Vec<Pid>,
    /// PIDs whose termination attempt failed.
    pub failed: Vec<Pid>,
}

impl StopReport {
    pub fn attempted(&self) -> usize {
        self.signalled.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_alive_never_stops() {
        let config = GuardConfig::new("/bin/selenium").with_keep_alive(true);
        assert!(!config.should_stop(None));
        assert!(!config.should_stop(Some(&StartOutcome::Started { pid: 1 })));
    }

    #[test]
    fn always_policy_stops_servers_found_running() {
        let config = GuardConfig::new("/bin/selenium");
        let found = StartOutcome::AlreadyRunning(ProcessSet::new(vec![5, 6]));
        assert!(config.should_stop(Some(&found)));
    }

    #[test]
    fn ownership_policy_spares_foreign_servers() {
        let config = GuardConfig::new("/bin/selenium").with_stop_policy(StopPolicy::OnlyIfStartedByUs);
        let found = StartOutcome::AlreadyRunning(ProcessSet::new(vec![5, 6]));
        assert!(!config.should_stop(Some(&found)));
        assert!(config.should_stop(Some(&StartOutcome::Started { pid: 9 })));
        assert!(config.should_stop(None));
    }
}
