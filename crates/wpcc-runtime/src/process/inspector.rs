//! `ProcessInspector` backed by the native process table.

use std::collections::HashSet;
use std::path::Path;
use std::process::{Command, Stdio};

use sysinfo::{Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::{debug, warn};
use wpcc_core::{Pid, ProcessError, ProcessInspector, ProcessSet};

use super::terminate::terminate_pid;
use super::verify::is_executable;

/// Process inspector using OS process enumeration instead of `pgrep`.
///
/// Matching is a plain substring test against the process's full command
/// line (arguments joined by single spaces), the same contract as
/// `pgrep -f`. Threads, processes with no visible command line, and the
/// current process together with its ancestors are never reported, so the
/// tool's own invocation (which usually mentions the executable path) does
/// not count as a running server.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessInspector;

impl SystemProcessInspector {
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessInspector for SystemProcessInspector {
    fn list_matching(&self, pattern: &str) -> ProcessSet {
        if pattern.is_empty() {
            return ProcessSet::empty();
        }

        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
        );
        let excluded = own_lineage(&system);

        system
            .processes()
            .iter()
            .filter(|(pid, process)| process.thread_kind().is_none() && !excluded.contains(*pid))
            .filter(|(_, process)| command_line(process).is_some_and(|cmd| cmd.contains(pattern)))
            .map(|(pid, _)| pid.as_u32())
            .collect()
    }

    fn terminate(&self, pid: Pid) -> Result<(), ProcessError> {
        terminate_pid(pid)
    }

    fn spawn_detached(&self, executable: &Path) -> Result<Pid, ProcessError> {
        let mut command = Command::new(executable);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // Own process group: a Ctrl-C aimed at wpcc must not hit the server.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }

        let mut child = command
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(e.to_string()))?;
        let pid = child.id();

        // Reap on exit so a terminated server does not linger as a zombie
        // that still answers to `kill(pid, 0)`.
        let reaper = std::thread::Builder::new()
            .name(format!("wpcc-reaper-{pid}"))
            .spawn(move || {
                let _ = child.wait();
            });
        if let Err(e) = reaper {
            warn!(pid, error = %e, "Could not start reaper thread");
        }

        debug!(pid, path = %executable.display(), "Spawned detached process");
        Ok(pid)
    }

    fn is_executable(&self, path: &Path) -> bool {
        is_executable(path)
    }
}

/// Full command line, or `None` for processes that expose none
/// (kernel threads, zombies, processes we may not inspect).
fn command_line(process: &Process) -> Option<String> {
    let cmd = process.cmd();
    if cmd.is_empty() {
        return None;
    }
    Some(
        cmd.iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// The current process and every ancestor visible in `system`.
fn own_lineage(system: &System) -> HashSet<sysinfo::Pid> {
    let mut lineage = HashSet::new();
    let mut current = sysinfo::get_current_pid().ok();

    while let Some(pid) = current {
        if !lineage.insert(pid) {
            break;
        }
        current = system.process(pid).and_then(Process::parent);
    }

    lineage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_matches_nothing() {
        assert!(SystemProcessInspector::new().list_matching("").is_empty());
    }

    #[test]
    fn current_process_is_never_reported() {
        let exe = std::env::current_exe().unwrap();
        let pattern = exe.to_string_lossy();

        let matches = SystemProcessInspector::new().list_matching(&pattern);

        assert!(!matches.contains(std::process::id()));
    }

    #[test]
    fn own_lineage_contains_self() {
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let lineage = own_lineage(&system);

        assert!(lineage.contains(&sysinfo::Pid::from_u32(std::process::id())));
    }

    #[test]
    fn spawn_of_missing_executable_fails() {
        let err = SystemProcessInspector::new()
            .spawn_detached(Path::new("/nonexistent/selenium"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::SpawnFailed(_)));
    }
}
