//! Graceful termination of a process by PID (no `Child` handle available).

use wpcc_core::{Pid, ProcessError};

#[cfg(unix)]
use nix::errno::Errno;
#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid as NixPid;

/// Send SIGTERM to `pid`.
///
/// A single request with no SIGKILL escalation and no wait for exit; the
/// server is expected to shut itself down. A process that is already gone
/// counts as success.
///
/// PID 0 is rejected: `kill(0, ...)` would signal our own process group.
pub fn terminate_pid(pid: Pid) -> Result<(), ProcessError> {
    if pid == 0 {
        return Err(ProcessError::SignalFailed {
            pid,
            reason: "refusing to signal PID 0".to_string(),
        });
    }

    #[cfg(unix)]
    {
        terminate_pid_unix(pid)
    }

    #[cfg(not(unix))]
    {
        Err(ProcessError::Unsupported(
            "graceful termination is not implemented on this platform".to_string(),
        ))
    }
}

#[cfg(unix)]
fn terminate_pid_unix(pid: Pid) -> Result<(), ProcessError> {
    let raw = i32::try_from(pid).map_err(|_| ProcessError::SignalFailed {
        pid,
        reason: "PID out of range".to_string(),
    })?;

    match signal::kill(NixPid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(ProcessError::SignalFailed {
            pid,
            reason: e.to_string(),
        }),
    }
}
