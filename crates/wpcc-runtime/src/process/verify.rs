//! Existence checks for PIDs and executables.

use std::path::Path;

use wpcc_core::Pid;

/// Check if a PID exists (without verifying what it runs).
///
/// Uses `kill` with the null signal, which checks permission to signal
/// without delivering anything.
#[cfg(unix)]
pub fn pid_exists(pid: Pid) -> bool {
    use nix::sys::signal;
    use nix::unistd::Pid as NixPid;

    let Ok(raw) = i32::try_from(pid) else {
        return false;
    };
    if raw == 0 {
        return false;
    }

    match signal::kill(NixPid::from_raw(raw), None) {
        Ok(()) => true,
        Err(nix::errno::Errno::ESRCH) => false, // No such process
        Err(_) => true,                         // Process exists but we lack permission
    }
}

#[cfg(not(unix))]
pub fn pid_exists(_pid: Pid) -> bool {
    false // Not implemented on non-Unix
}

/// Whether `path` is a regular file the current user could execute.
///
/// On Unix any execute bit (owner, group, or other) counts; elsewhere
/// existence of a file is enough.
pub fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}
