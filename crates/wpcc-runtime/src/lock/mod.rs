//! Advisory lock serializing guard invocations for one server.
//!
//! Two concurrent `wpcc run` invocations against the same server would
//! otherwise race: both see "not running" and spawn, or one stops the server
//! while the other is still testing. Holding this lock for the whole run
//! serializes them.
//!
//! # Safety guarantees
//! - Atomic acquisition via temp file + hard link (fails if the lock exists)
//! - The lock file records the holder's PID; locks held by dead PIDs are reclaimed
//! - Release only removes the file if it still names this process

mod io;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use wpcc_core::{PathError, Pid};

use crate::process::pid_exists;

pub use io::lock_file_name;

/// Interval between acquisition attempts while another run holds the lock.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors acquiring the guard lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another live process kept the lock past the wait budget.
    #[error("Another wpcc run (PID {holder}) is using {pattern}")]
    Busy { holder: Pid, pattern: String },

    /// Cancelled while waiting for the lock.
    #[error("Cancelled while waiting for the lock")]
    Cancelled,

    #[error("Lock file error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Result of a single, non-blocking acquisition attempt.
#[derive(Debug)]
pub enum LockAttempt {
    Acquired(GuardLock),
    Held { holder: Pid },
}

/// Held advisory lock; released on drop.
#[derive(Debug)]
pub struct GuardLock {
    path: PathBuf,
    owner: Pid,
}

impl GuardLock {
    /// Lock file location for `pattern` inside `dir`.
    pub fn lock_path(dir: &Path, pattern: &str) -> PathBuf {
        dir.join(lock_file_name(pattern))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Try once to take the lock for `pattern`.
    ///
    /// A lock whose recorded holder is no longer alive (or unreadable) is
    /// removed and the attempt repeated once.
    pub fn try_acquire(dir: &Path, pattern: &str) -> Result<LockAttempt, LockError> {
        let path = Self::lock_path(dir, pattern);
        let owner = std::process::id();

        for _ in 0..2 {
            match io::create_exclusive(&path, owner) {
                Ok(true) => {
                    debug!(path = %path.display(), "Acquired guard lock");
                    return Ok(LockAttempt::Acquired(Self { path, owner }));
                }
                Ok(false) => {}
                Err(source) => return Err(LockError::Io { path, source }),
            }

            let holder = io::read_holder(&path);
            match holder {
                Some(pid) if pid == owner || pid_exists(pid) => {
                    return Ok(LockAttempt::Held { holder: pid });
                }
                _ => {
                    warn!(
                        path = %path.display(),
                        holder = ?holder,
                        "Removing stale guard lock"
                    );
                    io::remove_if_holder(&path, holder)
                        .map_err(|source| LockError::Io {
                            path: path.clone(),
                            source,
                        })?;
                }
            }
        }

        // Lost a race with another process reclaiming the same stale lock.
        let holder = io::read_holder(&path).unwrap_or(0);
        Ok(LockAttempt::Held { holder })
    }

    /// Take the lock, waiting up to `wait` for a live holder to finish.
    pub async fn acquire(
        dir: &Path,
        pattern: &str,
        wait: Duration,
        cancel: &CancellationToken,
    ) -> Result<Self, LockError> {
        let deadline = Instant::now() + wait;
        let mut announced = false;

        loop {
            let holder = match Self::try_acquire(dir, pattern)? {
                LockAttempt::Acquired(lock) => return Ok(lock),
                LockAttempt::Held { holder } => holder,
            };

            if Instant::now() >= deadline {
                return Err(LockError::Busy {
                    holder,
                    pattern: pattern.to_string(),
                });
            }
            if !announced {
                info!(holder, "Waiting for another wpcc run to finish");
                announced = true;
            }

            tokio::select! {
                () = cancel.cancelled() => return Err(LockError::Cancelled),
                () = sleep(POLL_INTERVAL) => {}
            }
        }
    }
}

impl Drop for GuardLock {
    fn drop(&mut self) {
        match io::remove_if_holder(&self.path, Some(self.owner)) {
            Ok(()) => debug!(path = %self.path.display(), "Released guard lock"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to release guard lock"),
        }
    }
}
