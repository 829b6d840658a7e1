//! Atomic lock file I/O operations.
//!
//! Format: single-line text file
//! ```text
//! <pid>
//! ```

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use wpcc_core::Pid;

/// Hex characters of the pattern digest used in lock file names.
const NAME_DIGEST_LEN: usize = 16;

/// `<sha256(pattern) prefix>.lock`, stable for a given pattern.
pub fn lock_file_name(pattern: &str) -> String {
    let digest = Sha256::digest(pattern.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{}.lock", &hex[..NAME_DIGEST_LEN])
}

/// Create the lock file holding `owner`, failing softly if it exists.
///
/// # Atomicity
/// 1. Write `<name>.<owner>.tmp`
/// 2. Hard-link it to `<name>` (fails if `<name>` exists)
/// 3. Remove the temp file
///
/// Readers therefore never observe a lock file without its PID.
///
/// Returns `Ok(false)` when the lock file already exists.
pub(super) fn create_exclusive(path: &Path, owner: Pid) -> io::Result<bool> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let temp_path = path.with_extension(format!("{owner}.tmp"));
    fs::write(&temp_path, format!("{owner}\n"))?;

    let linked = fs::hard_link(&temp_path, path);
    let _ = fs::remove_file(&temp_path);

    match linked {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e),
    }
}

/// PID recorded in the lock file, if it exists and parses.
pub(super) fn read_holder(path: &Path) -> Option<Pid> {
    let content = fs::read_to_string(path).ok()?;
    content.lines().next()?.trim().parse().ok()
}

/// Delete the lock file if it still names `expected` (idempotent).
///
/// `None` matches a missing or unparseable holder.
pub(super) fn remove_if_holder(path: &Path, expected: Option<Pid>) -> io::Result<()> {
    if read_holder(path) != expected {
        return Ok(());
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
