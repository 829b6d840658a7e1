//! Path utilities for wpcc data directories and project executables.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - Project-relative defaults mirror a WordPress plugin checkout with
//!   `npm` and `composer` dependencies installed

mod error;
mod project;

pub use error::PathError;
pub use project::{codecept_executable, selenium_executable};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the root directory for wpcc's own state (locks).
///
/// Resolution order:
/// 1. `WPCC_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/wpcc`)
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var("WPCC_DATA_DIR") {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("wpcc"))
}

/// Directory holding guard lock files, created on demand.
pub fn locks_dir() -> Result<PathBuf, PathError> {
    locks_dir_in(&data_root()?)
}

/// `locks/` under an explicit data root, created on demand.
pub fn locks_dir_in(root: &Path) -> Result<PathBuf, PathError> {
    let dir = root.join("locks");
    fs::create_dir_all(&dir).map_err(|e| PathError::CreateFailed {
        path: dir.clone(),
        reason: e.to_string(),
    })?;
    Ok(dir)
}
