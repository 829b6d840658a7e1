//! Native process-table access backing the `ProcessInspector` port.
//!
//! # Structure
//!
//! - `SystemProcessInspector` - command-line matching, detached spawn, termination
//! - `terminate_pid` - single SIGTERM, no escalation
//! - `pid_exists` / `is_executable` - cheap existence checks

mod inspector;
mod terminate;
mod verify;

pub use inspector::SystemProcessInspector;
pub use terminate::terminate_pid;
pub use verify::{is_executable, pid_exists};
