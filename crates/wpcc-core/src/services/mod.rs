//! Core services orchestrating the ports.

mod process_guard;

pub use process_guard::ProcessGuard;
