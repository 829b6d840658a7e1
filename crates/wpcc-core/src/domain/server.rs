//! Auxiliary server identification and process snapshots.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Operating-system process identifier.
pub type Pid = u32;

/// Fixed wait after spawning before the server is assumed ready.
pub const DEFAULT_STARTUP_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// Poll interval for readiness probes that actually poll.
pub const DEFAULT_LIVENESS_CHECK_INTERVAL: Duration = Duration::from_millis(500);

/// Number of matches at which a server counts as already running.
///
/// Two, because a shell-based `pgrep -f` sees its own pipeline as one match.
/// Inspectors that exclude themselves should configure `1`.
pub const DEFAULT_MIN_HEALTHY_MATCHES: usize = 2;

/// Static identification data for the auxiliary server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDescriptor {
    /// Executable launched when the server is absent.
    pub executable_path: PathBuf,
    /// Substring searched for in process command lines.
    pub match_pattern: String,
    /// Delay after spawning before the server is treated as ready.
    pub startup_grace_period: Duration,
    /// Interval between liveness/readiness polls.
    pub liveness_check_interval: Duration,
    /// Match count at or above which no new server is spawned.
    pub min_healthy_matches: usize,
}

impl ServerDescriptor {
    /// Describe a server by its executable; the match pattern is the path itself.
    pub fn from_executable(executable_path: impl Into<PathBuf>) -> Self {
        let executable_path = executable_path.into();
        let match_pattern = executable_path.to_string_lossy().into_owned();
        Self {
            executable_path,
            match_pattern,
            startup_grace_period: DEFAULT_STARTUP_GRACE_PERIOD,
            liveness_check_interval: DEFAULT_LIVENESS_CHECK_INTERVAL,
            min_healthy_matches: DEFAULT_MIN_HEALTHY_MATCHES,
        }
    }

    /// Override the command-line match pattern.
    #[must_use]
    pub fn with_match_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.match_pattern = pattern.into();
        self
    }

    /// Set the post-spawn grace period.
    #[must_use]
    pub const fn with_startup_grace_period(mut self, grace: Duration) -> Self {
        self.startup_grace_period = grace;
        self
    }

    /// Set the liveness poll interval.
    #[must_use]
    pub const fn with_liveness_check_interval(mut self, interval: Duration) -> Self {
        self.liveness_check_interval = interval;
        self
    }

    /// Set the healthy match threshold (clamped to at least 1).
    #[must_use]
    pub fn with_min_healthy_matches(mut self, count: usize) -> Self {
        self.min_healthy_matches = count.max(1);
        self
    }

    pub fn executable_path(&self) -> &Path {
        &self.executable_path
    }

    /// Whether a snapshot counts as "server already running".
    pub fn is_healthy(&self, running: &ProcessSet) -> bool {
        running.len() >= self.min_healthy_matches
    }
}

/// PIDs matching a descriptor at one point in time.
///
/// Always recomputed; never cached across guard calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSet {
    pids: Vec<Pid>,
}

impl ProcessSet {
    /// Build a set, sorting and de-duplicating the PIDs.
    pub fn new(mut pids: Vec<Pid>) -> Self {
        pids.sort_unstable();
        pids.dedup();
        Self { pids }
    }

    pub const fn empty() -> Self {
        Self { pids: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.pids.binary_search(&pid).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.pids.iter().copied()
    }

    pub fn as_slice(&self) -> &[Pid] {
        &self.pids
    }
}

impl FromIterator<Pid> for ProcessSet {
    fn from_iter<I: IntoIterator<Item = Pid>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_pattern_defaults_to_executable_path() {
        let descriptor = ServerDescriptor::from_executable("/srv/node_modules/selenium-server/bin/selenium");
        assert_eq!(
            descriptor.match_pattern,
            "/srv/node_modules/selenium-server/bin/selenium"
        );
        assert_eq!(descriptor.startup_grace_period, Duration::from_secs(2));
        assert_eq!(descriptor.min_healthy_matches, 2);
    }

    #[test]
    fn healthy_threshold_is_inclusive() {
        let descriptor = ServerDescriptor::from_executable("/bin/selenium");
        assert!(!descriptor.is_healthy(&ProcessSet::empty()));
        assert!(!descriptor.is_healthy(&ProcessSet::new(vec![10])));
        assert!(descriptor.is_healthy(&ProcessSet::new(vec![10, 11])));

        let single = descriptor.with_min_healthy_matches(1);
        assert!(single.is_healthy(&ProcessSet::new(vec![10])));
    }

    #[test]
    fn zero_threshold_is_clamped() {
        let descriptor = ServerDescriptor::from_executable("/bin/selenium").with_min_healthy_matches(0);
        assert_eq!(descriptor.min_healthy_matches, 1);
        assert!(!descriptor.is_healthy(&ProcessSet::empty()));
    }

    #[test]
    fn process_set_is_sorted_and_unique() {
        let set: ProcessSet = [42, 7, 42, 13].into_iter().collect();
        assert_eq!(set.as_slice(), &[7, 13, 42]);
        assert!(set.contains(13));
        assert!(!set.contains(8));
    }
}
