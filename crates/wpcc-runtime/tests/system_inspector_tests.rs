//! `SystemProcessInspector` against real processes.
//!
//! Each test gets its own fake server script in a temp dir, so the match
//! pattern is unique per test and parallel runs do not see each other.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wpcc_core::{GuardConfig, ProcessGuard, ProcessInspector, ServerDescriptor, StartOutcome};
use wpcc_runtime::{SystemProcessInspector, pid_exists};

fn fake_server() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake-selenium");
    fs::write(&path, "#!/bin/sh\nsleep 30\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    (dir, path)
}

/// Poll `list_matching` until `done` holds or a few seconds pass.
async fn wait_for(
    inspector: &SystemProcessInspector,
    pattern: &str,
    done: impl Fn(&[u32]) -> bool,
) -> Vec<u32> {
    for _ in 0..100 {
        let pids = inspector.list_matching(pattern).as_slice().to_vec();
        if done(&pids) {
            return pids;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    inspector.list_matching(pattern).as_slice().to_vec()
}

#[tokio::test]
async fn spawned_server_is_listed_then_terminated() {
    let (_dir, path) = fake_server();
    let pattern = path.to_string_lossy().into_owned();
    let inspector = SystemProcessInspector::new();

    let pid = inspector.spawn_detached(&path).unwrap();

    let listed = wait_for(&inspector, &pattern, |pids| pids.contains(&pid)).await;
    assert_eq!(listed, vec![pid]);

    inspector.terminate(pid).unwrap();

    let remaining = wait_for(&inspector, &pattern, <[u32]>::is_empty).await;
    assert!(remaining.is_empty());
    assert!(wait_for_exit(pid).await);
}

#[tokio::test]
async fn terminating_a_gone_process_is_not_an_error() {
    let (_dir, path) = fake_server();
    let pattern = path.to_string_lossy().into_owned();
    let inspector = SystemProcessInspector::new();
    let pid = inspector.spawn_detached(&path).unwrap();
    inspector.terminate(pid).unwrap();
    wait_for(&inspector, &pattern, <[u32]>::is_empty).await;
    assert!(wait_for_exit(pid).await);

    assert!(inspector.terminate(pid).is_ok());
}

#[tokio::test]
async fn guard_starts_and_stops_a_real_server() {
    let (_dir, path) = fake_server();
    let pattern = path.to_string_lossy().into_owned();
    let inspector = Arc::new(SystemProcessInspector::new());
    let guard = ProcessGuard::with_fixed_delay(inspector.clone());
    let descriptor = ServerDescriptor::from_executable(&path)
        .with_startup_grace_period(Duration::from_millis(200))
        .with_min_healthy_matches(1);
    let config = GuardConfig::with_descriptor(descriptor);

    let seen_during_task = guard
        .run_with_guarded_server(&config, &CancellationToken::new(), || async {
            Ok::<_, std::convert::Infallible>(inspector.list_matching(&pattern).len())
        })
        .await
        .unwrap();

    assert_eq!(seen_during_task, 1);
    let remaining = wait_for(&inspector, &pattern, <[u32]>::is_empty).await;
    assert!(remaining.is_empty());
}

#[tokio::test]
async fn running_server_is_reused() {
    let (_dir, path) = fake_server();
    let pattern = path.to_string_lossy().into_owned();
    let inspector = Arc::new(SystemProcessInspector::new());
    let existing = inspector.spawn_detached(&path).unwrap();
    wait_for(&inspector, &pattern, |pids| pids.contains(&existing)).await;
    let guard = ProcessGuard::with_fixed_delay(inspector.clone());
    let descriptor = ServerDescriptor::from_executable(&path).with_min_healthy_matches(1);

    let outcome = guard
        .ensure_started(&descriptor, &CancellationToken::new())
        .await
        .unwrap();

    assert!(matches!(outcome, StartOutcome::AlreadyRunning(ref pids) if pids.contains(existing)));
    guard.ensure_stopped(&descriptor);
    assert!(wait_for(&inspector, &pattern, <[u32]>::is_empty).await.is_empty());
}

/// A terminated child may linger briefly before the reaper collects it.
async fn wait_for_exit(pid: u32) -> bool {
    for _ in 0..100 {
        if !pid_exists(pid) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
