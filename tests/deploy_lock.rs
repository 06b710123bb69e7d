// ABOUTME: Integration tests for deploy lock acquisition and release.
// ABOUTME: Exercises conflict, stale-break, and force-break behavior on disk.

use caravel::pipeline::{DeployLock, LockError, LockInfo};
use caravel::types::ServiceName;
use chrono::Utc;

fn service() -> ServiceName {
    ServiceName::new("estate-genius").unwrap()
}

#[test]
fn acquire_creates_and_release_removes_lock_file() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join("estate-genius.lock");

    let lock = DeployLock::acquire_at(dir.path(), &service(), false).unwrap();
    assert!(lock_path.exists());

    let contents = std::fs::read_to_string(&lock_path).unwrap();
    let info: LockInfo = serde_json::from_str(&contents).unwrap();
    assert_eq!(info.service, "estate-genius");
    assert_eq!(info.pid, std::process::id());

    lock.release().unwrap();
    assert!(!lock_path.exists());
}

#[test]
fn second_acquire_fails_while_held() {
    let dir = tempfile::tempdir().unwrap();

    let _lock = DeployLock::acquire_at(dir.path(), &service(), false).unwrap();
    let err = DeployLock::acquire_at(dir.path(), &service(), false).unwrap_err();

    match err {
        LockError::Held { pid, .. } => assert_eq!(pid, std::process::id()),
        other => panic!("expected Held, got {other:?}"),
    }
}

#[test]
fn locks_are_scoped_per_service() {
    let dir = tempfile::tempdir().unwrap();
    let other = ServiceName::new("other-app").unwrap();

    let _a = DeployLock::acquire_at(dir.path(), &service(), false).unwrap();
    // A different service is not blocked.
    DeployLock::acquire_at(dir.path(), &other, false).unwrap();
}

#[test]
fn stale_lock_is_broken_automatically() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join("estate-genius.lock");

    let mut info = LockInfo::new(&service());
    info.started_at = Utc::now() - chrono::Duration::hours(2);
    std::fs::write(&lock_path, serde_json::to_string(&info).unwrap()).unwrap();

    DeployLock::acquire_at(dir.path(), &service(), false)
        .expect("stale lock should be broken");
}

#[test]
fn force_breaks_a_fresh_lock() {
    let dir = tempfile::tempdir().unwrap();

    let _held = DeployLock::acquire_at(dir.path(), &service(), false).unwrap();
    DeployLock::acquire_at(dir.path(), &service(), true)
        .expect("force should break the lock");
}

#[test]
fn corrupted_lock_info_is_broken() {
    let dir = tempfile::tempdir().unwrap();
    let lock_path = dir.path().join("estate-genius.lock");
    std::fs::write(&lock_path, "not json").unwrap();

    DeployLock::acquire_at(dir.path(), &service(), false)
        .expect("corrupted lock should be broken");
}
