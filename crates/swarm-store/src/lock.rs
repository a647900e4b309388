// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-process advisory lock implemented by atomic directory creation
//! (spec.md §4.A, REDESIGN FLAGS "advisory locking without kernel flock").
//!
//! `std::fs::create_dir` on a well-known `.lock` subdirectory is atomic on
//! every platform we target, so "does the lock exist" and "did I just
//! create it" collapse into one syscall — no separate existence check that
//! could race. A lock older than `STALE_AFTER` is considered abandoned by a
//! crashed writer and stolen; a lock still held after `FORCE_STEAL_CYCLES`
//! poll cycles is force-stolen regardless of age, bounding worst-case wait.

use crate::error::StoreError;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const STALE_AFTER: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);
const FORCE_STEAL_CYCLES: u32 = 200; // ~2s at 10ms poll

/// Held while a writer owns the lock; removes the lock directory on drop.
pub struct LockGuard {
    lock_dir: PathBuf,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.lock_dir);
    }
}

fn meta_path(lock_dir: &Path) -> PathBuf {
    lock_dir.join("lock.meta")
}

fn write_meta(lock_dir: &Path) -> std::io::Result<()> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    let pid = std::process::id();
    std::fs::write(meta_path(lock_dir), format!("{pid}\n{now}\n"))
}

/// Returns the acquisition instant recorded in `lock.meta`, if readable.
fn read_acquired_at(lock_dir: &Path) -> Option<u64> {
    let content = std::fs::read_to_string(meta_path(lock_dir)).ok()?;
    content.lines().nth(1)?.trim().parse().ok()
}

fn is_stale(lock_dir: &Path) -> bool {
    let Some(acquired_at) = read_acquired_at(lock_dir) else {
        // No readable metadata at all: treat as stale (writer likely
        // crashed between mkdir and writing lock.meta).
        return true;
    };
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    now.saturating_sub(acquired_at) >= STALE_AFTER.as_secs()
}

/// Acquire the lock directory, blocking (via short polls) until either the
/// directory is successfully created or it is stolen from a stale/stuck
/// holder.
pub fn acquire(lock_dir: &Path) -> Result<LockGuard, StoreError> {
    if let Some(parent) = lock_dir.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cycles: u32 = 0;
    loop {
        match std::fs::create_dir(lock_dir) {
            Ok(()) => {
                write_meta(lock_dir)?;
                return Ok(LockGuard { lock_dir: lock_dir.to_path_buf() });
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                cycles += 1;
                if is_stale(lock_dir) {
                    tracing::warn!(path = %lock_dir.display(), "stealing stale lock");
                    let _ = std::fs::remove_dir_all(lock_dir);
                    continue;
                }
                if cycles >= FORCE_STEAL_CYCLES {
                    tracing::warn!(
                        path = %lock_dir.display(),
                        cycles,
                        "force-stealing lock held through contention ceiling"
                    );
                    let _ = std::fs::remove_dir_all(lock_dir);
                    continue;
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn acquire_then_drop_releases_lock() {
        let dir = tempfile::tempdir().unwrap();
        let lock_dir = dir.path().join(".lock");
        {
            let _guard = acquire(&lock_dir).unwrap();
            assert!(lock_dir.exists());
        }
        assert!(!lock_dir.exists());
    }

    #[test]
    fn stale_lock_is_stolen() {
        let dir = tempfile::tempdir().unwrap();
        let lock_dir = dir.path().join(".lock");
        std::fs::create_dir(&lock_dir).unwrap();
        let ancient = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .saturating_sub(60);
        std::fs::write(meta_path(&lock_dir), format!("1\n{ancient}\n")).unwrap();

        let guard = acquire(&lock_dir).unwrap();
        drop(guard);
        assert!(!lock_dir.exists());
    }

    #[test]
    fn fresh_lock_blocks_until_released() {
        let dir = tempfile::tempdir().unwrap();
        let lock_dir = dir.path().join(".lock");
        let guard = acquire(&lock_dir).unwrap();

        let lock_dir_clone = lock_dir.clone();
        let handle = std::thread::spawn(move || acquire(&lock_dir_clone).unwrap());

        std::thread::sleep(Duration::from_millis(50));
        drop(guard);
        let second = handle.join().unwrap();
        drop(second);
        assert!(!lock_dir.exists());
    }
}
