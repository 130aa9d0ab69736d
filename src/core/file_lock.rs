//! Writer lock for the password file.
//!
//! The lock lives on a hidden sibling (`.<store>.lock`) so taking it never
//! creates or touches the password file itself. `append` and `delete` hold it
//! across their read-check-write; `doctor` checks it without waiting.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

/// Held while a store mutation runs. Dropping it closes the file, which
/// releases the flock.
pub struct StoreLock {
    _file: File,
}

impl StoreLock {
    /// Wait until no other writer holds the store.
    pub fn acquire(lock_path: &Path) -> Result<Self> {
        let file = open(lock_path)?;
        file.lock_exclusive()
            .with_context(|| format!("lock store {}", lock_path.display()))?;
        Ok(Self { _file: file })
    }

    /// `Ok(None)` when a writer is mid-operation on the store.
    pub fn try_acquire(lock_path: &Path) -> Result<Option<Self>> {
        let file = open(lock_path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file })),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.raw_os_error() == Some(11) => {
                Ok(None)
            }
            Err(e) => Err(e).with_context(|| format!("try lock store {}", lock_path.display())),
        }
    }
}

fn open(lock_path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("open store lock {}", lock_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::StorePaths;
    use crate::core::store::{AppendOutcome, RecordStore};
    use crate::models::config::KeyMatch;
    use crate::models::record::{Record, Strength};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_paths() -> (TempDir, StorePaths) {
        let dir = TempDir::new().unwrap();
        let paths = StorePaths::from_store(dir.path().join("passwords.txt"));
        (dir, paths)
    }

    #[test]
    fn test_locking_leaves_password_file_alone() {
        let (_dir, paths) = test_paths();
        let _lock = StoreLock::acquire(&paths.lock).unwrap();
        assert!(paths.lock.exists());
        assert!(!paths.store.exists());
    }

    #[test]
    fn test_try_acquire_sees_held_writer() {
        let (_dir, paths) = test_paths();
        let held = StoreLock::acquire(&paths.lock).unwrap();
        assert!(StoreLock::try_acquire(&paths.lock).unwrap().is_none());
        drop(held);
        assert!(StoreLock::try_acquire(&paths.lock).unwrap().is_some());
    }

    #[test]
    fn test_append_queues_behind_writer_and_releases_lock() {
        let (_dir, paths) = test_paths();
        let store = RecordStore::new(&paths, KeyMatch::Exact);

        // Keep a blocked append queued behind our lock, then release it.
        let held = StoreLock::acquire(&paths.lock).unwrap();
        let (tx, rx) = mpsc::channel();
        let worker = store.clone();
        let handle = thread::spawn(move || {
            tx.send(()).unwrap();
            worker.append(&Record::new("ABCD", "ab1ABCD", Strength::Weak))
        });
        rx.recv().unwrap();
        thread::sleep(Duration::from_millis(100));
        assert!(StoreLock::try_acquire(&paths.lock).unwrap().is_none());
        drop(held);

        assert_eq!(handle.join().unwrap().unwrap(), AppendOutcome::Appended);
        assert!(StoreLock::try_acquire(&paths.lock).unwrap().is_some());
    }
}
