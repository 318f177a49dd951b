//! Per-artifact locks.
//!
//! The staleness check and the build it triggers must run as one unit per
//! destination path; otherwise two callers can both see "stale" and build
//! the same artifact twice.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{ArcMutexGuard, Mutex, RawMutex};

/// Guard held for the duration of one check-and-build.
pub type KeyGuard = ArcMutexGuard<RawMutex, ()>;

/// One mutex per destination path, created on first use.
///
/// Entries are never removed, so the map grows with the number of distinct
/// artifacts requested through one cache.
#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the lock for `key` is held.
    pub fn lock(&self, key: &Path) -> KeyGuard {
        // Clone the Arc out first: never block while holding a map shard
        let mutex = self.locks.entry(key.to_path_buf()).or_default().clone();
        mutex.lock_arc()
    }

    /// Number of distinct keys seen.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_same_key_is_exclusive() {
        let locks = KeyedLocks::new();
        let inside = AtomicUsize::new(0);
        let max_seen = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let _guard = locks.lock(Path::new("cache/resize/a.jpg"));
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert_eq!(locks.len(), 1);
    }

    #[test]
    fn test_one_entry_per_destination() {
        let locks = KeyedLocks::new();
        for _ in 0..3 {
            drop(locks.lock(Path::new("cache/resize/a.jpg")));
        }
        assert_eq!(locks.len(), 1);
        drop(locks.lock(Path::new("cache/resize/b.jpg")));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_distinct_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.lock(Path::new("a.jpg"));
        // would deadlock if keys shared a mutex
        let _b = locks.lock(Path::new("b.jpg"));
        assert_eq!(locks.len(), 2);
    }
}
