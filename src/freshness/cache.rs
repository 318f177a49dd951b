//! Process-wide memo of source content hashes.

use dashmap::DashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use super::ContentHash;

/// Cheap metadata snapshot used to validate a memoized hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    mtime: SystemTime,
    len: u64,
}

impl FileStamp {
    pub fn read(path: &Path) -> io::Result<Self> {
        let meta = path.metadata()?;
        Ok(Self {
            mtime: meta.modified()?,
            len: meta.len(),
        })
    }
}

/// Hash memo keyed by canonical path (thread-safe).
pub struct HashCache {
    hashes: DashMap<PathBuf, (FileStamp, ContentHash)>,
}

impl HashCache {
    pub fn new() -> Self {
        Self {
            hashes: DashMap::new(),
        }
    }

    pub fn get(&self, path: &Path, stamp: FileStamp) -> Option<ContentHash> {
        let canonical = path.canonicalize().ok()?;
        self.hashes
            .get(&canonical)
            .filter(|entry| entry.0 == stamp)
            .map(|entry| entry.1)
    }

    pub fn set(&self, path: &Path, stamp: FileStamp, hash: ContentHash) {
        if let Ok(canonical) = path.canonicalize() {
            self.hashes.insert(canonical, (stamp, hash));
        }
    }

    pub fn clear(&self) {
        self.hashes.clear();
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl Default for HashCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Global hash memo instance.
pub static HASH_CACHE: LazyLock<HashCache> = LazyLock::new(HashCache::new);

#[inline]
pub fn get_cached_hash(path: &Path, stamp: FileStamp) -> Option<ContentHash> {
    HASH_CACHE.get(path, stamp)
}

#[inline]
pub fn set_cached_hash(path: &Path, stamp: FileStamp, hash: ContentHash) {
    HASH_CACHE.set(path, stamp, hash);
}

/// Forget every memoized hash.
#[inline]
pub fn clear_cache() {
    HASH_CACHE.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cache_get_set() {
        let cache = HashCache::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, "content").unwrap();

        let stamp = FileStamp::read(&path).unwrap();
        let hash = ContentHash::new([1; 32]);
        cache.set(&path, stamp, hash);

        assert_eq!(cache.get(&path, stamp), Some(hash));
    }

    #[test]
    fn test_cache_rejects_changed_stamp() {
        let cache = HashCache::new();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, "content").unwrap();

        let stamp = FileStamp::read(&path).unwrap();
        cache.set(&path, stamp, ContentHash::new([1; 32]));

        fs::write(&path, "longer content").unwrap();
        let changed = FileStamp::read(&path).unwrap();
        assert_eq!(cache.get(&path, changed), None);
    }

    #[test]
    fn test_cache_clear() {
        let cache = HashCache::new();
        let dir = TempDir::new().unwrap();

        let path1 = dir.path().join("a.png");
        let path2 = dir.path().join("b.png");
        fs::write(&path1, "a").unwrap();
        fs::write(&path2, "b").unwrap();

        cache.set(&path1, FileStamp::read(&path1).unwrap(), ContentHash::new([1; 32]));
        cache.set(&path2, FileStamp::read(&path2).unwrap(), ContentHash::new([2; 32]));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
