//! Content hashing of source images using blake3.
//!
//! The digest is the sole identity of a source image: identical bytes at
//! different paths share a cache entry, changed bytes at the same path get a
//! new one.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::cache::{FileStamp, get_cached_hash, set_cached_hash};

/// Number of hex characters of the digest used in cache filenames.
pub const PREFIX_LEN: usize = 32;

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    #[inline]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// Fixed-length hex prefix used as the identity part of a filename.
    pub fn prefix(self) -> String {
        hex::encode(&self.0[..PREFIX_LEN / 2])
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display first 16 chars of hex for brevity
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Compute blake3 hash of file contents.
///
/// Memoized per canonical path; the memo entry is only reused while the
/// file's mtime and length are unchanged. A same-length rewrite that also
/// restores the mtime (`rsync -t`, `touch -r`) keeps the old hash until
/// [`clear_cache`](super::clear_cache) or the process exits.
pub fn compute_file_hash(path: &Path) -> io::Result<ContentHash> {
    let stamp = FileStamp::read(path)?;
    if let Some(cached) = get_cached_hash(path, stamp) {
        return Ok(cached);
    }

    let hash = hash_reader(File::open(path)?)?;
    set_cached_hash(path, stamp, hash);
    Ok(hash)
}

/// Hash everything readable from `reader`.
pub fn hash_reader(reader: impl Read) -> io::Result<ContentHash> {
    let mut reader = BufReader::with_capacity(64 * 1024, reader);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(ContentHash::new(*hasher.finalize().as_bytes()))
}
