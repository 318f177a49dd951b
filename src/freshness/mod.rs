//! Freshness detection: content hash (blake3) for sources, mtime for artifacts.

mod cache;
mod hash;
pub mod mtime;

pub use cache::clear_cache;
pub use hash::{ContentHash, PREFIX_LEN, compute_file_hash, hash_reader};
pub use mtime::needs_rebuild;
