//! Cache filename derivation.
//!
//! A cached artifact is addressed purely by its name:
//!
//! ```text
//! <32 hex of blake3(source bytes)>_<slug(cache key)><ext>
//! 3f1c…9a0e_800x800formatwebp.webp
//! ```
//!
//! No index or metadata store exists beside the cache directory.

use std::path::Path;

use crate::error::{ResizeError, Result};
use crate::freshness::{ContentHash, compute_file_hash};
use crate::options::OutputFormat;

/// Derive the cache filename for a source file and normalized cache key.
pub fn derive_filename(
    source: &Path,
    cache_key: &str,
    format: Option<OutputFormat>,
) -> Result<String> {
    let hash = compute_file_hash(source).map_err(|err| ResizeError::not_found(source, err))?;
    let ext = match format {
        Some(fmt) => fmt.extension().to_string(),
        None => source_extension(source),
    };
    Ok(compose(hash, cache_key, &ext))
}

/// Assemble `<prefix>_<slug><ext>` from already computed parts.
pub fn compose(hash: ContentHash, cache_key: &str, ext: &str) -> String {
    format!("{}_{}{}", hash.prefix(), slugify(cache_key), ext)
}

/// Filesystem-safe slug of a cache key.
///
/// `%` becomes `pct` and `.` becomes `p` so that `50%`, `50` and `5.0`
/// never collide; anything outside `[0-9a-z]` is dropped.
pub fn slugify(key: &str) -> String {
    let mut slug = String::with_capacity(key.len());
    for c in key.chars().flat_map(char::to_lowercase) {
        match c {
            '%' => slug.push_str("pct"),
            '.' => slug.push('p'),
            '0'..='9' | 'a'..='z' => slug.push(c),
            _ => {}
        }
    }
    slug
}

/// Source extension with its leading dot, or empty.
fn source_extension(source: &Path) -> String {
    source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
