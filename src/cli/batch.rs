//! `batch` command: resize every entry of a manifest.
//!
//! ```toml
//! [[resize]]
//! source = "images/hero.png"
//! options = "1600x900^ webp"
//!
//! [[resize]]
//! source = "images/hero.png"
//! options = "50%"
//! format = "jpg"
//! ```

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use resize_cache::logger::ProgressLine;
use resize_cache::{OutputPublisher, ResizeCache, SiteConfig, log};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub resize: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub source: String,
    pub options: String,
    #[serde(default)]
    pub format: Option<String>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid manifest {}", path.display()))
    }
}

pub fn run(config: &SiteConfig, manifest: &Path) -> Result<()> {
    let manifest = Manifest::load(manifest)?;
    let cache = ResizeCache::new(config, OutputPublisher::new(config.output_dir()));

    for url in resize_all(&cache, &manifest.resize)? {
        println!("{url}");
    }
    Ok(())
}

/// Resolve all entries in parallel; URLs come back in manifest order.
fn resize_all<T, P>(cache: &ResizeCache<T, P>, entries: &[Entry]) -> Result<Vec<String>>
where
    T: resize_cache::image::Transform,
    P: resize_cache::ArtifactPublisher,
{
    if entries.is_empty() {
        log!("batch"; "manifest has no entries");
        return Ok(Vec::new());
    }

    let progress = ProgressLine::new(&[("resize", entries.len())]);
    let results: Vec<_> = entries
        .par_iter()
        .map(|entry| {
            let result = cache.resize(&entry.source, &entry.options, entry.format.as_deref());
            progress.inc("resize");
            result
        })
        .collect();
    progress.finish();

    let mut urls = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (entry, result) in entries.iter().zip(results) {
        match result {
            Ok(url) => urls.push(url),
            Err(e) => {
                failed += 1;
                log!("error"; "{} [{}]: {:#}", entry.source, entry.options, anyhow::Error::from(e));
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} entries failed", entries.len());
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resize_cache::{CacheLayout, StaticFiles, image::Pipeline};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn entry(source: &str, options: &str) -> Entry {
        Entry {
            source: source.into(),
            options: options.into(),
            format: None,
        }
    }

    fn fixture() -> (TempDir, ResizeCache<Pipeline, StaticFiles>) {
        let dir = TempDir::new().unwrap();
        image::RgbaImage::new(20, 10)
            .save(dir.path().join("a.png"))
            .unwrap();
        let layout = CacheLayout {
            root: dir.path().to_path_buf(),
            cache_dir: PathBuf::from("cache/resize"),
            base_url: "/".into(),
        };
        let cache = ResizeCache::with_transform(layout, Pipeline::default(), StaticFiles::new());
        (dir, cache)
    }

    #[test]
    fn test_manifest_parse() {
        let manifest: Manifest = toml::from_str(
            "[[resize]]\nsource = \"a.png\"\noptions = \"10x10\"\n\
             [[resize]]\nsource = \"b.png\"\noptions = \"50%\"\nformat = \"webp\"",
        )
        .unwrap();
        assert_eq!(manifest.resize.len(), 2);
        assert_eq!(manifest.resize[1].format.as_deref(), Some("webp"));
    }

    #[test]
    fn test_manifest_rejects_unknown_keys() {
        assert!(toml::from_str::<Manifest>("[[resize]]\nsource = \"a\"\nsize = \"1\"").is_err());
    }

    #[test]
    fn test_urls_in_manifest_order() {
        let (_dir, cache) = fixture();
        let entries = vec![entry("a.png", "10x10"), entry("a.png", "4x4"), entry("a.png", "10x10")];

        let urls = resize_all(&cache, &entries).unwrap();

        assert_eq!(urls.len(), 3);
        assert!(urls[0].ends_with("_10x10.png"));
        assert!(urls[1].ends_with("_4x4.png"));
        assert_eq!(urls[0], urls[2]);
    }

    #[test]
    fn test_any_failure_fails_batch() {
        let (_dir, cache) = fixture();
        let entries = vec![entry("a.png", "10x10"), entry("missing.png", "10x10")];

        let err = resize_all(&cache, &entries).unwrap_err();
        assert!(err.to_string().contains("1 of 2"));
    }
}
