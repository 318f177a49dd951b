//! Resize cache orchestration.
//!
//! ```text
//! resize("img/a.png", "800x800 webp")
//!   │
//!   ├─ options::parse          → geometry, format, cache key
//!   ├─ fingerprint             → <hash>_<slug>.webp
//!   ├─ lock(dest)
//!   │    ├─ needs_rebuild?     → Transform::process (atomic write)
//!   │    └─ publish (once per artifact per ResizeCache)
//!   └─ base_url + cache_dir/<file>
//! ```

mod lock;
mod publish;

pub use lock::{KeyGuard, KeyedLocks};
pub use publish::{Artifact, ArtifactPublisher, OutputPublisher, StaticFiles};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dashmap::DashSet;

use crate::config::SiteConfig;
use crate::error::{ResizeError, Result};
use crate::fingerprint::derive_filename;
use crate::freshness::{self, needs_rebuild};
use crate::image::{Pipeline, Transform};
use crate::options;

/// Where artifacts live on disk and under which URL they are served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    /// Site source root.
    pub root: PathBuf,
    /// Cache directory relative to `root`.
    pub cache_dir: PathBuf,
    /// Base URL (absolute URL or path).
    pub base_url: String,
}

impl CacheLayout {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            root: config.get_root().to_path_buf(),
            cache_dir: config.resize.cache_dir.clone(),
            base_url: config.base_url().to_string(),
        }
    }

    /// Absolute cache directory.
    pub fn cache_path(&self) -> PathBuf {
        self.root.join(&self.cache_dir)
    }

    /// Site-relative path of a cached file.
    pub fn relative(&self, filename: &str) -> PathBuf {
        self.cache_dir.join(filename)
    }

    /// Public URL of a cached file.
    pub fn url_for(&self, filename: &str) -> String {
        let mut segments: Vec<String> = self
            .cache_dir
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        segments.push(filename.to_string());
        join_url(&self.base_url, &segments.join("/"))
    }
}

/// Join a base URL (absolute or path-only) and a relative path with one `/`.
pub fn join_url(base: &str, relative: &str) -> String {
    let base = base.trim();
    if base.contains("://")
        && let Ok(mut url) = url::Url::parse(base)
    {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        if let Ok(joined) = url.join(relative) {
            return joined.to_string();
        }
    }
    format!("{}/{}", base.trim_end_matches('/'), relative)
}

/// The content-addressed resize cache.
///
/// Shareable across threads; each artifact is built at most once even when
/// several callers request it concurrently.
pub struct ResizeCache<T = Pipeline, P = StaticFiles> {
    layout: CacheLayout,
    transform: T,
    publisher: P,
    locks: KeyedLocks,
    published: DashSet<PathBuf>,
}

impl<P: ArtifactPublisher> ResizeCache<Pipeline, P> {
    /// Cache backed by the image pipeline.
    pub fn new(config: &SiteConfig, publisher: P) -> Self {
        Self::with_transform(CacheLayout::from_config(config), Pipeline::default(), publisher)
    }
}

impl<T: Transform, P: ArtifactPublisher> ResizeCache<T, P> {
    pub fn with_transform(layout: CacheLayout, transform: T, publisher: P) -> Self {
        Self {
            layout,
            transform,
            publisher,
            locks: KeyedLocks::new(),
            published: DashSet::new(),
        }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Resolve a resize request to the public URL of its artifact.
    ///
    /// Builds the artifact only when it is missing or stale. The returned
    /// URL is the same for a hit and a miss.
    pub fn resize(&self, source: &str, options: &str, format: Option<&str>) -> Result<String> {
        if source.trim().is_empty() {
            return Err(ResizeError::config("source", source, "must not be empty"));
        }
        if options.trim().is_empty() {
            return Err(ResizeError::config("options", options, "must not be empty"));
        }

        let source_path = self.layout.root.join(source.trim().trim_start_matches('/'));
        check_readable(&source_path)?;

        let spec = options::parse(options, format)?;
        let filename = derive_filename(&source_path, &spec.cache_key, spec.format)?;

        let cache_dir = self.layout.cache_path();
        fs::create_dir_all(&cache_dir).map_err(|e| ResizeError::processing(&cache_dir, e))?;
        let dest = cache_dir.join(&filename);
        let relative = self.layout.relative(&filename);
        let url = self.layout.url_for(&filename);

        let _guard = self.locks.lock(&dest);

        let rebuilt = needs_rebuild(&source_path, &dest);
        if rebuilt {
            crate::log!("resize"; "{} [{}] -> {}", source, spec.cache_key, relative.display());
            self.transform
                .process(&source_path, &spec.geometry, spec.format, &dest)?;
        } else {
            crate::debug!("cache"; "hit {}", relative.display());
        }

        // A rebuild always publishes; an artifact left by a previous run is
        // published the first time this cache sees it. Only a successful
        // publish marks it seen, so a failed one is retried on the next call.
        if rebuilt || !self.published.contains(&dest) {
            self.publisher.publish(&Artifact {
                path: &dest,
                relative: &relative,
                url: &url,
            })?;
            self.published.insert(dest);
        }

        Ok(url)
    }

    /// Remove every cached artifact. The only eviction there is.
    pub fn clear(&self) -> io::Result<()> {
        clear_cache_dir(&self.layout.cache_path())?;
        self.published.clear();
        Ok(())
    }
}

/// Delete a cache directory and forget memoized source hashes.
pub fn clear_cache_dir(cache_dir: &Path) -> io::Result<()> {
    if cache_dir.exists() {
        fs::remove_dir_all(cache_dir)?;
    }
    freshness::clear_cache();
    Ok(())
}

fn check_readable(path: &Path) -> Result<()> {
    let meta = fs::File::open(path)
        .and_then(|f| f.metadata())
        .map_err(|e| ResizeError::not_found(path, e))?;
    if !meta.is_file() {
        return Err(ResizeError::not_found(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok(())
}
