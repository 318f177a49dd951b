//! Registration of produced artifacts with the host.
//!
//! The host publishes static files into its build output; the cache only
//! tells it which artifacts exist through [`ArtifactPublisher`].

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::{ResizeError, Result};
use crate::freshness::needs_rebuild;

/// A cached artifact ready to be published.
#[derive(Debug, Clone, Copy)]
pub struct Artifact<'a> {
    /// Absolute path inside the cache directory.
    pub path: &'a Path,
    /// Path relative to the site root (`cache/resize/<file>`).
    pub relative: &'a Path,
    /// Public URL returned to the template.
    pub url: &'a str,
}

/// Host capability that ships artifacts with the built site.
pub trait ArtifactPublisher: Send + Sync {
    fn publish(&self, artifact: &Artifact<'_>) -> Result<()>;
}

/// In-memory static file list, for hosts that copy files themselves.
#[derive(Debug, Default)]
pub struct StaticFiles {
    files: Mutex<Vec<PathBuf>>,
}

impl StaticFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered site-relative paths, in registration order.
    pub fn files(&self) -> Vec<PathBuf> {
        self.files.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }
}

impl ArtifactPublisher for StaticFiles {
    fn publish(&self, artifact: &Artifact<'_>) -> Result<()> {
        self.files.lock().push(artifact.relative.to_path_buf());
        Ok(())
    }
}

/// Copies artifacts into the build output, mirroring their site-relative path.
#[derive(Debug, Clone)]
pub struct OutputPublisher {
    output: PathBuf,
}

impl OutputPublisher {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    /// Where `artifact` lands in the output directory.
    pub fn target(&self, artifact: &Artifact<'_>) -> PathBuf {
        self.output.join(artifact.relative)
    }
}

impl ArtifactPublisher for OutputPublisher {
    fn publish(&self, artifact: &Artifact<'_>) -> Result<()> {
        let target = self.target(artifact);

        // Skip if the copy in the output is already newer
        if !needs_rebuild(artifact.path, &target) {
            return Ok(());
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| ResizeError::processing(parent, e))?;
        }
        fs::copy(artifact.path, &target).map_err(|e| ResizeError::processing(&target, e))?;
        crate::debug!("cache"; "published {}", artifact.relative.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact_in(dir: &Path) -> (PathBuf, PathBuf) {
        let relative = PathBuf::from("cache/resize/abc_10x10.png");
        let path = dir.join(&relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"artifact").unwrap();
        (path, relative)
    }

    #[test]
    fn test_static_files_records_relative_paths() {
        let dir = TempDir::new().unwrap();
        let (path, relative) = artifact_in(dir.path());
        let files = StaticFiles::new();

        files
            .publish(&Artifact {
                path: &path,
                relative: &relative,
                url: "/cache/resize/abc_10x10.png",
            })
            .unwrap();

        assert_eq!(files.files(), vec![relative]);
    }

    #[test]
    fn test_output_publisher_copies() {
        let dir = TempDir::new().unwrap();
        let (path, relative) = artifact_in(dir.path());
        let publisher = OutputPublisher::new(dir.path().join("public"));
        let artifact = Artifact {
            path: &path,
            relative: &relative,
            url: "/cache/resize/abc_10x10.png",
        };

        publisher.publish(&artifact).unwrap();

        let copied = dir.path().join("public/cache/resize/abc_10x10.png");
        assert_eq!(publisher.target(&artifact), copied);
        assert_eq!(fs::read(&copied).unwrap(), b"artifact");
    }

    #[test]
    fn test_output_publisher_missing_artifact() {
        let dir = TempDir::new().unwrap();
        let relative = PathBuf::from("cache/resize/gone.png");
        let path = dir.path().join(&relative);
        let publisher = OutputPublisher::new(dir.path().join("public"));

        let err = publisher
            .publish(&Artifact {
                path: &path,
                relative: &relative,
                url: "/cache/resize/gone.png",
            })
            .unwrap_err();
        assert!(matches!(err, ResizeError::Processing { .. }));
    }
}
