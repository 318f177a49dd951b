//! Site configuration management for `site.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section   # [site], [build], [resize]
//! ├── error     # ConfigError
//! ├── util      # config file discovery
//! └── mod.rs    # SiteConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [site]
//! url = "https://example.com/blog/"
//!
//! [build]
//! output = "public"
//!
//! [resize]
//! cache_dir = "cache/resize"
//! ```

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{BuildSection, ResizeSection, SiteSection};
pub use util::{find_config_file, find_config_file_from};

use crate::log;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing site.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site source root - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Public URL settings
    #[serde(default)]
    pub site: SiteSection,

    /// Build output settings
    #[serde(default)]
    pub build: BuildSection,

    /// Resize cache settings
    #[serde(default)]
    pub resize: ResizeSection,
}

impl SiteConfig {
    /// Default configuration rooted at `root`, for hosts that do not use a
    /// config file.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Locate `config_name` upward from the cwd and load it.
    pub fn load(config_name: &Path) -> Result<Self, ConfigError> {
        let path = find_config_file(config_name)
            .ok_or_else(|| ConfigError::Missing(config_name.to_path_buf()))?;
        Self::from_path(&path)
    }

    /// Load configuration from a file; the root is the file's directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (root left empty).
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.site.validate()?;
        self.resize.validate()
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Absolute cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.root_join(&self.resize.cache_dir)
    }

    /// Absolute build output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root_join(&self.build.output)
    }

    /// Base URL, `/` when unset.
    pub fn base_url(&self) -> &str {
        match self.site.url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim(),
            _ => "/",
        }
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.base_url(), "/");
        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.resize.cache_dir, PathBuf::from("cache/resize"));
    }

    #[test]
    fn test_full_config() {
        let config = test_parse_config(
            "[site]\nurl = \"https://example.com/blog/\"\n\
             [build]\noutput = \"dist\"\n\
             [resize]\ncache_dir = \"static/thumbs\"",
        );
        assert_eq!(config.base_url(), "https://example.com/blog/");
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.resize.cache_dir, PathBuf::from("static/thumbs"));
    }

    #[test]
    fn test_blank_url_means_root() {
        let config = test_parse_config("[site]\nurl = \"  \"");
        assert_eq!(config.base_url(), "/");
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) = SiteConfig::parse_with_ignored("[resize]\nquality = 80").unwrap();
        assert_eq!(ignored, vec!["resize.quality".to_string()]);
    }

    #[test]
    fn test_from_str_validates() {
        assert!(SiteConfig::from_str("[resize]\ncache_dir = \"../outside\"").is_err());
        assert!(SiteConfig::from_str("[resize]\ncache_dir = \"cache\"").is_ok());
        assert!(matches!(
            SiteConfig::from_str("[site\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_from_path_sets_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.toml");
        fs::write(&path, "[site]\nurl = \"/docs\"\n").unwrap();

        let config = SiteConfig::from_path(&path).unwrap();
        assert_eq!(config.get_root(), dir.path());
        assert_eq!(config.cache_dir(), dir.path().join("cache/resize"));
        assert_eq!(config.output_dir(), dir.path().join("public"));
        assert_eq!(config.base_url(), "/docs");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = SiteConfig::from_path(Path::new("/nonexistent/site.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
