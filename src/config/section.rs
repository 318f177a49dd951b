//! Configuration sections of `site.toml`.
//!
//! | TOML Section | Purpose                                    |
//! |--------------|--------------------------------------------|
//! | `[site]`     | Base URL artifacts are published under     |
//! | `[build]`    | Output directory artifacts are copied into |
//! | `[resize]`   | Cache directory layout                     |

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// `[site]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Base URL, absolute (`https://example.com/blog/`) or a path (`/blog`).
    /// Absent means artifacts are served from `/`.
    pub url: Option<String>,
}

impl SiteSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url
            && url.contains("://")
            && let Err(err) = url::Url::parse(url)
        {
            return Err(ConfigError::validation(
                "site.url",
                format!("`{url}` is not a valid URL: {err}"),
            ));
        }
        Ok(())
    }
}

/// `[build]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Build output directory, relative to the site root.
    pub output: PathBuf,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output: PathBuf::from("public"),
        }
    }
}

/// `[resize]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResizeSection {
    /// Cache directory, relative to the site root.
    pub cache_dir: PathBuf,
}

impl Default for ResizeSection {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache/resize"),
        }
    }
}

impl ResizeSection {
    /// The cache must live inside the site root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_relative("resize.cache_dir", &self.cache_dir)
    }
}

fn validate_relative(field: &'static str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::validation(field, "must not be empty"));
    }
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(ConfigError::validation(
            field,
            format!(
                "`{}` must be a relative path inside the site root",
                path.display()
            ),
        ));
    }
    Ok(())
}
