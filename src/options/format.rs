//! Output format tags accepted by the resize filter.

use std::fmt;

use image::ImageFormat;

use crate::error::{ResizeError, Result};

/// Human-readable list used in error messages.
pub const SUPPORTED_FORMATS: &str = "jpg, jpeg, webp";

/// Target encoding for a resized artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// JPEG (`jpg`, alias `jpeg`). Opaque.
    Jpg,
    /// WebP. Keeps alpha.
    Webp,
}

impl OutputFormat {
    /// Recognize a format name (case-insensitive, aliases normalized).
    pub fn recognize(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Parse a caller-supplied format, failing with a configuration error
    /// that lists the supported set.
    pub fn parse(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(ResizeError::config("format", name, "must not be empty"));
        }
        Self::recognize(name).ok_or_else(|| {
            ResizeError::config(
                "format",
                name,
                format!("unsupported format, expected one of: {SUPPORTED_FORMATS}"),
            )
        })
    }

    /// Canonical code used in cache keys.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// File extension including the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpg => ".jpg",
            Self::Webp => ".webp",
        }
    }

    /// Encoder format in the `image` crate.
    pub const fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_aliases() {
        assert_eq!(OutputFormat::recognize("jpg"), Some(OutputFormat::Jpg));
        assert_eq!(OutputFormat::recognize("JPEG"), Some(OutputFormat::Jpg));
        assert_eq!(OutputFormat::recognize(" WebP "), Some(OutputFormat::Webp));
        assert_eq!(OutputFormat::recognize("gif"), None);
        assert_eq!(OutputFormat::recognize(""), None);
    }

    #[test]
    fn test_parse_unsupported_names_supported_set() {
        let err = OutputFormat::parse("gif").unwrap_err();
        assert!(err.is_configuration());
        let msg = err.to_string();
        assert!(msg.contains("gif"));
        assert!(msg.contains(SUPPORTED_FORMATS));
    }

    #[test]
    fn test_parse_empty() {
        assert!(OutputFormat::parse("  ").unwrap_err().is_configuration());
    }

    #[test]
    fn test_code_and_extension() {
        assert_eq!(OutputFormat::Jpg.code(), "jpg");
        assert_eq!(OutputFormat::Jpg.extension(), ".jpg");
        assert_eq!(OutputFormat::Webp.to_string(), "webp");
        assert_eq!(OutputFormat::Webp.image_format(), ImageFormat::WebP);
    }
}
