//! Error types surfaced by `ResizeCache::resize`.
//!
//! Every variant names the offending argument or path together with the
//! value that was received, so a failed build can be diagnosed from the
//! message alone.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Shorthand result for cache operations.
pub type Result<T, E = ResizeError> = std::result::Result<T, E>;

/// Errors produced while resolving a resize request.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// Invalid or missing argument (empty string, unsupported format,
    /// non-positive percentage, malformed geometry).
    #[error("invalid `{argument}` argument {value:?}: {reason}")]
    Configuration {
        argument: &'static str,
        value: String,
        reason: String,
    },

    /// Source image is missing or unreadable.
    #[error("source image `{}` not found", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Decode, resize, encode or write failure.
    #[error("failed to process `{}`", path.display())]
    Processing {
        path: PathBuf,
        #[source]
        source: ProcessingCause,
    },
}

/// Underlying cause of a [`ResizeError::Processing`].
#[derive(Debug, Error)]
pub enum ProcessingCause {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ResizeError {
    pub(crate) fn config(
        argument: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            argument,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::NotFound {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn processing(path: impl Into<PathBuf>, source: impl Into<ProcessingCause>) -> Self {
        Self::Processing {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether this error was caused by caller-supplied arguments.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_configuration_message_names_argument_and_value() {
        let err = ResizeError::config("format", "gif", "supported formats: jpg, jpeg, webp");
        let display = err.to_string();
        assert!(display.contains("`format`"));
        assert!(display.contains("\"gif\""));
        assert!(display.contains("jpg, jpeg, webp"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_not_found_message_names_path() {
        let err = ResizeError::not_found(
            "images/missing.png",
            io::Error::new(ErrorKind::NotFound, "no such file"),
        );
        assert!(err.to_string().contains("images/missing.png"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_processing_keeps_source() {
        use std::error::Error as _;

        let err = ResizeError::processing(
            "cache/resize/out.jpg",
            io::Error::new(ErrorKind::PermissionDenied, "read-only"),
        );
        assert!(err.to_string().contains("cache/resize/out.jpg"));
        assert!(err.source().is_some());
    }
}
