//! Resize option parsing.
//!
//! Turns the raw filter arguments into a [`TransformSpec`]:
//!
//! ```text
//! "800x800 format=webp"  ─┐
//! "800x800|webp"          ├─► geometry = "800x800", format = webp,
//! "800x800,webp"          │   cache_key = "800x800 format=webp"
//! "800x800 webp"         ─┘
//! ```
//!
//! Percent geometries (`"50%"`) are kept verbatim; they are resolved against
//! real pixel dimensions by the transform pipeline.

mod format;
mod strategy;

pub use format::{OutputFormat, SUPPORTED_FORMATS};
pub use strategy::{
    DelimitedSuffix, Extracted, FormatAssignment, FormatStrategy, STRATEGIES, WhitespaceSuffix,
};

use crate::error::{ResizeError, Result};

/// Normalized resize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformSpec {
    /// Geometry expression, trimmed of whitespace and delimiters.
    pub geometry: String,
    /// Requested output format; `None` keeps the source format.
    pub format: Option<OutputFormat>,
    /// Canonical string folded into the cache filename.
    pub cache_key: String,
}

/// Parse raw options plus an optional explicit format argument.
///
/// An explicit format disables embedded format extraction entirely.
pub fn parse(raw: &str, explicit: Option<&str>) -> Result<TransformSpec> {
    if raw.trim().is_empty() {
        return Err(ResizeError::config("options", raw, "must not be empty"));
    }

    let (geometry, format) = match explicit {
        Some(name) => (raw, Some(OutputFormat::parse(name)?)),
        None => match strategy::extract(raw)? {
            Some(found) => (found.geometry, Some(found.format)),
            None => (raw, None),
        },
    };

    let geometry = trim_geometry(geometry);
    if geometry.is_empty() {
        return Err(ResizeError::config(
            "options",
            raw,
            "no geometry left after removing the format",
        ));
    }

    let cache_key = match format {
        Some(fmt) => format!("{geometry} format={fmt}"),
        None => geometry.to_string(),
    };

    Ok(TransformSpec {
        geometry: geometry.to_string(),
        format,
        cache_key,
    })
}

#[inline]
fn trim_geometry(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '|' || c == ',')
}
