//! Embedded format extraction.
//!
//! Each strategy inspects the raw option string independently and either
//! reports a match (geometry remainder + format) or passes. Strategies are
//! tried in [`STRATEGIES`] order and the first match wins.

use std::sync::LazyLock;

use regex::Regex;

use super::OutputFormat;
use crate::error::{ResizeError, Result};

/// A format found inside the option string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extracted<'a> {
    /// Option string with the format token removed (not yet trimmed).
    pub geometry: &'a str,
    pub format: OutputFormat,
}

/// One way of spelling a format inside the option string.
pub trait FormatStrategy: Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` means "not my syntax", letting the next strategy try.
    fn extract<'a>(&self, raw: &'a str) -> Result<Option<Extracted<'a>>>;
}

/// Precedence order: `format=<fmt>`, then `|`/`,` suffix, then whitespace suffix.
pub static STRATEGIES: &[&dyn FormatStrategy] =
    &[&FormatAssignment, &DelimitedSuffix, &WhitespaceSuffix];

/// Run the strategies in precedence order.
pub fn extract(raw: &str) -> Result<Option<Extracted<'_>>> {
    for strategy in STRATEGIES {
        if let Some(found) = strategy.extract(raw)? {
            crate::debug!("options"; "{:?} matched by {}", raw, strategy.name());
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Trailing `format=<fmt>`, optionally preceded by whitespace, `|` or `,`.
pub struct FormatAssignment;

static FORMAT_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[\s|,]+)format=([^\s|,]*)\s*$").unwrap());

impl FormatStrategy for FormatAssignment {
    fn name(&self) -> &'static str {
        "format-assignment"
    }

    fn extract<'a>(&self, raw: &'a str) -> Result<Option<Extracted<'a>>> {
        let Some(caps) = FORMAT_ASSIGNMENT.captures(raw) else {
            return Ok(None);
        };
        let whole = caps.get(0).map_or(raw.len(), |m| m.start());
        let value = caps.get(1).map_or("", |m| m.as_str());

        // An explicit `format=` names the caller's intent; reject rather
        // than silently treating the token as geometry.
        let format = OutputFormat::parse(value).map_err(|_| {
            ResizeError::config(
                "options",
                raw,
                format!(
                    "unsupported `format={value}`, expected one of: {}",
                    super::format::SUPPORTED_FORMATS
                ),
            )
        })?;

        Ok(Some(Extracted {
            geometry: &raw[..whole],
            format,
        }))
    }
}

/// Last `|`- or `,`-separated segment, if it names a format.
pub struct DelimitedSuffix;

impl FormatStrategy for DelimitedSuffix {
    fn name(&self) -> &'static str {
        "delimited-suffix"
    }

    fn extract<'a>(&self, raw: &'a str) -> Result<Option<Extracted<'a>>> {
        let Some((head, last)) = raw.rsplit_once(['|', ',']) else {
            return Ok(None);
        };
        Ok(OutputFormat::recognize(last).map(|format| Extracted {
            geometry: head,
            format,
        }))
    }
}

/// Last whitespace-separated token, if it names a format.
pub struct WhitespaceSuffix;

impl FormatStrategy for WhitespaceSuffix {
    fn name(&self) -> &'static str {
        "whitespace-suffix"
    }

    fn extract<'a>(&self, raw: &'a str) -> Result<Option<Extracted<'a>>> {
        let Some((head, last)) = raw.trim_end().rsplit_once(char::is_whitespace) else {
            return Ok(None);
        };
        Ok(OutputFormat::recognize(last).map(|format| Extracted {
            geometry: head,
            format,
        }))
    }
}
