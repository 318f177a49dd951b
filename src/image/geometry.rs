//! Geometry expressions understood by the resize step.
//!
//! ```text
//! 50%        scale both sides (resolved against real dimensions)
//! 800        width 800, height follows aspect ratio
//! x600       height 600, width follows aspect ratio
//! 800x600    fit inside the box, keep aspect ratio
//! 800x600!   exact size, ignore aspect ratio
//! 800x600^   cover the box, keep aspect ratio
//! 800x600>   only shrink images larger than the box
//! 800x600<   only enlarge images smaller than the box
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ResizeError, Result};

static PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)%\s*$").unwrap());

static BOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)?(?:[xX](\d+))?\s*([!^<>])?\s*$").unwrap());

/// How a box geometry maps the source onto the target dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitMode {
    /// Largest size that fits inside the box.
    Fit,
    /// Exactly the box (`!`).
    Exact,
    /// Smallest size that covers the box (`^`).
    Fill,
    /// Fit, but only when the source exceeds the box (`>`).
    ShrinkOnly,
    /// Fit, but only when the source is smaller than the box (`<`).
    EnlargeOnly,
}

impl FitMode {
    fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("!") => Self::Exact,
            Some("^") => Self::Fill,
            Some(">") => Self::ShrinkOnly,
            Some("<") => Self::EnlargeOnly,
            _ => Self::Fit,
        }
    }
}

/// Parsed geometry expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Uniform percentage, always `> 0`.
    Percent(f64),
    /// Pixel box; at least one side is present, every present side is `> 0`.
    Box {
        width: Option<u32>,
        height: Option<u32>,
        mode: FitMode,
    },
}

impl Geometry {
    /// Parse a geometry expression.
    ///
    /// Malformed expressions and non-positive sizes are configuration
    /// errors, reported before any pixel work.
    pub fn parse(expr: &str) -> Result<Self> {
        if let Some(caps) = PERCENT.captures(expr) {
            let pct: f64 = caps[1]
                .parse()
                .map_err(|_| ResizeError::config("options", expr, "unreadable percentage"))?;
            if !(pct > 0.0 && pct.is_finite()) {
                return Err(ResizeError::config(
                    "options",
                    expr,
                    "percentage must be greater than 0",
                ));
            }
            return Ok(Self::Percent(pct));
        }

        let Some(caps) = BOX.captures(expr) else {
            return Err(ResizeError::config(
                "options",
                expr,
                "unrecognized geometry, expected `WxH`, `W`, `xH` or `N%`",
            ));
        };

        let side = |i: usize| -> Result<Option<u32>> {
            let Some(m) = caps.get(i) else {
                return Ok(None);
            };
            match m.as_str().parse::<u32>() {
                Ok(0) => Err(ResizeError::config(
                    "options",
                    expr,
                    "dimensions must be greater than 0",
                )),
                Ok(n) => Ok(Some(n)),
                Err(_) => Err(ResizeError::config("options", expr, "dimension too large")),
            }
        };

        let width = side(1)?;
        let height = side(2)?;
        if width.is_none() && height.is_none() {
            return Err(ResizeError::config(
                "options",
                expr,
                "geometry needs a width or a height",
            ));
        }

        Ok(Self::Box {
            width,
            height,
            mode: FitMode::from_flag(caps.get(3).map(|m| m.as_str())),
        })
    }

    /// Target dimensions for a source of `(width, height)`.
    pub fn target_dimensions(&self, (w, h): (u32, u32)) -> (u32, u32) {
        match *self {
            Self::Percent(pct) => percent_to_pixels(pct, (w, h)),
            Self::Box {
                width,
                height,
                mode,
            } => box_dimensions((w, h), width, height, mode),
        }
    }
}

/// Largest target area the resize step will allocate.
pub const MAX_PIXELS: u64 = 100_000_000;

/// Whether `(width, height)` stays within [`MAX_PIXELS`].
pub fn within_limits((w, h): (u32, u32)) -> bool {
    u64::from(w) * u64::from(h) <= MAX_PIXELS
}

/// Whether `expr` is a bare percentage.
pub fn is_percent(expr: &str) -> bool {
    PERCENT.is_match(expr)
}

/// Scale each side independently: `max(round(side * pct / 100), 1)`.
///
/// Sides are rounded separately, so the aspect ratio may drift by a pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent_to_pixels(pct: f64, (w, h): (u32, u32)) -> (u32, u32) {
    let scale = |side: u32| (f64::from(side) * pct / 100.0).round().max(1.0) as u32;
    (scale(w), scale(h))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn box_dimensions(
    (w, h): (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
    mode: FitMode,
) -> (u32, u32) {
    if w == 0 || h == 0 {
        return (w, h);
    }

    let rx = width.map(|bw| f64::from(bw) / f64::from(w));
    let ry = height.map(|bh| f64::from(bh) / f64::from(h));
    let scaled = |ratio: f64| {
        let side = |s: u32| (f64::from(s) * ratio).round().max(1.0) as u32;
        (side(w), side(h))
    };

    match (mode, rx, ry) {
        (FitMode::Exact, _, _) => {
            // A missing side follows the aspect ratio of the given one
            let (fw, fh) = scaled(rx.or(ry).unwrap_or(1.0));
            (width.unwrap_or(fw), height.unwrap_or(fh))
        }
        (FitMode::Fill, Some(x), Some(y)) => scaled(x.max(y)),
        (FitMode::ShrinkOnly, _, _) if rx.is_none_or(|x| x >= 1.0) && ry.is_none_or(|y| y >= 1.0) => {
            (w, h)
        }
        (FitMode::EnlargeOnly, _, _) if rx.is_some_and(|x| x <= 1.0) || ry.is_some_and(|y| y <= 1.0) => {
            (w, h)
        }
        (_, Some(x), Some(y)) => scaled(x.min(y)),
        (_, Some(x), None) => scaled(x),
        (_, None, Some(y)) => scaled(y),
        (_, None, None) => (w, h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_limits() {
        assert!(within_limits((10_000, 10_000)));
        assert!(!within_limits((100_000, 100_000)));
        assert!(!within_limits((u32::MAX, u32::MAX)));
        // saturated percent stays comparable instead of overflowing
        assert!(!within_limits(percent_to_pixels(1e10, (4, 4))));
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(Geometry::parse("50%").unwrap(), Geometry::Percent(50.0));
        assert_eq!(Geometry::parse(" 12.5% ").unwrap(), Geometry::Percent(12.5));
        assert!(is_percent("50%"));
        assert!(is_percent("-10%"));
        assert!(!is_percent("50%x20"));
    }

    #[test]
    fn test_non_positive_percent_is_configuration_error() {
        for expr in ["0%", "-10%", "0.0%"] {
            let err = Geometry::parse(expr).unwrap_err();
            assert!(err.is_configuration(), "{expr}");
            assert!(err.to_string().contains(expr.trim()), "{expr}");
        }
    }

    #[test]
    fn test_percent_rounds_each_side() {
        assert_eq!(percent_to_pixels(50.0, (101, 99)), (51, 50));
        assert_eq!(percent_to_pixels(1.0, (10, 10)), (1, 1));
        assert_eq!(percent_to_pixels(200.0, (3, 5)), (6, 10));
    }

    #[test]
    fn test_parse_box_forms() {
        assert_eq!(
            Geometry::parse("800x600").unwrap(),
            Geometry::Box {
                width: Some(800),
                height: Some(600),
                mode: FitMode::Fit
            }
        );
        assert_eq!(
            Geometry::parse("800").unwrap(),
            Geometry::Box {
                width: Some(800),
                height: None,
                mode: FitMode::Fit
            }
        );
        assert_eq!(
            Geometry::parse("x600>").unwrap(),
            Geometry::Box {
                width: None,
                height: Some(600),
                mode: FitMode::ShrinkOnly
            }
        );
        assert_eq!(
            Geometry::parse("10X20!").unwrap(),
            Geometry::Box {
                width: Some(10),
                height: Some(20),
                mode: FitMode::Exact
            }
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for expr in ["", "x", "abc", "800x800 gif", "0x10", "10x0", "!"] {
            assert!(
                Geometry::parse(expr).unwrap_err().is_configuration(),
                "{expr:?}"
            );
        }
    }

    #[test]
    fn test_fit_keeps_aspect() {
        let g = Geometry::parse("100x100").unwrap();
        assert_eq!(g.target_dimensions((400, 200)), (100, 50));
        assert_eq!(g.target_dimensions((50, 25)), (100, 50));

        let g = Geometry::parse("x50").unwrap();
        assert_eq!(g.target_dimensions((400, 200)), (100, 50));
    }

    #[test]
    fn test_exact_and_fill() {
        let g = Geometry::parse("100x100!").unwrap();
        assert_eq!(g.target_dimensions((400, 200)), (100, 100));

        let g = Geometry::parse("100x100^").unwrap();
        assert_eq!(g.target_dimensions((400, 200)), (200, 100));
    }

    #[test]
    fn test_shrink_and_enlarge_only() {
        let shrink = Geometry::parse("100x100>").unwrap();
        assert_eq!(shrink.target_dimensions((50, 40)), (50, 40));
        assert_eq!(shrink.target_dimensions((400, 200)), (100, 50));

        let enlarge = Geometry::parse("100x100<").unwrap();
        assert_eq!(enlarge.target_dimensions((400, 200)), (400, 200));
        assert_eq!(enlarge.target_dimensions((50, 40)), (100, 80));
    }

    #[test]
    fn test_resolved_percent_box_matches_percent() {
        let (w, h) = percent_to_pixels(50.0, (101, 99));
        let g = Geometry::parse(&format!("{w}x{h}")).unwrap();
        assert_eq!(g.target_dimensions((101, 99)), (51, 50));
    }
}
