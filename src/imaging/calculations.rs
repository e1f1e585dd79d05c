//! Pure calculation functions for target dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Two layers of resolution happen before pixels move:
//!
//! 1. [`resolve_target`] turns the user's `(width, height, units)` arguments
//!    into an optional pixel size per side. A side that resolves to exactly
//!    0 is left to the engine ("auto"). If both sides are auto, the original
//!    width is requested so the engine still has something to scale from.
//! 2. [`calculate_auto_dimensions`] is what the engine does with that request:
//!    the missing side is derived from the given one, preserving aspect ratio.

use super::backend::{BackendError, Dimensions};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the Width/Height arguments are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Pixels,
    /// Percent of the original size on the same axis.
    Percentage,
}

impl Units {
    /// Option labels in declaration order, as shown to callers.
    pub const LABELS: [&'static str; 2] = ["Pixels", "Percentage"];

    /// Parse a label case-insensitively (`"Pixels"`, `"percentage"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("pixels") {
            Some(Units::Pixels)
        } else if label.eq_ignore_ascii_case("percentage") {
            Some(Units::Percentage)
        } else {
            None
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Pixels => f.write_str("Pixels"),
            Units::Percentage => f.write_str("Percentage"),
        }
    }
}

/// Resolve one requested side into a pixel size.
///
/// Percentages are applied against `original` in floating point. A result of
/// exactly 0 means "auto" and yields `None`; anything else is rounded to the
/// nearest pixel and never drops below 1. A side that does not fit in a `u32`
/// is an error.
///
/// # Examples
/// ```
/// # use resize_image::imaging::{Units, resolve_dimension};
/// assert_eq!(resolve_dimension(0.0, 800, Units::Pixels).unwrap(), None);
/// assert_eq!(resolve_dimension(320.0, 800, Units::Pixels).unwrap(), Some(320));
/// assert_eq!(resolve_dimension(50.0, 200, Units::Percentage).unwrap(), Some(100));
/// assert!(resolve_dimension(1e12, 800, Units::Pixels).is_err());
/// ```
pub fn resolve_dimension(
    requested: f64,
    original: u32,
    units: Units,
) -> Result<Option<u32>, BackendError> {
    let scaled = match units {
        Units::Pixels => requested,
        Units::Percentage => requested * (original as f64 / 100.0),
    };

    if scaled == 0.0 {
        return Ok(None);
    }
    let pixels = scaled.round().max(1.0);
    if pixels > u32::MAX as f64 {
        return Err(BackendError::TooLarge(format!(
            "{requested} {units} resolves to {pixels} pixels"
        )));
    }
    Ok(Some(pixels as u32))
}

/// Resolve both sides against the original image.
///
/// When both sides come out as auto, the original width is requested with an
/// auto height, which the engine turns into a same-size re-encode.
pub fn resolve_target(
    width: f64,
    height: f64,
    original: Dimensions,
    units: Units,
) -> Result<(Option<u32>, Option<u32>), BackendError> {
    let w = resolve_dimension(width, original.width, units)?;
    let h = resolve_dimension(height, original.height, units)?;

    Ok(match (w, h) {
        (None, None) => (Some(original.width), None),
        resolved => resolved,
    })
}

/// Fill in an auto side from the given one, preserving aspect ratio.
///
/// # Arguments
/// * `original` - Source dimensions (width, height)
/// * `width`, `height` - Requested sides; `None` means derive it
///
/// # Returns
/// * `(width, height)` - Final output dimensions, each at least 1
pub fn calculate_auto_dimensions(
    original: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> (u32, u32) {
    let (orig_w, orig_h) = original;

    match (width, height) {
        (Some(w), Some(h)) => (w, h),
        (Some(w), None) => {
            let ratio = w as f64 / orig_w.max(1) as f64;
            (w, ((orig_h as f64 * ratio).round() as u32).max(1))
        }
        (None, Some(h)) => {
            let ratio = h as f64 / orig_h.max(1) as f64;
            (((orig_w as f64 * ratio).round() as u32).max(1), h)
        }
        (None, None) => (orig_w, orig_h),
    }
}
