//! Parameter types for engine operations.
//!
//! These structs describe *what* the engine should do, not *how*. They are the
//! interface between the [`operation`](crate::operation) layer (which decides
//! the target size) and the [`backend`](super::backend) (which does the pixel
//! work). The split lets tests swap in a recording mock without touching the
//! operation logic.
//!
//! ## Types
//!
//! - [`Filter`]: Resampling filter used when scaling. Defaults to Lanczos3.
//! - [`ResizeParams`]: Target width/height, each optional (`None` = derive it
//!   from the other side, preserving aspect ratio), plus the filter.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Resampling filter applied when scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl Filter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
            Filter::CatmullRom => FilterType::CatmullRom,
            Filter::Gaussian => FilterType::Gaussian,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parameters for a resize.
///
/// A `None` side is auto-scaled from the other one. When both are `None`
/// the engine keeps the original size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub filter: Filter,
}

impl ResizeParams {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self {
            width,
            height,
            filter: Filter::default(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }
}
