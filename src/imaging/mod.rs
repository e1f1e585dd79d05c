//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Dimensions** | `image::ImageReader::into_dimensions` |
//! | **Resize** | `image::DynamicImage::resize_exact` (Lanczos3 by default) |
//! | **Re-encode** | `image::DynamicImage::write_to`, input format preserved |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing engine requests
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{Units, calculate_auto_dimensions, resolve_dimension, resolve_target};
pub use operations::{get_dimensions, plan_resize, resize_image};
pub use params::{Filter, ResizeParams};
pub use rust_backend::RustBackend;
