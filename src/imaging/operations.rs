//! High-level image operations.
//!
//! These functions combine calculations with backend execution. They take the
//! user's sizing arguments, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{Units, resolve_target};
use super::params::{Filter, ResizeParams};
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, bytes: &[u8]) -> Result<Dimensions> {
    backend.dimensions(bytes)
}

/// Plan a resize without executing it.
///
/// Fails only when a requested side cannot be represented in pixels.
pub fn plan_resize(
    original: Dimensions,
    width: f64,
    height: f64,
    units: Units,
    filter: Filter,
) -> Result<ResizeParams> {
    let (w, h) = resolve_target(width, height, original, units)?;
    debug!(
        orig_w = original.width,
        orig_h = original.height,
        requested_w = width,
        requested_h = height,
        %units,
        resolved_w = ?w,
        resolved_h = ?h,
        "Resolved resize target"
    );
    Ok(ResizeParams::new(w, h).with_filter(filter))
}

/// Query the original size, plan the resize, and run it.
pub fn resize_image(
    backend: &impl ImageBackend,
    bytes: &[u8],
    width: f64,
    height: f64,
    units: Units,
    filter: Filter,
) -> Result<Vec<u8>> {
    let original = get_dimensions(backend, bytes)?;
    let params = plan_resize(original, width, height, units, filter)?;
    backend.resize(bytes, &params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(1920, 1080);

        let d = get_dimensions(&backend, b"img").unwrap();
        assert_eq!(d, dims(1920, 1080));
    }

    #[test]
    fn plan_resize_pixels() {
        let params = plan_resize(dims(200, 100), 300.0, 150.0, Units::Pixels, Filter::Lanczos3)
            .unwrap();
        assert_eq!(params.width, Some(300));
        assert_eq!(params.height, Some(150));
    }

    #[test]
    fn plan_resize_percentage_width_only() {
        let params = plan_resize(dims(200, 100), 50.0, 0.0, Units::Percentage, Filter::Triangle)
            .unwrap();
        assert_eq!(params, ResizeParams::new(Some(100), None).with_filter(Filter::Triangle));
    }

    #[test]
    fn plan_resize_no_request_uses_original_width() {
        let params = plan_resize(dims(640, 480), 0.0, 0.0, Units::Pixels, Filter::Lanczos3).unwrap();
        assert_eq!(params.width, Some(640));
        assert_eq!(params.height, None);
    }

    #[test]
    fn resize_image_queries_then_resizes() {
        let backend = MockBackend::with_dimensions(200, 100);

        let out = resize_image(&backend, b"img", 50.0, 0.0, Units::Percentage, Filter::Lanczos3)
            .unwrap();
        assert_eq!(out, b"resized");

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![
                RecordedOp::Dimensions { len: 3 },
                RecordedOp::Resize {
                    len: 3,
                    width: Some(100),
                    height: None,
                },
            ]
        );
    }

    #[test]
    fn resize_image_rejects_unrepresentable_side_before_engine_resize() {
        let backend = MockBackend::with_dimensions(4, 4);

        let result = resize_image(&backend, b"img", 1e12, 0.0, Units::Pixels, Filter::Lanczos3);
        assert!(matches!(result, Err(BackendError::TooLarge(_))));
        assert_eq!(backend.get_operations(), vec![RecordedOp::Dimensions { len: 3 }]);
    }

    #[test]
    fn resize_image_stops_when_dimensions_fail() {
        let backend = MockBackend::failing("bad header");

        let result = resize_image(&backend, b"img", 10.0, 10.0, Units::Pixels, Filter::Lanczos3);
        assert!(result.is_err());
        assert_eq!(backend.get_operations().len(), 1);
    }
}
