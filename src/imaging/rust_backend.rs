//! Pure Rust image engine built on the `image` crate.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Format detection | `image::guess_format` (magic bytes) |
//! | Dimensions | `ImageReader::into_dimensions` (header only, no pixel decode) |
//! | Decode (JPEG, PNG, GIF, BMP, TIFF, WebP) | `image` crate decoders |
//! | Resize | `DynamicImage::resize_exact` with the configured filter |
//! | Allocation cap | `image::Limits::default().max_alloc`, checked before resampling |
//! | Encode | `DynamicImage::write_to`, same format as the input |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::calculate_auto_dimensions;
use super::params::ResizeParams;
use image::{DynamicImage, ImageFormat, ImageReader, Limits};
use std::io::Cursor;
use tracing::debug;

/// Formats with both a decoder and an encoder compiled in.
const ROUND_TRIP_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
];

/// Engine using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Identify the container format from the leading bytes.
fn detect_format(bytes: &[u8]) -> Result<ImageFormat, BackendError> {
    let format =
        image::guess_format(bytes).map_err(|e| BackendError::UnsupportedFormat(e.to_string()))?;
    if !ROUND_TRIP_FORMATS.contains(&format) {
        return Err(BackendError::UnsupportedFormat(format!("{format:?}")));
    }
    Ok(format)
}

/// Decode encoded bytes into an in-memory image.
fn load_image(bytes: &[u8]) -> Result<(DynamicImage, ImageFormat), BackendError> {
    let format = detect_format(bytes)?;
    let img = ImageReader::with_format(Cursor::new(bytes), format)
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok((img, format))
}

/// Convert to a pixel layout the target encoder accepts.
///
/// JPEG has no alpha channel; GIF, BMP and WebP only take 8-bit RGB(A);
/// PNG and TIFF take 8/16-bit but not floating point.
fn encodable_for(img: DynamicImage, format: ImageFormat) -> DynamicImage {
    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageFormat::Gif | ImageFormat::Bmp | ImageFormat::WebP => {
            DynamicImage::ImageRgba8(img.to_rgba8())
        }
        _ => match img {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba16(img.to_rgba16())
            }
            other => other,
        },
    }
}

/// Bytes `resize_exact` allocates to scale `original` to `target`.
///
/// The vertical pass writes an RGBA `f32` buffer of the original width and
/// the target height; the horizontal pass writes the output in the source
/// pixel layout.
fn resize_footprint(original: (u32, u32), target: (u32, u32), bytes_per_pixel: u64) -> u64 {
    let intermediate = u64::from(original.0)
        .saturating_mul(u64::from(target.1))
        .saturating_mul(16);
    let output = u64::from(target.0)
        .saturating_mul(u64::from(target.1))
        .saturating_mul(bytes_per_pixel);
    intermediate.saturating_add(output)
}

/// Refuse a resize whose buffers would exceed the decoder allocation limit.
fn check_footprint(
    original: (u32, u32),
    target: (u32, u32),
    bytes_per_pixel: u64,
) -> Result<(), BackendError> {
    let Some(max_alloc) = Limits::default().max_alloc else {
        return Ok(());
    };
    let needed = resize_footprint(original, target, bytes_per_pixel);
    if needed > max_alloc {
        return Err(BackendError::TooLarge(format!(
            "{}x{} needs {} bytes, limit is {}",
            target.0, target.1, needed, max_alloc
        )));
    }
    Ok(())
}

/// Encode an image into `format`.
fn save_image(img: DynamicImage, format: ImageFormat) -> Result<Vec<u8>, BackendError> {
    let img = encodable_for(img, format);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .map_err(|e| BackendError::Encode(format!("{format:?}: {e}")))?;
    Ok(out.into_inner())
}

impl ImageBackend for RustBackend {
    fn dimensions(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        let format = detect_format(bytes)?;
        let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
            .into_dimensions()
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, bytes: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
        let (img, format) = load_image(bytes)?;
        let original = (img.width(), img.height());
        let (width, height) = calculate_auto_dimensions(original, params.width, params.height);

        debug!(
            ?format,
            orig_w = original.0,
            orig_h = original.1,
            width,
            height,
            filter = ?params.filter,
            "Resizing image"
        );

        let resized = if (width, height) == original {
            img
        } else {
            check_footprint(
                original,
                (width, height),
                u64::from(img.color().bytes_per_pixel()),
            )?;
            img.resize_exact(width, height, params.filter.filter_type())
        };
        save_image(resized, format)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::imaging::Filter;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    /// Encode a synthetic gradient as `format`.
    pub(crate) fn encode_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, format)
            .unwrap();
        out.into_inner()
    }

    pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
        encode_test_image(width, height, ImageFormat::Png)
    }

    #[test]
    fn icon_is_recognised_but_unsupported() {
        let ico = [0u8, 0, 1, 0, 1, 0, 16, 16, 0, 0, 1, 0, 32, 0];
        let result = RustBackend::new().dimensions(&ico);
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }

    #[test]
    fn dimensions_of_png() {
        let backend = RustBackend::new();
        let dims = backend.dimensions(&test_png(200, 150)).unwrap();
        assert_eq!(dims, Dimensions { width: 200, height: 150 });
    }

    #[test]
    fn dimensions_of_jpeg() {
        let backend = RustBackend::new();
        let bytes = encode_test_image(64, 48, ImageFormat::Jpeg);
        let dims = backend.dimensions(&bytes).unwrap();
        assert_eq!(dims, Dimensions { width: 64, height: 48 });
    }

    #[test]
    fn dimensions_of_garbage_errors() {
        let backend = RustBackend::new();
        let result = backend.dimensions(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
    }

    #[test]
    fn resize_truncated_png_errors() {
        let backend = RustBackend::new();
        let mut bytes = test_png(100, 100);
        bytes.truncate(40);
        let result = backend.resize(&bytes, &ResizeParams::new(Some(50), None));
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn resize_exact_dimensions() {
        let backend = RustBackend::new();
        let out = backend
            .resize(&test_png(200, 100), &ResizeParams::new(Some(300), Some(150)))
            .unwrap();
        let dims = backend.dimensions(&out).unwrap();
        assert_eq!(dims, Dimensions { width: 300, height: 150 });
    }

    #[test]
    fn resize_auto_height_preserves_aspect() {
        let backend = RustBackend::new();
        let out = backend
            .resize(&test_png(200, 100), &ResizeParams::new(Some(100), None))
            .unwrap();
        let dims = backend.dimensions(&out).unwrap();
        assert_eq!(dims, Dimensions { width: 100, height: 50 });
    }

    #[test]
    fn resize_auto_width_preserves_aspect() {
        let backend = RustBackend::new();
        let out = backend
            .resize(&test_png(160, 90), &ResizeParams::new(None, Some(45)))
            .unwrap();
        let dims = backend.dimensions(&out).unwrap();
        assert_eq!(dims, Dimensions { width: 80, height: 45 });
    }

    #[test]
    fn resize_keeps_input_format() {
        let backend = RustBackend::new();
        for format in [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Gif] {
            let out = backend
                .resize(
                    &encode_test_image(40, 20, format),
                    &ResizeParams::new(Some(20), None),
                )
                .unwrap();
            assert_eq!(image::guess_format(&out).unwrap(), format);
        }
    }

    #[test]
    fn resize_same_size_round_trips_dimensions() {
        let backend = RustBackend::new();
        let out = backend
            .resize(&test_png(64, 32), &ResizeParams::new(Some(64), None))
            .unwrap();
        assert_eq!(
            backend.dimensions(&out).unwrap(),
            Dimensions { width: 64, height: 32 }
        );
    }

    #[test]
    fn footprint_counts_intermediate_and_output() {
        // 10x20 -> 5x40 RGB8: 10*40*16 + 5*40*3
        assert_eq!(resize_footprint((10, 20), (5, 40), 3), 6400 + 600);
        assert_eq!(resize_footprint((u32::MAX, 1), (u32::MAX, u32::MAX), 4), u64::MAX);
    }

    #[test]
    fn resize_beyond_alloc_limit_errors() {
        let backend = RustBackend::new();
        let result = backend.resize(&test_png(4, 4), &ResizeParams::new(Some(100_000), None));
        assert!(matches!(result, Err(BackendError::TooLarge(_))));
    }

    #[test]
    fn resize_rgba_png_to_jpeg_layout_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])));
        let converted = encodable_for(img, ImageFormat::Jpeg);
        assert!(matches!(converted, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn resize_honours_filter_param() {
        let backend = RustBackend::new();
        let out = backend
            .resize(
                &test_png(10, 10),
                &ResizeParams::new(Some(5), Some(5)).with_filter(Filter::Nearest),
            )
            .unwrap();
        assert_eq!(
            backend.dimensions(&out).unwrap(),
            Dimensions { width: 5, height: 5 }
        );
    }
}
