//! Image engine trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the resize operation
//! needs from an engine: query the dimensions of encoded bytes, and resize
//! encoded bytes into newly encoded bytes.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording [`MockBackend`](tests::MockBackend).

use super::params::ResizeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Target size too large: {0}")]
    TooLarge(String),
}

/// Pixel extents of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image engines.
///
/// Implementations take and return *encoded* bytes; the decoded image never
/// crosses the trait boundary. `Sync` so a single engine can serve parallel
/// invocations.
pub trait ImageBackend: Sync {
    /// Decode just enough of `bytes` to report the image size.
    fn dimensions(&self, bytes: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, scale per `params`, and re-encode in the input's own format.
    fn resize(&self, bytes: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError>;
}

impl<B: ImageBackend + ?Sized> ImageBackend for &B {
    fn dimensions(&self, bytes: &[u8]) -> Result<Dimensions, BackendError> {
        (**self).dimensions(bytes)
    }

    fn resize(&self, bytes: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
        (**self).resize(bytes, params)
    }
}
