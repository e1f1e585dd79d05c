//! The "Resize Image" operation.
//!
//! A thin validation layer in front of the image engine:
//!
//! ```text
//! run(bytes, args)
//!   empty?            → empty output, nothing else consulted
//!   sniff type        → not image/*  → InvalidInput
//!   validate args     → negative     → InvalidArgument
//!   engine dimensions ┐
//!   resolve target    ├ engine error → Processing
//!   engine resize     ┘
//!
//! present(bytes)
//!   empty?            → ""
//!   sniff type        → not image/*  → InvalidInput
//!   <img src='data:{mime};base64,{...}'>
//! ```
//!
//! The engine, sniffer and text encoder are generic parameters, so tests can
//! substitute each one independently.

mod args;
mod info;

pub use args::{ArgDefault, ArgSpec, ArgType, NEGATIVE_DIMENSION, ResizeArgs, arg_specs};
pub use info::{DataType, OperationInfo};

use crate::encode::{Base64Encoder, TextEncoder};
use crate::imaging::{BackendError, Filter, ImageBackend, RustBackend, resize_image};
use crate::sniff::{InferSniffer, TypeSniffer};
use thiserror::Error;
use tracing::debug;

/// Failure of a single operation invocation. Nothing is retried.
#[derive(Error, Debug)]
pub enum OperationError {
    /// The payload is not an image.
    #[error("{0}")]
    InvalidInput(String),
    /// A sizing argument is out of range or ill-formed.
    #[error("{0}")]
    InvalidArgument(String),
    /// The engine failed to decode, resize or encode.
    #[error("Error: {0}")]
    Processing(String),
}

impl From<BackendError> for OperationError {
    fn from(e: BackendError) -> Self {
        OperationError::Processing(e.to_string())
    }
}

/// Resize Image: validates image bytes, resolves sizing arguments, delegates
/// to the engine, and renders an HTML preview.
pub struct ResizeImage<B = RustBackend, S = InferSniffer, E = Base64Encoder> {
    backend: B,
    sniffer: S,
    encoder: E,
    filter: Filter,
}

impl Default for ResizeImage {
    fn default() -> Self {
        Self::new(RustBackend::new(), InferSniffer, Base64Encoder)
    }
}

impl<B, S, E> ResizeImage<B, S, E>
where
    B: ImageBackend,
    S: TypeSniffer,
    E: TextEncoder,
{
    pub fn new(backend: B, sniffer: S, encoder: E) -> Self {
        Self {
            backend,
            sniffer,
            encoder,
            filter: Filter::default(),
        }
    }

    /// Resampling filter passed to the engine on every resize.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn info(&self) -> OperationInfo {
        OperationInfo::resize_image()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resize `input` per `args`, returning newly encoded bytes in the
    /// input's format. Empty input yields empty output.
    pub fn run(&self, input: &[u8], args: &ResizeArgs) -> Result<Vec<u8>, OperationError> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mime = self.image_mime(input, "Invalid file type.")?;
        args.validate()?;

        debug!(
            len = input.len(),
            %mime,
            width = args.width,
            height = args.height,
            units = %args.units,
            "Running resize"
        );

        let output = resize_image(
            &self.backend,
            input,
            args.width,
            args.height,
            args.units,
            self.filter,
        )?;
        Ok(output)
    }

    /// Render `data` as an inline `<img>` tag with a base64 `data:` URI.
    pub fn present(&self, data: &[u8]) -> Result<String, OperationError> {
        if data.is_empty() {
            return Ok(String::new());
        }

        let mime = self.image_mime(data, "Invalid file type")?;
        let data_uri = format!("data:{};base64,{}", mime, self.encoder.encode(data));
        Ok(format!("<img src='{}'>", data_uri))
    }

    /// Sniffed MIME type, if it is an image.
    fn image_mime(&self, bytes: &[u8], rejection: &str) -> Result<String, OperationError> {
        match self.sniffer.detect(bytes) {
            Some(kind) if kind.is_image() => Ok(kind.mime),
            _ => Err(OperationError::InvalidInput(rejection.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Units;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::sniff::FileType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sniffer returning a fixed answer and counting calls.
    struct StubSniffer {
        mime: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl StubSniffer {
        fn returning(mime: Option<&'static str>) -> Self {
            Self {
                mime,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TypeSniffer for StubSniffer {
        fn detect(&self, _bytes: &[u8]) -> Option<FileType> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.mime.map(FileType::new)
        }
    }

    struct StubEncoder;

    impl TextEncoder for StubEncoder {
        fn encode(&self, bytes: &[u8]) -> String {
            format!("<{} bytes>", bytes.len())
        }
    }

    fn operation(
        backend: MockBackend,
        mime: Option<&'static str>,
    ) -> ResizeImage<MockBackend, StubSniffer, StubEncoder> {
        ResizeImage::new(backend, StubSniffer::returning(mime), StubEncoder)
    }

    fn resize_calls(op: &ResizeImage<MockBackend, StubSniffer, StubEncoder>) -> Vec<RecordedOp> {
        op.backend()
            .get_operations()
            .into_iter()
            .filter(|o| matches!(o, RecordedOp::Resize { .. }))
            .collect()
    }

    // =========================================================================
    // run
    // =========================================================================

    #[test]
    fn run_empty_input_is_noop() {
        let op = operation(MockBackend::with_dimensions(10, 10), Some("image/png"));

        let out = op.run(&[], &ResizeArgs::pixels(-1.0, 5.0)).unwrap();
        assert!(out.is_empty());
        assert_eq!(op.sniffer.calls.load(Ordering::SeqCst), 0);
        assert!(op.backend().get_operations().is_empty());
    }

    #[test]
    fn run_unknown_type_is_invalid_input() {
        let op = operation(MockBackend::with_dimensions(10, 10), None);

        let err = op.run(b"????", &ResizeArgs::default()).unwrap_err();
        assert!(matches!(&err, OperationError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid file type.");
        assert!(op.backend().get_operations().is_empty());
    }

    #[test]
    fn run_non_image_type_is_invalid_input() {
        let op = operation(MockBackend::with_dimensions(10, 10), Some("application/pdf"));

        let err = op.run(b"%PDF", &ResizeArgs::default()).unwrap_err();
        assert!(matches!(err, OperationError::InvalidInput(_)));
    }

    #[test]
    fn run_type_check_precedes_argument_check() {
        let op = operation(MockBackend::with_dimensions(10, 10), None);

        let err = op.run(b"text", &ResizeArgs::pixels(-1.0, -1.0)).unwrap_err();
        assert!(matches!(err, OperationError::InvalidInput(_)));
    }

    #[test]
    fn run_negative_dimension_is_invalid_argument() {
        for units in [Units::Pixels, Units::Percentage] {
            for (w, h) in [(-1.0, 0.0), (0.0, -1.0), (-10.0, -10.0)] {
                let op = operation(MockBackend::with_dimensions(10, 10), Some("image/png"));
                let err = op.run(b"png", &ResizeArgs::new(w, h, units)).unwrap_err();
                assert!(matches!(&err, OperationError::InvalidArgument(_)));
                assert_eq!(err.to_string(), NEGATIVE_DIMENSION);
                assert!(op.backend().get_operations().is_empty());
            }
        }
    }

    #[test]
    fn run_both_zero_requests_original_width() {
        let op = operation(MockBackend::with_dimensions(640, 480), Some("image/jpeg"));

        let out = op.run(b"jpeg", &ResizeArgs::pixels(0.0, 0.0)).unwrap();
        assert_eq!(out, b"resized");
        assert_eq!(
            resize_calls(&op),
            vec![RecordedOp::Resize {
                len: 4,
                width: Some(640),
                height: None,
            }]
        );
    }

    #[test]
    fn run_percentage_width_only() {
        let op = operation(MockBackend::with_dimensions(200, 100), Some("image/png"));

        op.run(b"png", &ResizeArgs::percentage(50.0, 0.0)).unwrap();
        assert_eq!(
            resize_calls(&op),
            vec![RecordedOp::Resize {
                len: 3,
                width: Some(100),
                height: None,
            }]
        );
    }

    #[test]
    fn run_explicit_pixels() {
        let op = operation(MockBackend::with_dimensions(200, 100), Some("image/png"));

        op.run(b"png", &ResizeArgs::pixels(300.0, 150.0)).unwrap();
        assert_eq!(
            resize_calls(&op),
            vec![RecordedOp::Resize {
                len: 3,
                width: Some(300),
                height: Some(150),
            }]
        );
    }

    #[test]
    fn run_engine_failure_is_processing_error() {
        let op = operation(MockBackend::failing("corrupt header"), Some("image/png"));

        let err = op.run(b"png", &ResizeArgs::pixels(10.0, 0.0)).unwrap_err();
        assert!(matches!(&err, OperationError::Processing(_)));
        assert_eq!(
            err.to_string(),
            "Error: Failed to decode image: corrupt header"
        );
    }

    // =========================================================================
    // present
    // =========================================================================

    #[test]
    fn present_empty_is_empty_string() {
        let op = operation(MockBackend::new(), Some("image/png"));
        assert_eq!(op.present(&[]).unwrap(), "");
        assert_eq!(op.sniffer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn present_builds_data_uri_img_tag() {
        let op = operation(MockBackend::new(), Some("image/gif"));
        assert_eq!(
            op.present(b"GIF89a").unwrap(),
            "<img src='data:image/gif;base64,<6 bytes>'>"
        );
    }

    #[test]
    fn present_rejects_non_image() {
        for mime in [None, Some("text/html")] {
            let op = operation(MockBackend::new(), mime);
            let err = op.present(b"<html>").unwrap_err();
            assert!(matches!(&err, OperationError::InvalidInput(_)));
            assert_eq!(err.to_string(), "Invalid file type");
        }
    }

    #[test]
    fn present_never_touches_engine() {
        let op = operation(MockBackend::new(), Some("image/png"));
        op.present(b"png").unwrap();
        assert!(op.backend().get_operations().is_empty());
    }

    #[test]
    fn info_matches_operation() {
        let op: ResizeImage = ResizeImage::default();
        assert_eq!(op.info().name, "Resize Image");
        assert_eq!(op.info().args.len(), 3);
    }
}
