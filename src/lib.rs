//! # Resize Image
//!
//! A single image operation for an operation-plugin host: take raw image
//! bytes, check they really are an image, work out the target size from
//! `Width`/`Height`/`Units` arguments, resize, and render an HTML preview.
//!
//! ```text
//! bytes ──► sniff (infer) ──► validate args ──► engine.dimensions
//!                                                     │
//!                                  resolve target ◄───┘
//!                                        │
//!                                        ▼
//!                                 engine.resize ──► bytes (same format)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`operation`] | `ResizeImage::run` / `present`, argument schema, metadata, `OperationError` |
//! | [`imaging`] | Engine trait, `image`-crate backend, pure dimension resolution |
//! | [`sniff`] | Content-based MIME detection (`TypeSniffer`, `InferSniffer`) |
//! | [`encode`] | Binary-to-text encoding for `data:` URIs (`TextEncoder`, `Base64Encoder`) |
//! | [`config`] | Layered `resize.toml` loading, validation, and merging |
//! | [`preview`] | Standalone HTML page around the preview fragment (Maud) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Zero Means Auto
//!
//! A width or height of 0 leaves that side to the engine, which derives it
//! from the other side preserving aspect ratio. When both are 0 the original
//! width is requested, so a "no-op" resize still decodes and re-encodes.
//! The rules live in [`imaging::resolve_target`] and are tested without any
//! image bytes.
//!
//! ## Injected Capabilities
//!
//! The engine, sniffer and encoder are generic parameters of
//! [`operation::ResizeImage`]. Production code uses the defaults
//! (`RustBackend`, `InferSniffer`, `Base64Encoder`); tests swap in a
//! recording mock engine and stub sniffers.
//!
//! ## Format In, Same Format Out
//!
//! The output is encoded in the input's container format. There is no
//! format-conversion knob: a PNG in is a PNG out.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and encoding use the `image` crate only. No system
//! libraries, so the binary is fully self-contained.

pub mod config;
pub mod encode;
pub mod imaging;
pub mod operation;
pub mod output;
pub mod preview;
pub mod sniff;

pub use operation::{OperationError, ResizeArgs, ResizeImage};
