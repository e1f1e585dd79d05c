//! Binary-to-text encoding for inline previews.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Turns raw bytes into text that can sit inside markup.
pub trait TextEncoder: Sync {
    fn encode(&self, bytes: &[u8]) -> String;
}

/// Standard-alphabet, padded base64 (RFC 4648), as used in `data:` URIs.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64Encoder;

impl TextEncoder for Base64Encoder {
    fn encode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }
}
