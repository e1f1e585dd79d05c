//! File-type sniffing from content bytes.
//!
//! The operation never trusts a filename or a declared type: it looks at the
//! leading bytes. [`InferSniffer`] matches them against the `infer` crate's
//! signature table, which covers images as well as archives, documents and
//! media, so non-image payloads are recognised as such rather than just
//! "unknown".

/// Result of a successful sniff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType {
    pub mime: String,
}

impl FileType {
    pub fn new(mime: impl Into<String>) -> Self {
        Self { mime: mime.into() }
    }

    /// Whether the MIME type is in the `image` top-level family.
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image")
    }
}

/// Guesses a media type from raw content.
pub trait TypeSniffer: Sync {
    /// `None` when no known signature matches.
    fn detect(&self, bytes: &[u8]) -> Option<FileType>;
}

/// Magic-byte sniffer backed by `infer`.
#[derive(Debug, Default, Clone, Copy)]
pub struct InferSniffer;

impl TypeSniffer for InferSniffer {
    fn detect(&self, bytes: &[u8]) -> Option<FileType> {
        infer::get(bytes).map(|kind| FileType::new(kind.mime_type()))
    }
}
