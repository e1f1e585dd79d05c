//! CLI output formatting.
//!
//! User-facing results go to stdout through these helpers; diagnostics go to
//! stderr through `tracing`. Formatting is split from printing so every line
//! shape is unit-testable.
//!
//! # Output Format
//!
//! ## Resize
//!
//! ```text
//! 001 dawn.png
//!     200x100 → 100x50 (4.1 KB)
//!     Output: out/dawn-resized.png
//! 002 notes.txt
//!     Skipped: Invalid file type.
//! ```
//!
//! ## Identify
//!
//! ```text
//! 001 dawn.png
//!     image/png 200x100 (4.1 KB)
//! ```

use crate::imaging::Dimensions;
use std::fmt::Display;

/// Outcome of resizing one input file.
#[derive(Debug, Clone)]
pub struct ResizeReport {
    pub source: String,
    pub output: String,
    pub original: Dimensions,
    pub resized: Dimensions,
    pub byte_len: usize,
}

/// What `identify` learned about one input file.
#[derive(Debug, Clone)]
pub struct IdentifyReport {
    pub source: String,
    pub mime: Option<String>,
    pub dimensions: Option<Dimensions>,
    pub byte_len: usize,
}

// ============================================================================
// Helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_dims(d: Dimensions) -> String {
    format!("{}x{}", d.width, d.height)
}

/// Human-readable byte count: `512 B`, `4.1 KB`, `1.5 MB`.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

// ============================================================================
// Resize output
// ============================================================================

/// Format a successful resize as display lines.
pub fn format_resize_report(index: usize, report: &ResizeReport) -> Vec<String> {
    vec![
        format!("{} {}", format_index(index), report.source),
        format!(
            "{}{} → {} ({})",
            indent(1),
            format_dims(report.original),
            format_dims(report.resized),
            format_size(report.byte_len)
        ),
        format!("{}Output: {}", indent(1), report.output),
    ]
}

/// Format a per-file failure as display lines.
pub fn format_failure(index: usize, source: &str, error: &impl Display) -> Vec<String> {
    vec![
        format!("{} {}", format_index(index), source),
        format!("{}Skipped: {}", indent(1), error),
    ]
}

// ============================================================================
// Identify output
// ============================================================================

pub fn format_identify_report(index: usize, report: &IdentifyReport) -> Vec<String> {
    let detail = match (&report.mime, report.dimensions) {
        (Some(mime), Some(d)) => format!("{} {}", mime, format_dims(d)),
        (Some(mime), None) => format!("{} (undecodable)", mime),
        (None, _) => "unknown type".to_string(),
    };
    vec![
        format!("{} {}", format_index(index), report.source),
        format!("{}{} ({})", indent(1), detail, format_size(report.byte_len)),
    ]
}
