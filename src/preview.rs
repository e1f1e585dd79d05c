//! Standalone HTML page around the operation's preview fragment.
//!
//! [`ResizeImage::present`](crate::operation::ResizeImage::present) returns a
//! bare `<img>` tag meant to be dropped into a host UI. The CLI has no host
//! UI, so this wraps the fragment in a minimal document that opens directly
//! in a browser.

use crate::imaging::Dimensions;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const CSS: &str = "body { margin: 2rem; font-family: system-ui, sans-serif; background: #fafafa; color: #111; }
figure { margin: 0; }
figcaption { margin-top: 0.75rem; color: #666; font-size: 0.9rem; }
img { max-width: 100%; height: auto; box-shadow: 0 1px 4px rgba(0, 0, 0, 0.15); }";

/// Details shown under the image.
#[derive(Debug, Clone)]
pub struct PreviewCaption {
    pub file_name: String,
    /// `None` when the engine cannot read the format.
    pub dimensions: Option<Dimensions>,
    pub byte_len: usize,
}

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Wrap an `<img>` fragment produced by `present` into a full page.
///
/// The fragment is trusted markup: it is built from a sniffed MIME type and
/// base64 text, neither of which can contain markup characters.
pub fn render_preview_page(img_fragment: &str, caption: &PreviewCaption) -> String {
    let content = html! {
        figure {
            (PreEscaped(img_fragment))
            figcaption {
                (caption.file_name)
                @if let Some(d) = caption.dimensions {
                    " · " (d.width) "×" (d.height)
                }
                " (" (crate::output::format_size(caption.byte_len)) ")"
            }
        }
    };
    base_document(&caption.file_name, content).into_string()
}
