//! Rendering module for emitting outlines in various output formats.

mod json;
mod markdown;
mod options;
mod text;

pub use json::{from_json, to_json, JsonFormat};
pub use markdown::{to_markdown, MarkdownRenderer};
pub use options::{OutputFormat, PageBase, RenderOptions};
pub use text::to_text;

use crate::error::Result;
use crate::model::OutlineDocument;

/// Render an outline in the format selected by `options`.
///
/// Page numbers are re-based uniformly when `options.page_base` asks for it.
pub fn render(doc: &OutlineDocument, options: &RenderOptions) -> Result<String> {
    match options.format {
        OutputFormat::Json => match options.page_base {
            PageBase::Zero => to_json(doc, options.json),
            base => to_json(&doc.with_page_offset(base.offset()), options.json),
        },
        OutputFormat::Text => to_text(doc, options),
        OutputFormat::Markdown => to_markdown(doc, options),
    }
}
