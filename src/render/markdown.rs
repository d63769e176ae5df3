//! Markdown rendering for outlines.

use crate::error::Result;
use crate::model::{OutlineDocument, OutlineNode};

use super::RenderOptions;

/// Convert an outline to Markdown: the title as `#` and the headings as a
/// nested bullet list with page references.
pub fn to_markdown(doc: &OutlineDocument, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    Ok(renderer.render(doc))
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render an outline to Markdown.
    pub fn render(&self, doc: &OutlineDocument) -> String {
        let mut output = String::new();

        if !doc.title.is_empty() {
            output.push_str("# ");
            output.push_str(&escape_markdown(&doc.title));
            output.push_str("\n\n");
        }

        for node in doc.tree() {
            self.render_node(&mut output, &node, 0);
        }

        output.trim_end().to_string()
    }

    fn render_node(&self, output: &mut String, node: &OutlineNode, depth: usize) {
        let page = node.entry.page + self.options.page_base.offset();
        output.push_str(&"  ".repeat(depth));
        output.push(self.options.list_marker);
        output.push(' ');
        output.push_str(&escape_markdown(&node.entry.text));
        output.push_str(&format!(" (p. {})\n", page));

        for child in &node.children {
            self.render_node(output, child, depth + 1);
        }
    }
}

/// Escape special Markdown characters.
/// Only characters that could be misinterpreted inside a list item are
/// escaped, to keep headings readable.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
