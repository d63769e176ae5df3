//! Rendering options and configuration.

use super::JsonFormat;

/// Output format for an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{"title": ..., "outline": [...]}`
    #[default]
    Json,
    /// Indented plain-text tree
    Text,
    /// Nested Markdown bullet list under the title
    Markdown,
}

impl OutputFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
            OutputFormat::Markdown => "md",
        }
    }
}

/// Page numbering used in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageBase {
    /// First page is 0
    #[default]
    Zero,
    /// First page is 1
    One,
}

impl PageBase {
    /// Offset added to zero-based page indices.
    pub fn offset(&self) -> u32 {
        match self {
            PageBase::Zero => 0,
            PageBase::One => 1,
        }
    }
}

/// Options for rendering an outline.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Output format
    pub format: OutputFormat,

    /// JSON layout (pretty or compact)
    pub json: JsonFormat,

    /// Page numbering base
    pub page_base: PageBase,

    /// Character used for Markdown list markers
    pub list_marker: char,

    /// Spaces per level in the text tree
    pub indent: usize,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Use compact JSON.
    pub fn compact(mut self) -> Self {
        self.json = JsonFormat::Compact;
        self
    }

    /// Set the page numbering base.
    pub fn with_page_base(mut self, base: PageBase) -> Self {
        self.page_base = base;
        self
    }

    /// Number pages from 1.
    pub fn one_based(mut self) -> Self {
        self.page_base = PageBase::One;
        self
    }

    /// Set the list marker character.
    pub fn with_list_marker(mut self, marker: char) -> Self {
        self.list_marker = marker;
        self
    }

    /// Set the indent width of the text tree.
    pub fn with_indent(mut self, spaces: usize) -> Self {
        self.indent = spaces;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            json: JsonFormat::Pretty,
            page_base: PageBase::Zero,
            list_marker: '-',
            indent: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_format(OutputFormat::Markdown)
            .compact()
            .one_based()
            .with_list_marker('*');

        assert_eq!(options.format, OutputFormat::Markdown);
        assert_eq!(options.json, JsonFormat::Compact);
        assert_eq!(options.page_base.offset(), 1);
        assert_eq!(options.list_marker, '*');
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Markdown.extension(), "md");
    }
}
