//! # pdf-outline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! Text fragments (from a PDF content stream or a fragment JSON file) are
//! profiled by font style, classified as title, heading or body text, and
//! assembled into a flat outline of `H1`..`Hn` entries with page numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{outline_file, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = outline_file("report.pdf")?;
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Style profiling**: body size and heading styles inferred per document
//! - **Numbering patterns**: `1.2.3`, `Chapter 4`, `IV.`, `A.1`, `(a)`
//! - **Boilerplate suppression**: running headers and page numbers ignored
//! - **Multi-line headings**: wrapped heading lines merged into one entry
//! - **Batch mode**: whole directories processed in parallel with Rayon

pub mod analysis;
pub mod batch;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use analysis::{analyze, Analysis, OutlineOptions};
pub use batch::{
    process_dir, process_dir_with_progress, BatchOptions, BatchReport, FileOutcome, FileReport,
};
pub use error::{Error, Result, Warning};
pub use evaluate::{compare, CompareOptions, Evaluation};
pub use model::{
    BBox, HeadingLevel, Metadata, OutlineDocument, OutlineEntry, PageFrame, TextFragment,
};
pub use parser::{is_pdf, PageSelection, ParseOptions, PdfParser};
pub use render::{JsonFormat, OutputFormat, PageBase, RenderOptions};

use std::path::Path;

/// Build an outline from text fragments with default options.
///
/// Page frames are inferred from the text extent of each page.
///
/// # Example
///
/// ```
/// use pdf_outline::{extract_outline, BBox, TextFragment};
///
/// let fragments = vec![TextFragment::new(
///     "Just one line",
///     0,
///     BBox::new(72.0, 700.0, 200.0, 712.0),
///     12.0,
///     "Helvetica",
/// )];
/// let outline = extract_outline(&fragments);
/// assert!(outline.is_empty());
/// ```
pub fn extract_outline(fragments: &[TextFragment]) -> OutlineDocument {
    extract_outline_with_options(fragments, &[], &OutlineOptions::default())
}

/// Build an outline from text fragments, page frames and custom options.
pub fn extract_outline_with_options(
    fragments: &[TextFragment],
    frames: &[PageFrame],
    options: &OutlineOptions,
) -> OutlineDocument {
    analyze(fragments, frames, options).document
}

/// Extract the outline of a file.
///
/// Files with a `.json` extension are read as fragment JSON; anything else
/// must be a PDF. PDFs are parsed leniently so one bad page does not lose
/// the whole outline.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::outline_file;
///
/// let outline = outline_file("report.pdf").unwrap();
/// for entry in &outline.outline {
///     println!("{} {} (page {})", entry.level, entry.text, entry.page);
/// }
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<OutlineDocument> {
    Ok(Outliner::new().lenient().parse(path)?.document)
}

/// Extract the outline of a PDF held in memory.
pub fn outline_bytes(data: &[u8]) -> Result<OutlineDocument> {
    Ok(Outliner::new().lenient().parse_bytes(data)?.document)
}

/// Extract the outline from fragment JSON.
pub fn outline_fragments_json(input: &str) -> Result<OutlineDocument> {
    Ok(Outliner::new().parse_fragments_json(input)?.document)
}

/// Builder for extracting and rendering outlines.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{Outliner, PageSelection};
///
/// let markdown = Outliner::new()
///     .lenient()
///     .with_pages(PageSelection::Range(1..=20))
///     .with_max_depth(3)
///     .one_based()
///     .parse("report.pdf")?
///     .to_markdown()?;
/// # Ok::<(), pdf_outline::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Outliner {
    parse_options: ParseOptions,
    outline_options: OutlineOptions,
    render_options: RenderOptions,
}

impl Outliner {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the parse options wholesale.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Skip undecodable pages instead of failing.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Restrict extraction to some pages (1-indexed).
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.parse_options = self.parse_options.with_pages(pages);
        self
    }

    /// Set the document password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_password(password);
        self
    }

    /// Prefer the PDF's own bookmarks when it has any.
    pub fn with_bookmarks(mut self, enabled: bool) -> Self {
        self.parse_options = self.parse_options.with_bookmarks(enabled);
        self
    }

    /// Replace the outline options wholesale.
    pub fn with_outline_options(mut self, options: OutlineOptions) -> Self {
        self.outline_options = options;
        self
    }

    /// Limit the number of heading levels.
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.outline_options = self.outline_options.with_max_depth(depth);
        self
    }

    /// Pin the body font size instead of inferring it.
    pub fn with_body_font_size(mut self, size: f32) -> Self {
        self.outline_options = self.outline_options.with_body_font_size(Some(size));
        self
    }

    /// Replace the render options wholesale.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Number pages from 1 in rendered output.
    pub fn one_based(mut self) -> Self {
        self.render_options = self.render_options.one_based();
        self
    }

    /// Extract from a PDF or fragment JSON file (chosen by extension).
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<OutlineResult> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            let input = std::fs::read_to_string(path)?;
            return self.parse_fragments_json(&input);
        }
        let parser = PdfParser::open_with_options(path, self.parse_options.clone())?;
        self.run(&parser)
    }

    /// Extract from PDF bytes.
    pub fn parse_bytes(self, data: &[u8]) -> Result<OutlineResult> {
        let parser = PdfParser::from_bytes_with_options(data, self.parse_options.clone())?;
        self.run(&parser)
    }

    /// Extract from fragment JSON.
    pub fn parse_fragments_json(self, input: &str) -> Result<OutlineResult> {
        let parsed = parser::parse_fragments_json(input)?;
        let mut result = self.outline_fragments(&parsed.fragments, &parsed.frames);
        // Dropped records come first: they were found first
        let mut warnings = parsed.warnings;
        warnings.append(&mut result.warnings);
        result.warnings = warnings;
        Ok(result)
    }

    /// Build an outline from fragments already in memory.
    pub fn outline_fragments(self, fragments: &[TextFragment], frames: &[PageFrame]) -> OutlineResult {
        let analysis = analyze(fragments, frames, &self.outline_options);
        OutlineResult {
            document: analysis.document,
            warnings: analysis.warnings,
            metadata: None,
            from_bookmarks: false,
            render_options: self.render_options,
        }
    }

    fn run(self, parser: &PdfParser) -> Result<OutlineResult> {
        let extracted = parser.extract()?;
        let analysis = analyze(&extracted.fragments, &extracted.frames, &self.outline_options);

        let mut document = analysis.document;
        let from_bookmarks = !extracted.bookmarks.is_empty();
        if from_bookmarks {
            log::debug!("Using {} bookmark(s) as the outline", extracted.bookmarks.len());
            let max_depth = self.outline_options.max_depth;
            let capped = extracted
                .bookmarks
                .into_iter()
                .map(|mut entry| {
                    entry.level = HeadingLevel::new(entry.level.get().min(max_depth));
                    entry
                })
                .collect();
            document.outline = analysis::normalize_levels(capped);
        }

        Ok(OutlineResult {
            document,
            warnings: analysis.warnings,
            metadata: Some(extracted.metadata),
            from_bookmarks,
            render_options: self.render_options,
        })
    }
}

/// An extracted outline plus what was learned along the way.
#[derive(Debug, Clone)]
pub struct OutlineResult {
    /// The outline
    pub document: OutlineDocument,
    /// Recoverable anomalies (dropped fragments, ambiguous styles)
    pub warnings: Vec<Warning>,
    /// PDF info dictionary, when the input was a PDF
    pub metadata: Option<Metadata>,
    /// The outline entries came from the PDF's bookmarks
    pub from_bookmarks: bool,
    render_options: RenderOptions,
}

impl OutlineResult {
    /// Render with the builder's render options.
    pub fn render(&self) -> Result<String> {
        render::render(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let options = self.render_options.clone().with_format(OutputFormat::Json);
        let options = match format {
            JsonFormat::Compact => options.compact(),
            JsonFormat::Pretty => RenderOptions { json: JsonFormat::Pretty, ..options },
        };
        render::render(&self.document, &options)
    }

    /// Convert to an indented text tree.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Get the outline.
    pub fn document(&self) -> &OutlineDocument {
        &self.document
    }
}
