//! Text fragments and page geometry.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in PDF user space (origin bottom-left, y grows up).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

impl BBox {
    /// Create a new box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Vertical center.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Whether every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// A contiguous run of text sharing one font style, extracted from a single page.
///
/// Pages are zero-indexed. Fragments are produced once by the extractor and
/// never mutated by the outline pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FragmentRecord")]
pub struct TextFragment {
    /// The text content
    pub text: String,
    /// Page index (0-based)
    pub page: u32,
    /// Bounding box in page coordinates
    pub bbox: BBox,
    /// Font size in points
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font is bold
    pub is_bold: bool,
    /// Whether the font is italic
    pub is_italic: bool,
    /// Y position of the baseline
    pub baseline_y: f32,
}

impl TextFragment {
    /// Create a fragment from its bounding box.
    ///
    /// Bold and italic flags are derived from the font name; the baseline is
    /// placed at the approximate descender line (20% of the box height above
    /// the bottom edge).
    pub fn new(
        text: impl Into<String>,
        page: u32,
        bbox: BBox,
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        let font_name = font_name.into();
        let (is_bold, is_italic) = font_style_from_name(&font_name);
        Self {
            text: text.into(),
            page,
            baseline_y: bbox.y0 + bbox.height() * 0.2,
            bbox,
            font_size,
            font_name,
            is_bold,
            is_italic,
        }
    }

    /// Create a fragment positioned by its baseline, the way content streams
    /// place text. The box spans an approximate ascender and descender.
    pub fn at_baseline(
        text: impl Into<String>,
        page: u32,
        x: f32,
        baseline_y: f32,
        width: f32,
        font_size: f32,
        font_name: impl Into<String>,
    ) -> Self {
        let bbox = BBox::new(
            x,
            baseline_y - font_size * 0.2,
            x + width,
            baseline_y + font_size * 0.8,
        );
        let mut fragment = Self::new(text, page, bbox, font_size, font_name);
        fragment.baseline_y = baseline_y;
        fragment
    }

    /// Override the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.is_bold = bold;
        self
    }

    /// Override the italic flag.
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.is_italic = italic;
        self
    }

    /// Check if the fragment carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of non-whitespace characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }
}

/// Wire shape of a fragment; optional style fields fall back to values
/// derived from the font name and box.
#[derive(Deserialize)]
struct FragmentRecord {
    text: String,
    page: u32,
    bbox: BBox,
    font_size: f32,
    #[serde(default)]
    font_name: String,
    is_bold: Option<bool>,
    is_italic: Option<bool>,
    baseline_y: Option<f32>,
}

impl From<FragmentRecord> for TextFragment {
    fn from(r: FragmentRecord) -> Self {
        let (name_bold, name_italic) = font_style_from_name(&r.font_name);
        Self {
            text: r.text,
            page: r.page,
            baseline_y: r.baseline_y.unwrap_or(r.bbox.y0),
            bbox: r.bbox,
            font_size: r.font_size,
            font_name: r.font_name,
            is_bold: r.is_bold.unwrap_or(name_bold),
            is_italic: r.is_italic.unwrap_or(name_italic),
        }
    }
}

/// Derive `(bold, italic)` from a PDF base font name.
///
/// Subset prefixes such as `ABCDEF+` are ignored since only substrings are
/// inspected.
pub fn font_style_from_name(font_name: &str) -> (bool, bool) {
    let lower = font_name.to_lowercase();
    let bold = lower.contains("bold")
        || lower.contains("black")
        || lower.contains("heavy")
        || lower.contains("semibold");
    let italic = lower.contains("italic") || lower.contains("oblique");
    (bold, italic)
}

/// Extents of a page (its MediaBox), used to judge relative position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageFrame {
    /// Page index (0-based)
    pub page: u32,
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
    /// Lower edge of the MediaBox in user space
    #[serde(default, skip_serializing_if = "is_zero")]
    pub bottom: f32,
}

fn is_zero(value: &f32) -> bool {
    *value == 0.0
}

impl PageFrame {
    /// Create a page frame whose lower edge sits at y = 0.
    pub fn new(page: u32, width: f32, height: f32) -> Self {
        Self {
            page,
            width,
            height,
            bottom: 0.0,
        }
    }

    /// Build from a MediaBox `[x0 y0 x1 y1]`, in any corner order.
    pub fn from_media_box(page: u32, media_box: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = media_box;
        Self::new(page, (x1 - x0).abs(), (y1 - y0).abs()).with_bottom(y0.min(y1))
    }

    /// Move the lower edge of the page.
    pub fn with_bottom(mut self, bottom: f32) -> Self {
        self.bottom = bottom;
        self
    }

    /// Upper edge of the page in user space.
    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    /// US Letter page (612 x 792 pt).
    pub fn letter(page: u32) -> Self {
        Self::new(page, 612.0, 792.0)
    }

    /// A4 page (595 x 842 pt).
    pub fn a4(page: u32) -> Self {
        Self::new(page, 595.0, 842.0)
    }
}
