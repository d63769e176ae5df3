//! Outline pipeline options and tuning knobs.

/// Options controlling title, heading and outline detection.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineOptions {
    /// Deepest heading level emitted; lower-ranked styles share this level
    pub max_depth: u8,

    /// Fraction of the page height (from the top) where the title may start
    pub title_zone: f32,

    /// Fraction of the page height at the top and bottom treated as
    /// header/footer bands for boilerplate detection
    pub boilerplate_band: f32,

    /// Maximum vertical gap between wrapped heading lines, as a multiple of
    /// the font size
    pub merge_vertical_gap: f32,

    /// Maximum horizontal gap between same-line heading pieces, as a multiple
    /// of the font size
    pub merge_horizontal_gap: f32,

    /// Baseline tolerance for grouping fragments into lines, as a multiple of
    /// the font size
    pub line_tolerance: f32,

    /// Fragments with more words than this are prose, never headings
    pub max_heading_words: usize,

    /// Word limit for headings detected only by their numbering
    pub max_numbered_words: usize,

    /// Whether leading numbering can promote body-size text to a heading
    pub numbering_boost: bool,

    /// Pin the body font size instead of inferring it
    pub body_font_size: Option<f32>,
}

impl OutlineOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deepest emitted level (at least 1).
    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    /// Set the title zone as a fraction of the page height.
    pub fn with_title_zone(mut self, fraction: f32) -> Self {
        self.title_zone = fraction.clamp(0.0, 1.0);
        self
    }

    /// Set the header/footer band as a fraction of the page height.
    pub fn with_boilerplate_band(mut self, fraction: f32) -> Self {
        self.boilerplate_band = fraction.clamp(0.0, 0.5);
        self
    }

    /// Set the vertical merge threshold (multiple of font size).
    pub fn with_merge_vertical_gap(mut self, factor: f32) -> Self {
        self.merge_vertical_gap = factor;
        self
    }

    /// Set the horizontal merge threshold (multiple of font size).
    pub fn with_merge_horizontal_gap(mut self, factor: f32) -> Self {
        self.merge_horizontal_gap = factor;
        self
    }

    /// Set the baseline tolerance for line grouping (multiple of font size).
    pub fn with_line_tolerance(mut self, factor: f32) -> Self {
        self.line_tolerance = factor;
        self
    }

    /// Set the prose word limit.
    pub fn with_max_heading_words(mut self, words: usize) -> Self {
        self.max_heading_words = words;
        self
    }

    /// Set the word limit for numbering-only headings.
    pub fn with_max_numbered_words(mut self, words: usize) -> Self {
        self.max_numbered_words = words;
        self
    }

    /// Enable or disable the numbering boost.
    pub fn with_numbering_boost(mut self, enabled: bool) -> Self {
        self.numbering_boost = enabled;
        self
    }

    /// Pin (or unpin with `None`) the body font size.
    pub fn with_body_font_size(mut self, size: Option<f32>) -> Self {
        self.body_font_size = size.filter(|s| s.is_finite() && *s > 0.0);
        self
    }
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            max_depth: 6,
            title_zone: 0.25,
            boilerplate_band: 0.10,
            merge_vertical_gap: 0.8,
            merge_horizontal_gap: 3.0,
            line_tolerance: 0.3,
            max_heading_words: 50,
            max_numbered_words: 15,
            numbering_boost: true,
            body_font_size: None,
        }
    }
}
