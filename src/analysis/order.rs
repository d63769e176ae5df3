//! Reading order and page geometry.
//!
//! Input order is never trusted: fragments are re-sorted by page, grouped
//! into lines by baseline, lines ordered top to bottom (descending y in PDF
//! user space) and fragments within a line left to right.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Range;

use crate::model::{PageFrame, TextFragment};

/// Fragments in reading order, with their line grouping.
#[derive(Debug, Clone, Default)]
pub struct ReadingOrder {
    fragments: Vec<TextFragment>,
    line_of: Vec<usize>,
    lines: Vec<Range<usize>>,
}

impl ReadingOrder {
    /// Sort fragments into reading order.
    ///
    /// Two fragments share a line when their baselines differ by at most
    /// `line_tolerance` times the font size of the fragment being placed.
    pub fn build(mut fragments: Vec<TextFragment>, line_tolerance: f32) -> Self {
        fragments.sort_by(|a, b| {
            a.page.cmp(&b.page).then_with(|| {
                b.baseline_y
                    .total_cmp(&a.baseline_y)
                    .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
            })
        });

        let mut ordered = Vec::with_capacity(fragments.len());
        let mut line_of = Vec::with_capacity(fragments.len());
        let mut lines = Vec::new();

        let mut current: Vec<TextFragment> = Vec::new();
        let mut anchor: Option<(u32, f32)> = None;

        for fragment in fragments {
            let tolerance = fragment.font_size * line_tolerance;
            let same_line = matches!(anchor, Some((page, y))
                if page == fragment.page && (fragment.baseline_y - y).abs() <= tolerance);

            if !same_line {
                flush_line(&mut current, &mut ordered, &mut line_of, &mut lines);
                anchor = Some((fragment.page, fragment.baseline_y));
            }
            current.push(fragment);
        }
        flush_line(&mut current, &mut ordered, &mut line_of, &mut lines);

        Self {
            fragments: ordered,
            line_of,
            lines,
        }
    }

    /// Fragments in reading order.
    pub fn fragments(&self) -> &[TextFragment] {
        &self.fragments
    }

    /// Consume into the ordered fragments.
    pub fn into_fragments(self) -> Vec<TextFragment> {
        self.fragments
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Check if there are no fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Line index of the fragment at position `i`.
    pub fn line_of(&self, i: usize) -> usize {
        self.line_of[i]
    }

    /// Positions of the fragments sharing a line with position `i`.
    pub fn line_members(&self, i: usize) -> Range<usize> {
        self.lines[self.line_of[i]].clone()
    }
}

fn flush_line(
    current: &mut Vec<TextFragment>,
    ordered: &mut Vec<TextFragment>,
    line_of: &mut Vec<usize>,
    lines: &mut Vec<Range<usize>>,
) {
    if current.is_empty() {
        return;
    }
    current.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

    let line = lines.len();
    let start = ordered.len();
    for fragment in current.drain(..) {
        ordered.push(fragment);
        line_of.push(line);
    }
    lines.push(start..ordered.len());
}

/// Vertical extent of each page, used to express positions relative to the
/// page height.
#[derive(Debug, Clone)]
pub struct PageGeometry {
    extents: HashMap<u32, (f32, f32)>,
    fallback: (f32, f32),
}

impl PageGeometry {
    /// Build from the known page frames.
    ///
    /// Pages without a usable frame fall back to the document-wide extent of
    /// the text itself (lowest bottom edge to highest top edge).
    pub fn new(fragments: &[TextFragment], frames: &[PageFrame]) -> Self {
        let extents = frames
            .iter()
            .filter(|f| f.height.is_finite() && f.height > 0.0)
            .map(|f| (f.page, (f.bottom, f.top())))
            .collect();

        let bottom = fragments
            .iter()
            .map(|f| f.bbox.y0)
            .min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.0);
        let top = fragments
            .iter()
            .map(|f| f.bbox.y1)
            .max_by(|a, b| a.total_cmp(b))
            .unwrap_or(0.0);

        Self {
            extents,
            fallback: (bottom, top),
        }
    }

    /// Distance of `y` below the top of `page`, as a fraction of its height
    /// (0.0 at the top edge, 1.0 at the bottom edge).
    pub fn depth_from_top(&self, page: u32, y: f32) -> f32 {
        let (bottom, top) = self.extents.get(&page).copied().unwrap_or(self.fallback);
        let height = top - bottom;
        if height <= f32::EPSILON {
            return match y.partial_cmp(&top) {
                Some(Ordering::Less) => 1.0,
                _ => 0.0,
            };
        }
        (top - y) / height
    }
}
