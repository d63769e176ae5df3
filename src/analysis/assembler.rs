//! Outline assembly: merge wrapped headings, fold levels, attach pages.

use super::options::OutlineOptions;
use super::order::ReadingOrder;
use super::profile::{style_of, StyleKey};
use super::text::normalize_whitespace;
use crate::model::{ClassifiedFragment, HeadingLevel, Label, OutlineEntry, Reason, TextFragment};

/// A heading being accumulated from one or more fragments.
struct PendingHeading {
    level: HeadingLevel,
    reason: Reason,
    style: StyleKey,
    page: u32,
    parts: Vec<String>,
    last: TextFragment,
    last_line: usize,
}

impl PendingHeading {
    fn start(level: HeadingLevel, item: &ClassifiedFragment, line: usize) -> Self {
        Self {
            level,
            reason: item.reason,
            style: style_of(&item.fragment),
            page: item.fragment.page,
            parts: vec![item.fragment.text.clone()],
            last: item.fragment.clone(),
            last_line: line,
        }
    }

    /// Same level, or an unnumbered line in the style of a heading whose
    /// level came from its numbering.
    fn continues_level(&self, level: HeadingLevel, item: &ClassifiedFragment) -> bool {
        level == self.level
            || (self.reason == Reason::Numbering
                && item.reason == Reason::Style
                && style_of(&item.fragment) == self.style)
    }

    /// Whether `item` continues this heading: same page and level, and either
    /// further along the same line or wrapped onto the line just below.
    fn accepts(
        &self,
        level: HeadingLevel,
        item: &ClassifiedFragment,
        line: usize,
        options: &OutlineOptions,
    ) -> bool {
        let next = &item.fragment;
        if !self.continues_level(level, item) || next.page != self.page {
            return false;
        }
        let size = self.last.font_size.max(next.font_size);

        if line == self.last_line {
            let gap = next.bbox.x0 - self.last.bbox.x1;
            return gap <= options.merge_horizontal_gap * size;
        }

        let below = next.baseline_y < self.last.baseline_y;
        let gap = self.last.bbox.y0 - next.bbox.y1;
        below && gap <= options.merge_vertical_gap * size
    }

    fn push(&mut self, fragment: &TextFragment, line: usize) {
        self.parts.push(fragment.text.clone());
        self.last = fragment.clone();
        self.last_line = line;
    }

    fn finish(self) -> Option<OutlineEntry> {
        let text = normalize_whitespace(&self.parts.join(" "));
        if text.is_empty() {
            return None;
        }
        Some(OutlineEntry {
            level: self.level,
            text,
            page: self.page,
        })
    }
}

/// Merge consecutive heading fragments into outline entries.
///
/// `classified` must be parallel to `order`. Blank fragments are skipped;
/// any other non-heading fragment ends the heading in progress.
pub fn merge_headings(
    classified: &[ClassifiedFragment],
    order: &ReadingOrder,
    options: &OutlineOptions,
) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<PendingHeading> = None;

    for (i, item) in classified.iter().enumerate() {
        if item.fragment.is_blank() {
            continue;
        }
        let line = order.line_of(i);

        match item.label {
            Label::Heading(level) => match pending.as_mut() {
                Some(current) if current.accepts(level, item, line, options) => {
                    current.push(&item.fragment, line);
                }
                _ => {
                    entries.extend(pending.take().and_then(PendingHeading::finish));
                    pending = Some(PendingHeading::start(level, item, line));
                }
            },
            Label::Title | Label::Body => {
                entries.extend(pending.take().and_then(PendingHeading::finish));
            }
        }
    }
    entries.extend(pending.take().and_then(PendingHeading::finish));
    entries
}

/// Clamp every level to at most one deeper than the previous entry.
pub fn normalize_levels(entries: Vec<OutlineEntry>) -> Vec<OutlineEntry> {
    entries
        .into_iter()
        .scan(0u8, |last_seen, mut entry| {
            let level = entry.level.get().min(last_seen.saturating_add(1));
            entry.level = HeadingLevel::new(level);
            *last_seen = level;
            Some(entry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reason;

    fn heading(text: &str, page: u32, x: f32, y: f32, level: u8) -> ClassifiedFragment {
        let fragment = TextFragment::at_baseline(text, page, x, y, 100.0, 16.0, "Helvetica-Bold");
        ClassifiedFragment::new(
            fragment,
            Label::Heading(HeadingLevel::new(level)),
            Reason::Style,
        )
    }

    fn numbered(text: &str, y: f32, level: u8) -> ClassifiedFragment {
        let mut item = heading(text, 0, 72.0, y, level);
        item.reason = Reason::Numbering;
        item
    }

    fn body(text: &str, y: f32) -> ClassifiedFragment {
        let fragment = TextFragment::at_baseline(text, 0, 72.0, y, 300.0, 10.0, "Helvetica");
        ClassifiedFragment::new(fragment, Label::Body, Reason::Fallback)
    }

    fn assemble(items: Vec<ClassifiedFragment>) -> Vec<OutlineEntry> {
        let options = OutlineOptions::default();
        let order = ReadingOrder::build(
            items.iter().map(|c| c.fragment.clone()).collect(),
            options.line_tolerance,
        );
        // items are already in reading order for these tests
        merge_headings(&items, &order, &options)
    }

    #[test]
    fn test_wrapped_heading_merges() {
        // second line top = 680 + 12.8 = 692.8; first bottom = 700 - 3.2 = 696.8
        let entries = assemble(vec![
            heading("Results of the", 0, 72.0, 700.0, 1),
            heading("Experiment", 0, 72.0, 680.0, 1),
        ]);
        assert_eq!(entries, vec![OutlineEntry::new(1, "Results of the Experiment", 0)]);
    }

    #[test]
    fn test_distant_headings_stay_apart() {
        let entries = assemble(vec![
            heading("First", 0, 72.0, 700.0, 1),
            heading("Second", 0, 72.0, 600.0, 1),
        ]);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_same_line_pieces_merge() {
        let entries = assemble(vec![
            heading("3.2", 0, 72.0, 700.0, 2),
            heading("Evaluation", 0, 180.0, 700.0, 2),
        ]);
        assert_eq!(entries, vec![OutlineEntry::new(2, "3.2 Evaluation", 0)]);
    }

    #[test]
    fn test_body_between_blocks_merge() {
        let entries = assemble(vec![
            heading("Alpha", 0, 72.0, 700.0, 1),
            body("interrupting body text", 690.0),
            heading("Beta", 0, 72.0, 680.0, 1),
        ]);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_level_change_blocks_merge() {
        let entries = assemble(vec![
            heading("Alpha", 0, 72.0, 700.0, 1),
            heading("Beta", 0, 72.0, 680.0, 2),
        ]);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_page_change_blocks_merge() {
        let entries = assemble(vec![
            heading("Alpha", 0, 72.0, 100.0, 1),
            heading("Beta", 1, 72.0, 90.0, 1),
        ]);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_unnumbered_continuation_joins_numbered_heading() {
        let entries = assemble(vec![
            numbered("3.1.2 Results of the Long", 700.0, 3),
            heading("Experiment", 0, 72.0, 680.0, 1),
        ]);
        assert_eq!(
            entries,
            vec![OutlineEntry::new(3, "3.1.2 Results of the Long Experiment", 0)]
        );
    }

    #[test]
    fn test_numbered_headings_stay_apart() {
        let entries = assemble(vec![
            numbered("3.1 Scope", 700.0, 2),
            numbered("3.1.1 Terms", 680.0, 3),
        ]);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_normalize_levels() {
        let entries = vec![
            OutlineEntry::new(3, "a", 0),
            OutlineEntry::new(3, "b", 0),
            OutlineEntry::new(1, "c", 1),
            OutlineEntry::new(4, "d", 1),
        ];
        let levels: Vec<u8> = normalize_levels(entries)
            .iter()
            .map(|e| e.level.get())
            .collect();
        assert_eq!(levels, vec![1, 2, 1, 2]);
    }
}
