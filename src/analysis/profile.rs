//! Document-wide font statistics: the body style and ranked heading styles.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::Warning;
use crate::model::{HeadingLevel, TextFragment};

/// Font size bucketed to 0.1 pt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeKey(i32);

impl SizeKey {
    /// Bucket a font size.
    pub fn from_size(size: f32) -> Self {
        Self((size * 10.0).round() as i32)
    }

    /// Representative size of the bucket in points.
    pub fn points(self) -> f32 {
        self.0 as f32 / 10.0
    }
}

/// A `(size, weight)` combination.
pub type StyleKey = (SizeKey, bool);

/// Style key of a fragment.
pub fn style_of(fragment: &TextFragment) -> StyleKey {
    (SizeKey::from_size(fragment.font_size), fragment.is_bold)
}

/// A style that may mark headings.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingStyleCandidate {
    /// Bucketed font size in points
    pub font_size: f32,
    /// Bucket key
    pub size_key: SizeKey,
    /// Bold weight
    pub is_bold: bool,
    /// 0 is the most prominent
    pub rank: usize,
    /// Number of fragments using this style
    pub occurrences: usize,
    /// Number of characters set in this style
    pub chars: usize,
}

impl HeadingStyleCandidate {
    /// Style key of this candidate.
    pub fn style(&self) -> StyleKey {
        (self.size_key, self.is_bold)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    occurrences: usize,
    chars: usize,
    bold_chars: usize,
}

/// Body size and ranked heading candidates for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleProfile {
    /// Dominant body font size, `None` for an empty document
    pub body_font_size: Option<f32>,
    /// Bucket of the body size
    pub body_key: Option<SizeKey>,
    /// Heading candidates, most prominent first
    pub candidates: Vec<HeadingStyleCandidate>,
    /// Number of distinct size buckets seen
    pub distinct_sizes: usize,
}

impl StyleProfile {
    /// Aggregate style statistics over all non-blank fragments.
    ///
    /// `pinned_body` overrides the inferred body size. Returns a warning when
    /// the document has fewer than two distinct sizes, in which case no
    /// candidates are produced.
    pub fn build(fragments: &[TextFragment], pinned_body: Option<f32>) -> (Self, Option<Warning>) {
        let mut sizes: BTreeMap<SizeKey, Tally> = BTreeMap::new();
        let mut styles: BTreeMap<StyleKey, Tally> = BTreeMap::new();

        for fragment in fragments.iter().filter(|f| !f.is_blank()) {
            let chars = fragment.char_count();
            let (key, bold) = style_of(fragment);

            let size = sizes.entry(key).or_default();
            size.occurrences += 1;
            size.chars += chars;
            if bold {
                size.bold_chars += chars;
            }

            let style = styles.entry((key, bold)).or_default();
            style.occurrences += 1;
            style.chars += chars;
        }

        if sizes.is_empty() {
            return (Self::default(), None);
        }

        let body_key = match pinned_body {
            Some(size) => SizeKey::from_size(size),
            None => infer_body(&sizes),
        };

        let distinct_sizes = sizes.len();
        let mut profile = Self {
            body_font_size: Some(body_key.points()),
            body_key: Some(body_key),
            candidates: Vec::new(),
            distinct_sizes,
        };

        if distinct_sizes < 2 {
            log::debug!(
                "Only {} distinct font size(s); skipping heading styles",
                distinct_sizes
            );
            return (profile, Some(Warning::AmbiguousStyleProfile { distinct_sizes }));
        }

        let body_is_regular = sizes
            .get(&body_key)
            .map(|t| t.bold_chars * 2 < t.chars)
            .unwrap_or(true);

        let mut candidates: Vec<HeadingStyleCandidate> = styles
            .iter()
            .filter(|((key, bold), _)| *key > body_key || (*key == body_key && *bold && body_is_regular))
            .map(|(&(size_key, is_bold), tally)| HeadingStyleCandidate {
                font_size: size_key.points(),
                size_key,
                is_bold,
                rank: 0,
                occurrences: tally.occurrences,
                chars: tally.chars,
            })
            .collect();

        candidates.sort_by(|a, b| b.style().cmp(&a.style()));
        for (rank, candidate) in candidates.iter_mut().enumerate() {
            candidate.rank = rank;
        }

        log::debug!(
            "Body size {:.1}pt, {} heading style candidate(s)",
            body_key.points(),
            candidates.len()
        );
        profile.candidates = candidates;
        (profile, None)
    }

    /// Check if the profile yielded any heading styles.
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Assign levels to the candidates that survive `excluded`, in rank
    /// order, capped at `max_depth`.
    pub fn level_map(&self, excluded: &HashSet<StyleKey>, max_depth: u8) -> LevelMap {
        let max_depth = max_depth.max(1);
        let levels = self
            .candidates
            .iter()
            .filter(|c| !excluded.contains(&c.style()))
            .enumerate()
            .map(|(i, c)| {
                let level = (i + 1).min(max_depth as usize) as u8;
                (c.style(), HeadingLevel::new(level))
            })
            .collect();
        LevelMap { levels }
    }
}

/// Highest character weight among repeated sizes, else among all sizes.
/// Ties go to the smaller size.
fn infer_body(sizes: &BTreeMap<SizeKey, Tally>) -> SizeKey {
    let heaviest = |repeated_only: bool| {
        let mut best: Option<(SizeKey, usize)> = None;
        for (&key, tally) in sizes {
            if repeated_only && tally.occurrences < 2 {
                continue;
            }
            if best.map_or(true, |(_, chars)| tally.chars > chars) {
                best = Some((key, tally.chars));
            }
        }
        best.map(|(key, _)| key)
    };

    heaviest(true)
        .or_else(|| heaviest(false))
        .unwrap_or(SizeKey(0))
}

/// Heading level for each retained candidate style.
#[derive(Debug, Clone, Default)]
pub struct LevelMap {
    levels: HashMap<StyleKey, HeadingLevel>,
}

impl LevelMap {
    /// Level for a style, if it is a heading style.
    pub fn get(&self, style: &StyleKey) -> Option<HeadingLevel> {
        self.levels.get(style).copied()
    }

    /// Number of heading styles.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Check if there are no heading styles.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
