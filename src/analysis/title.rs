//! Document title detection.

use super::numbering::NumberingDetector;
use super::order::PageGeometry;
use super::profile::{SizeKey, StyleProfile};
use super::text::normalize_whitespace;
use crate::model::TextFragment;

/// Fragments forming the title, by position in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleSet {
    members: Vec<usize>,
    text: String,
}

impl TitleSet {
    /// Check if the fragment at position `i` belongs to the title.
    pub fn contains(&self, i: usize) -> bool {
        self.members.binary_search(&i).is_ok()
    }

    /// Positions of the member fragments, ascending.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Joined title text (empty when no title was found).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check if no title was found.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Inputs shared by the title search.
pub struct TitleContext<'a> {
    /// Fragments in reading order
    pub fragments: &'a [TextFragment],
    /// Boilerplate mask parallel to `fragments`
    pub boilerplate: &'a [bool],
    /// Page extents
    pub geometry: &'a PageGeometry,
    /// Style statistics
    pub profile: &'a StyleProfile,
    /// Numbering patterns
    pub numbering: &'a NumberingDetector,
    /// Upper fraction of the page the title must start in
    pub title_zone: f32,
}

/// Find the title on the first page with non-boilerplate text.
///
/// Candidates start in the title zone, are larger than body text and carry
/// no numbering prefix. Every candidate in the largest size bucket joins the
/// title, so a title wrapped over several lines is kept whole.
pub fn detect_title(ctx: &TitleContext<'_>) -> TitleSet {
    let Some(body) = ctx.profile.body_key else {
        return TitleSet::default();
    };

    let usable = |i: usize| !ctx.fragments[i].is_blank() && !ctx.boilerplate[i];

    let Some(title_page) = (0..ctx.fragments.len())
        .find(|&i| usable(i))
        .map(|i| ctx.fragments[i].page)
    else {
        return TitleSet::default();
    };

    let candidates: Vec<(usize, SizeKey)> = ctx
        .fragments
        .iter()
        .enumerate()
        .filter(|(i, f)| f.page == title_page && usable(*i))
        .map(|(i, f)| (i, SizeKey::from_size(f.font_size), f))
        .filter(|(_, key, f)| {
            *key > body
                && ctx.geometry.depth_from_top(f.page, f.bbox.y1) <= ctx.title_zone
                && !ctx.numbering.is_numbered(&f.text)
        })
        .map(|(i, key, _)| (i, key))
        .collect();

    let Some(largest) = candidates.iter().map(|(_, key)| *key).max() else {
        return TitleSet::default();
    };

    let members: Vec<usize> = candidates
        .into_iter()
        .filter(|(_, key)| *key == largest)
        .map(|(i, _)| i)
        .collect();

    let text = normalize_whitespace(
        &members
            .iter()
            .map(|&i| ctx.fragments[i].text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    );

    log::debug!(
        "Title on page {} at {:.1}pt: {:?}",
        title_page,
        largest.points(),
        text
    );
    TitleSet { members, text }
}
