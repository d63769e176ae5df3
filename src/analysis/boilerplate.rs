//! Running header and footer detection.

use std::collections::{BTreeSet, HashMap};

use super::order::PageGeometry;
use super::text::boilerplate_key;
use crate::model::TextFragment;

/// Header or footer band of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Top of the page
    Header,
    /// Bottom of the page
    Footer,
}

/// Band containing the fragment's vertical center, if any.
fn band_of(fragment: &TextFragment, geometry: &PageGeometry, band: f32) -> Option<Band> {
    let depth = geometry.depth_from_top(fragment.page, fragment.bbox.center_y());
    if depth <= band {
        Some(Band::Header)
    } else if depth >= 1.0 - band {
        Some(Band::Footer)
    } else {
        None
    }
}

/// Flag fragments whose text repeats in the same band across most pages.
///
/// A fragment is boilerplate when the same key occurs in the same band on at
/// least two pages and on more than half of the pages carrying text. The
/// returned mask is parallel to `fragments`.
pub fn detect_boilerplate(
    fragments: &[TextFragment],
    geometry: &PageGeometry,
    band: f32,
) -> Vec<bool> {
    let text_pages: BTreeSet<u32> = fragments
        .iter()
        .filter(|f| !f.is_blank())
        .map(|f| f.page)
        .collect();

    let placed: Vec<Option<(String, Band)>> = fragments
        .iter()
        .map(|f| {
            if f.is_blank() {
                return None;
            }
            band_of(f, geometry, band).map(|b| (boilerplate_key(&f.text), b))
        })
        .collect();

    let mut pages_by_key: HashMap<&(String, Band), BTreeSet<u32>> = HashMap::new();
    for (fragment, slot) in fragments.iter().zip(&placed) {
        if let Some(key) = slot {
            pages_by_key.entry(key).or_default().insert(fragment.page);
        }
    }

    let repeated = |key: &(String, Band)| {
        pages_by_key
            .get(key)
            .map(|pages| pages.len() >= 2 && pages.len() * 2 > text_pages.len())
            .unwrap_or(false)
    };

    let mask: Vec<bool> = placed
        .iter()
        .map(|slot| slot.as_ref().is_some_and(|key| repeated(key)))
        .collect();

    let count = mask.iter().filter(|b| **b).count();
    if count > 0 {
        log::debug!("{} boilerplate fragment(s) suppressed", count);
    }
    mask
}
