//! The outline pipeline.
//!
//! Strictly two-pass: document-level facts (reading order, style profile,
//! boilerplate, title, heading levels) are derived from the complete
//! fragment list first, then every fragment is classified and the headings
//! are assembled into an outline. The pipeline never fails; anomalies are
//! reported as [`Warning`]s.

mod assembler;
mod boilerplate;
mod classifier;
mod numbering;
mod options;
mod order;
mod profile;
mod sanitize;
mod text;
mod title;

use std::collections::{HashMap, HashSet};

pub use assembler::{merge_headings, normalize_levels};
pub use boilerplate::{detect_boilerplate, Band};
pub use classifier::{classify, ClassifierContext};
pub use numbering::{Numbering, NumberingDetector, NumberingKind};
pub use options::OutlineOptions;
pub use order::{PageGeometry, ReadingOrder};
pub use profile::{style_of, HeadingStyleCandidate, LevelMap, SizeKey, StyleKey, StyleProfile};
pub use sanitize::sanitize;
pub use text::{boilerplate_key, normalize_whitespace, word_count};
pub use title::{detect_title, TitleContext, TitleSet};

use crate::error::Warning;
use crate::model::{ClassifiedFragment, OutlineDocument, PageFrame, TextFragment};

/// Everything the pipeline learned about one document.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The finished outline
    pub document: OutlineDocument,
    /// Style statistics
    pub profile: StyleProfile,
    /// Every usable fragment with its label, in reading order
    pub classified: Vec<ClassifiedFragment>,
    /// Recoverable anomalies, in the order they were found
    pub warnings: Vec<Warning>,
}

/// Run the full pipeline over one document's fragments.
///
/// `frames` are optional; pages without one use the vertical extent of the
/// text itself.
pub fn analyze(
    fragments: &[TextFragment],
    frames: &[PageFrame],
    options: &OutlineOptions,
) -> Analysis {
    let (usable, mut warnings) = sanitize(fragments);
    if usable.is_empty() {
        log::debug!("No usable fragments; returning empty outline");
        return Analysis {
            document: OutlineDocument::default(),
            profile: StyleProfile::default(),
            classified: Vec::new(),
            warnings,
        };
    }

    // Pass one: document-level facts
    let order = ReadingOrder::build(usable, options.line_tolerance);
    let geometry = PageGeometry::new(order.fragments(), frames);

    let (profile, ambiguity) = StyleProfile::build(order.fragments(), options.body_font_size);
    warnings.extend(ambiguity);

    let numbering = NumberingDetector::new();
    let boilerplate = detect_boilerplate(order.fragments(), &geometry, options.boilerplate_band);
    let title = detect_title(&TitleContext {
        fragments: order.fragments(),
        boilerplate: &boilerplate,
        geometry: &geometry,
        profile: &profile,
        numbering: &numbering,
        title_zone: options.title_zone,
    });
    let excluded = reserved_styles(order.fragments(), &boilerplate, &title);
    let levels = profile.level_map(&excluded, options.max_depth);

    // Pass two: label each fragment, then assemble
    let classified = classify(&ClassifierContext {
        order: &order,
        profile: &profile,
        levels: &levels,
        boilerplate: &boilerplate,
        title: &title,
        numbering: &numbering,
        options,
    });
    let entries = normalize_levels(merge_headings(&classified, &order, options));

    log::debug!(
        "Outline: title {:?}, {} entr{}",
        title.text(),
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" }
    );

    Analysis {
        document: OutlineDocument::new(title.text(), entries),
        profile,
        classified,
        warnings,
    }
}

/// Styles whose every non-blank use is the title or boilerplate; they must
/// not consume a heading level.
fn reserved_styles(
    fragments: &[TextFragment],
    boilerplate: &[bool],
    title: &TitleSet,
) -> HashSet<StyleKey> {
    let mut other_uses: HashMap<StyleKey, usize> = HashMap::new();
    for (i, fragment) in fragments.iter().enumerate() {
        if fragment.is_blank() {
            continue;
        }
        let uses = other_uses.entry(style_of(fragment)).or_default();
        if !boilerplate[i] && !title.contains(i) {
            *uses += 1;
        }
    }
    other_uses
        .into_iter()
        .filter(|(_, uses)| *uses == 0)
        .map(|(style, _)| style)
        .collect()
}
