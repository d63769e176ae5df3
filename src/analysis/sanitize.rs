//! Input validation: drop fragments that cannot be placed or measured.

use crate::error::Warning;
use crate::model::TextFragment;

/// Why a fragment cannot be used, if anything is wrong with it.
fn defect(fragment: &TextFragment) -> Option<&'static str> {
    if !fragment.font_size.is_finite() || fragment.font_size <= 0.0 {
        return Some("font size must be a positive number");
    }
    if !fragment.bbox.is_finite() || !fragment.baseline_y.is_finite() {
        return Some("non-finite geometry");
    }
    if fragment.bbox.x1 < fragment.bbox.x0 || fragment.bbox.y1 < fragment.bbox.y0 {
        return Some("inverted bounding box");
    }
    None
}

/// Keep the usable fragments, recording a warning for each dropped one.
pub fn sanitize(fragments: &[TextFragment]) -> (Vec<TextFragment>, Vec<Warning>) {
    let mut kept = Vec::with_capacity(fragments.len());
    let mut warnings = Vec::new();

    for (index, fragment) in fragments.iter().enumerate() {
        match defect(fragment) {
            None => kept.push(fragment.clone()),
            Some(reason) => {
                log::warn!("Dropping fragment #{} ({:?}): {}", index, fragment.text, reason);
                warnings.push(Warning::MalformedFragment {
                    index,
                    reason: reason.to_string(),
                });
            }
        }
    }

    (kept, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn frag(size: f32, bbox: BBox) -> TextFragment {
        TextFragment::new("x", 0, bbox, size, "Helvetica")
    }

    #[test]
    fn test_drops_bad_font_sizes() {
        let good = BBox::new(0.0, 0.0, 10.0, 10.0);
        let input = vec![
            frag(12.0, good),
            frag(0.0, good),
            frag(f32::NAN, good),
            frag(-1.0, good),
        ];
        let (kept, warnings) = sanitize(&input);
        assert_eq!(kept.len(), 1);
        assert_eq!(warnings.len(), 3);
        assert!(matches!(
            warnings[0],
            Warning::MalformedFragment { index: 1, .. }
        ));
    }

    #[test]
    fn test_drops_bad_geometry() {
        let input = vec![
            frag(12.0, BBox::new(0.0, f32::INFINITY, 10.0, 10.0)),
            frag(12.0, BBox::new(10.0, 0.0, 0.0, 10.0)),
            frag(12.0, BBox::new(5.0, 5.0, 5.0, 5.0)),
        ];
        let (kept, warnings) = sanitize(&input);
        assert_eq!(kept.len(), 1);
        assert_eq!(warnings.len(), 2);
    }
}
