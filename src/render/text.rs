//! Plain text rendering: an indented heading tree.

use crate::error::Result;
use crate::model::OutlineDocument;

use super::RenderOptions;

/// Convert an outline to an indented tree.
///
/// ```text
/// Report Title
/// H1  Introduction (page 0)
///   H2  Background (page 1)
/// ```
pub fn to_text(doc: &OutlineDocument, options: &RenderOptions) -> Result<String> {
    let offset = options.page_base.offset();
    let mut lines = Vec::with_capacity(doc.outline.len() + 1);

    if !doc.title.is_empty() {
        lines.push(doc.title.clone());
    }
    for entry in &doc.outline {
        let depth = entry.level.get().saturating_sub(1) as usize;
        lines.push(format!(
            "{}{}  {} (page {})",
            " ".repeat(depth * options.indent),
            entry.level,
            entry.text,
            entry.page + offset
        ));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OutlineEntry;

    #[test]
    fn test_to_text() {
        let doc = OutlineDocument::new(
            "Report",
            vec![
                OutlineEntry::new(1, "Intro", 0),
                OutlineEntry::new(2, "Scope", 1),
            ],
        );
        let result = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(result, "Report\nH1  Intro (page 0)\n  H2  Scope (page 1)");
    }

    #[test]
    fn test_to_text_untitled_one_based() {
        let doc = OutlineDocument::new("", vec![OutlineEntry::new(1, "Only", 4)]);
        let result = to_text(&doc, &RenderOptions::new().one_based()).unwrap();
        assert_eq!(result, "H1  Only (page 5)");
    }
}
