//! Fragment classification: an ordered table of rules, first match wins.

use super::numbering::NumberingDetector;
use super::options::OutlineOptions;
use super::order::ReadingOrder;
use super::profile::{style_of, LevelMap, SizeKey, StyleProfile};
use super::text::{ends_with_sentence_punctuation, has_alphanumeric, word_count};
use super::title::TitleSet;
use crate::model::{ClassifiedFragment, HeadingLevel, Label, Reason, TextFragment};

/// Document-level facts every rule may consult.
pub struct ClassifierContext<'a> {
    /// Fragments in reading order with line grouping
    pub order: &'a ReadingOrder,
    /// Style statistics
    pub profile: &'a StyleProfile,
    /// Levels of the retained heading styles
    pub levels: &'a LevelMap,
    /// Boilerplate mask parallel to the fragments
    pub boilerplate: &'a [bool],
    /// Title members
    pub title: &'a TitleSet,
    /// Numbering patterns
    pub numbering: &'a NumberingDetector,
    /// Tuning knobs
    pub options: &'a OutlineOptions,
}

impl ClassifierContext<'_> {
    fn fragment(&self, i: usize) -> &TextFragment {
        &self.order.fragments()[i]
    }

    fn size_key(&self, i: usize) -> SizeKey {
        SizeKey::from_size(self.fragment(i).font_size)
    }

    fn at_body_size(&self, i: usize) -> bool {
        self.profile.body_key == Some(self.size_key(i))
    }

    /// No regular-weight text shares the fragment's line.
    fn alone_on_line(&self, i: usize) -> bool {
        let fragments = self.order.fragments();
        self.order
            .line_members(i)
            .filter(|&j| j != i)
            .all(|j| fragments[j].is_bold || fragments[j].is_blank())
    }

    fn numbering_depth(&self, i: usize) -> Option<HeadingLevel> {
        if !self.options.numbering_boost {
            return None;
        }
        self.numbering
            .detect(&self.fragment(i).text)
            .map(|n| HeadingLevel::new(n.depth.min(self.options.max_depth)))
    }
}

type Predicate = fn(&ClassifierContext<'_>, usize) -> Option<Label>;

/// One row of the rule table.
struct Rule {
    reason: Reason,
    apply: Predicate,
}

const RULES: &[Rule] = &[
    Rule {
        reason: Reason::Empty,
        apply: empty_rule,
    },
    Rule {
        reason: Reason::Boilerplate,
        apply: boilerplate_rule,
    },
    Rule {
        reason: Reason::Title,
        apply: title_rule,
    },
    Rule {
        reason: Reason::Numbering,
        apply: numbered_style_rule,
    },
    Rule {
        reason: Reason::Style,
        apply: style_rule,
    },
    Rule {
        reason: Reason::Numbering,
        apply: numbering_rule,
    },
];

fn empty_rule(ctx: &ClassifierContext<'_>, i: usize) -> Option<Label> {
    ctx.fragment(i).is_blank().then_some(Label::Body)
}

fn boilerplate_rule(ctx: &ClassifierContext<'_>, i: usize) -> Option<Label> {
    ctx.boilerplate[i].then_some(Label::Body)
}

fn title_rule(ctx: &ClassifierContext<'_>, i: usize) -> Option<Label> {
    ctx.title.contains(i).then_some(Label::Title)
}

/// Level of the fragment's style, if it is a heading style and the text is
/// short enough to be one.
fn style_level(ctx: &ClassifierContext<'_>, i: usize) -> Option<HeadingLevel> {
    let fragment = ctx.fragment(i);
    if word_count(&fragment.text) > ctx.options.max_heading_words
        || !has_alphanumeric(&fragment.text)
    {
        return None;
    }
    ctx.levels.get(&style_of(fragment))
}

// Bold at body size on its own line: numbering decides the depth since the
// style alone cannot
fn numbered_style_rule(ctx: &ClassifierContext<'_>, i: usize) -> Option<Label> {
    style_level(ctx, i)?;
    if !ctx.at_body_size(i) || !ctx.alone_on_line(i) {
        return None;
    }
    ctx.numbering_depth(i).map(Label::Heading)
}

fn style_rule(ctx: &ClassifierContext<'_>, i: usize) -> Option<Label> {
    let level = style_level(ctx, i)?;
    if ctx.at_body_size(i) && !ctx.alone_on_line(i) {
        return None;
    }
    Some(Label::Heading(level))
}

fn numbering_rule(ctx: &ClassifierContext<'_>, i: usize) -> Option<Label> {
    let fragment = ctx.fragment(i);
    let body = ctx.profile.body_key?;
    if ctx.size_key(i) < body
        || word_count(&fragment.text) > ctx.options.max_numbered_words
        || ends_with_sentence_punctuation(&fragment.text)
    {
        return None;
    }
    ctx.numbering_depth(i).map(Label::Heading)
}

/// Label every fragment, in reading order.
pub fn classify(ctx: &ClassifierContext<'_>) -> Vec<ClassifiedFragment> {
    (0..ctx.order.len())
        .map(|i| {
            let (label, reason) = RULES
                .iter()
                .find_map(|rule| (rule.apply)(ctx, i).map(|label| (label, rule.reason)))
                .unwrap_or((Label::Body, Reason::Fallback));

            if label.is_heading() || label == Label::Title {
                log::debug!(
                    "{} via {:?} on page {}: {:?}",
                    label,
                    reason,
                    ctx.fragment(i).page,
                    ctx.fragment(i).text
                );
            }
            ClassifiedFragment::new(ctx.fragment(i).clone(), label, reason)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn at(text: &str, x: f32, y: f32, size: f32, bold: bool) -> TextFragment {
        TextFragment::at_baseline(text, 0, x, y, 100.0, size, "Helvetica").with_bold(bold)
    }

    fn classify_all(fragments: Vec<TextFragment>, boilerplate: Vec<bool>) -> Vec<ClassifiedFragment> {
        let options = OutlineOptions::default();
        let order = ReadingOrder::build(fragments, options.line_tolerance);
        let (profile, _) = StyleProfile::build(order.fragments(), None);
        let levels = profile.level_map(&HashSet::new(), options.max_depth);
        let numbering = NumberingDetector::new();
        let title = TitleSet::default();
        let boilerplate = if boilerplate.is_empty() {
            vec![false; order.len()]
        } else {
            boilerplate
        };
        classify(&ClassifierContext {
            order: &order,
            profile: &profile,
            levels: &levels,
            boilerplate: &boilerplate,
            title: &title,
            numbering: &numbering,
            options: &options,
        })
    }

    fn body_lines(count: usize, top: f32) -> Vec<TextFragment> {
        (0..count)
            .map(|n| at("plain paragraph text line", 72.0, top - n as f32 * 14.0, 10.0, false))
            .collect()
    }

    #[test]
    fn test_style_levels() {
        let mut fragments = vec![
            at("Chapter Heading", 72.0, 700.0, 18.0, true),
            at("Sub Heading", 72.0, 650.0, 14.0, true),
        ];
        fragments.extend(body_lines(3, 600.0));
        let out = classify_all(fragments, vec![]);

        assert_eq!(out[0].label, Label::Heading(HeadingLevel::new(1)));
        assert_eq!(out[0].reason, Reason::Style);
        assert_eq!(out[1].label, Label::Heading(HeadingLevel::new(2)));
        assert!(out[2..].iter().all(|c| c.label == Label::Body));
    }

    #[test]
    fn test_bold_run_in_is_body() {
        let mut fragments = vec![
            at("Section Heading", 72.0, 740.0, 14.0, true),
            at("Note:", 72.0, 700.0, 10.0, true),
            at("the rest of the sentence", 110.0, 700.0, 10.0, false),
            at("Standalone Bold", 72.0, 680.0, 10.0, true),
        ];
        fragments.extend(body_lines(3, 650.0));
        let out = classify_all(fragments, vec![]);

        assert_eq!(text_label(&out[1]), ("Note:", Label::Body));
        assert_eq!(
            text_label(&out[3]),
            ("Standalone Bold", Label::Heading(HeadingLevel::new(2)))
        );
    }

    #[test]
    fn test_numbering_at_body_size() {
        let mut fragments = vec![
            at("1 Overview", 72.0, 700.0, 10.0, false),
            at("1.1 Scope", 72.0, 680.0, 10.0, false),
            at("1.1.1 Terms", 72.0, 660.0, 10.0, false),
            at("2 apples were bought.", 72.0, 640.0, 10.0, false),
        ];
        fragments.extend(body_lines(3, 600.0));
        let out = classify_all(fragments, vec![]);

        let levels: Vec<_> = out[..3].iter().map(|c| c.label.level().map(|l| l.get())).collect();
        assert_eq!(levels, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(out[0].reason, Reason::Numbering);
        assert_eq!(out[3].label, Label::Body);
    }

    #[test]
    fn test_boilerplate_vetoes_heading_style() {
        let mut fragments = vec![at("Big Running Header", 72.0, 770.0, 18.0, true)];
        fragments.extend(body_lines(3, 600.0));
        let out = classify_all(fragments, vec![true, false, false, false]);
        assert_eq!(out[0].label, Label::Body);
        assert_eq!(out[0].reason, Reason::Boilerplate);
    }

    #[test]
    fn test_prose_is_never_heading() {
        let long = vec!["word"; 60].join(" ");
        let mut fragments = vec![at(&long, 72.0, 700.0, 18.0, true)];
        fragments.extend(body_lines(3, 600.0));
        let out = classify_all(fragments, vec![]);
        assert_eq!(out[0].label, Label::Body);
        assert_eq!(out[0].reason, Reason::Fallback);
    }

    #[test]
    fn test_empty_text_is_body() {
        let mut fragments = vec![at("   ", 72.0, 700.0, 18.0, true)];
        fragments.extend(body_lines(2, 600.0));
        let out = classify_all(fragments, vec![]);
        assert_eq!(out[0].reason, Reason::Empty);
    }

    #[test]
    fn test_numbered_bold_at_body_size_takes_numbering_depth() {
        let mut fragments = vec![
            at("Chapter Heading", 72.0, 740.0, 18.0, true),
            at("3.1.2 Results", 72.0, 700.0, 10.0, true),
            at("Standalone Bold", 72.0, 680.0, 10.0, true),
        ];
        fragments.extend(body_lines(3, 650.0));
        let out = classify_all(fragments, vec![]);

        assert_eq!(out[1].label, Label::Heading(HeadingLevel::new(3)));
        assert_eq!(out[1].reason, Reason::Numbering);
        assert_eq!(out[2].label, Label::Heading(HeadingLevel::new(2)));
        assert_eq!(out[2].reason, Reason::Style);
    }

    fn text_label(c: &ClassifiedFragment) -> (&str, Label) {
        (c.fragment.text.as_str(), c.label)
    }
}
