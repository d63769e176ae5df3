//! Small text predicates shared by the classifier and assembler.

use unicode_normalization::UnicodeNormalization;

/// Key shared by every letterless, digit-only fragment (page numbers).
pub(crate) const PAGE_NUMBER_KEY: &str = "\u{0}page-number";

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Check if the text ends in `. , ; ! ?` (ignoring trailing whitespace).
pub fn ends_with_sentence_punctuation(text: &str) -> bool {
    matches!(
        text.trim_end().chars().last(),
        Some('.' | ',' | ';' | '!' | '?')
    )
}

/// Check if the text contains at least one letter or digit.
pub fn has_alphanumeric(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

/// Comparison key for repeated header/footer text.
///
/// NFKC-normalized, lower-cased, whitespace-collapsed. Text with no letters
/// whose only alphanumerics are digits (`12`, `- 12 -`, `3/40`) maps to a
/// single shared key so running page numbers compare equal.
pub fn boilerplate_key(text: &str) -> String {
    let normalized: String = text.nfkc().collect::<String>().to_lowercase();
    let normalized = normalize_whitespace(&normalized);

    let has_digit = normalized.chars().any(|c| c.is_ascii_digit());
    let has_letter = normalized.chars().any(char::is_alphabetic);
    if has_digit && !has_letter {
        return PAGE_NUMBER_KEY.to_string();
    }
    normalized
}
