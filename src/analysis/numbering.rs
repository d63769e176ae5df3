//! Leading numbering patterns (`1.2`, `Chapter 3`, `IV.`, `A.1`, `(a)`).

use regex::Regex;

/// Family of a numbering prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingKind {
    /// `1`, `1.`, `1.1`, `1.1.1`
    Decimal,
    /// `Chapter 2`, `Part II`, `Appendix A`
    Chapter,
    /// `Section 4`
    Section,
    /// `IV.`
    Roman,
    /// `A.`, `B.2`
    Lettered,
    /// `(a)`, `b)`
    ParenLetter,
}

/// A detected numbering prefix and the depth it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Numbering {
    /// Pattern family
    pub kind: NumberingKind,
    /// Outline depth implied by the prefix (1-based)
    pub depth: u8,
}

/// Detects numbering prefixes at the start of heading-like text.
pub struct NumberingDetector {
    decimal: Regex,
    chapter: Regex,
    section: Regex,
    roman: Regex,
    lettered: Regex,
    paren_letter: Regex,
}

impl NumberingDetector {
    /// Compile the patterns.
    pub fn new() -> Self {
        Self {
            // A number group must be followed by a capitalized word (or a
            // caseless script) so amounts like "3 apples" do not match
            decimal: Regex::new(r"^(\d{1,3}(?:\.\d{1,3}){0,5})\.?\s+[\p{Lu}\p{Lo}]").unwrap(),
            chapter: Regex::new(r"(?i)^(?:chapter|part|appendix)\s+(?:\d+|[ivxlcdm]+|[a-z])\b")
                .unwrap(),
            section: Regex::new(r"(?i)^section\s+\d+(?:\.\d+)*\b").unwrap(),
            roman: Regex::new(r"^([IVXLCDM]{1,7})\.\s+\S").unwrap(),
            lettered: Regex::new(r"^[A-Z]((?:\.\d{1,3}){1,4}\.?|\.)\s+\S").unwrap(),
            paren_letter: Regex::new(r"^(?:\([a-z]\)|[a-z]\))\s+\S").unwrap(),
        }
    }

    /// Detect a numbering prefix in `text`.
    pub fn detect(&self, text: &str) -> Option<Numbering> {
        let text = text.trim_start();

        if let Some(caps) = self.decimal.captures(text) {
            let depth = caps[1].split('.').count() as u8;
            return Some(Numbering {
                kind: NumberingKind::Decimal,
                depth,
            });
        }
        if self.chapter.is_match(text) {
            return Some(Numbering {
                kind: NumberingKind::Chapter,
                depth: 1,
            });
        }
        if self.section.is_match(text) {
            return Some(Numbering {
                kind: NumberingKind::Section,
                depth: 2,
            });
        }
        if let Some(caps) = self.roman.captures(text) {
            if is_roman_numeral(&caps[1]) {
                return Some(Numbering {
                    kind: NumberingKind::Roman,
                    depth: 1,
                });
            }
        }
        if let Some(caps) = self.lettered.captures(text) {
            let depth = 1 + caps[1].split('.').filter(|g| !g.is_empty()).count() as u8;
            return Some(Numbering {
                kind: NumberingKind::Lettered,
                depth,
            });
        }
        if self.paren_letter.is_match(text) {
            return Some(Numbering {
                kind: NumberingKind::ParenLetter,
                depth: 2,
            });
        }
        None
    }

    /// Check if `text` starts with any numbering prefix.
    pub fn is_numbered(&self, text: &str) -> bool {
        self.detect(text).is_some()
    }
}

impl Default for NumberingDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate an upper-case Roman numeral in canonical form (1..=3999).
fn is_roman_numeral(s: &str) -> bool {
    fn value(c: char) -> Option<u32> {
        Some(match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        })
    }

    let Some(digits) = s.chars().map(value).collect::<Option<Vec<u32>>>() else {
        return false;
    };
    if digits.is_empty() {
        return false;
    }
    let mut total = 0u32;
    for (i, &d) in digits.iter().enumerate() {
        match digits.get(i + 1) {
            Some(&next) if next > d => total = total.wrapping_sub(d),
            _ => total = total.wrapping_add(d),
        }
    }
    (1..4000).contains(&total) && to_roman(total) == s
}

fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for &(value, symbol) in TABLE.iter() {
        while n >= value {
            out.push_str(symbol);
            n -= value;
        }
    }
    out
}
