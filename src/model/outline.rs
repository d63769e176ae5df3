//! Outline types: the finished product of the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Heading depth, 1 being the outermost level.
///
/// Serialized as `"H1"`, `"H2"`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Outermost heading level.
    pub const H1: HeadingLevel = HeadingLevel(1);

    /// Create a level, clamping zero up to 1.
    pub fn new(level: u8) -> Self {
        Self(level.max(1))
    }

    /// Numeric depth (1-based).
    pub fn get(self) -> u8 {
        self.0
    }

    /// The level one step deeper.
    pub fn deeper(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self::H1
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{}", self.0)
    }
}

impl FromStr for HeadingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix('H')
            .or_else(|| s.trim().strip_prefix('h'))
            .ok_or_else(|| format!("invalid heading level: {s:?}"))?;
        match digits.parse::<u8>() {
            Ok(n) if n >= 1 => Ok(Self(n)),
            _ => Err(format!("invalid heading level: {s:?}")),
        }
    }
}

impl Serialize for HeadingLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HeadingLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading depth
    pub level: HeadingLevel,
    /// Whitespace-normalized heading text
    pub text: String,
    /// Page index (0-based unless re-based at emission)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new entry.
    pub fn new(level: u8, text: impl Into<String>, page: u32) -> Self {
        Self {
            level: HeadingLevel::new(level),
            text: text.into(),
            page,
        }
    }
}

/// A document title plus its flat, ordered list of headings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineDocument {
    /// Document title (empty when none was detected)
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl OutlineDocument {
    /// Create a document with a title and entries.
    pub fn new(title: impl Into<String>, outline: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            outline,
        }
    }

    /// Number of outline entries.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Check if there are no outline entries.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Check that no entry skips a level: the first entry is H1 and every
    /// later one is at most one level deeper than its predecessor.
    pub fn is_well_formed(&self) -> bool {
        let mut last = 0u8;
        for entry in &self.outline {
            if entry.level.get() > last.saturating_add(1) {
                return false;
            }
            last = entry.level.get();
        }
        true
    }

    /// Deepest level used, or 0 for an empty outline.
    pub fn max_depth(&self) -> u8 {
        self.outline.iter().map(|e| e.level.get()).max().unwrap_or(0)
    }

    /// Copy of this document with every page number shifted by `offset`.
    pub fn with_page_offset(&self, offset: u32) -> Self {
        Self {
            title: self.title.clone(),
            outline: self
                .outline
                .iter()
                .map(|e| OutlineEntry {
                    page: e.page + offset,
                    ..e.clone()
                })
                .collect(),
        }
    }

    /// Build the nested heading tree implied by the levels.
    pub fn tree(&self) -> Vec<OutlineNode> {
        let mut roots: Vec<OutlineNode> = Vec::new();
        for entry in &self.outline {
            insert_node(&mut roots, entry.clone());
        }
        roots
    }
}

/// A heading with its nested subheadings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    /// The heading itself
    pub entry: OutlineEntry,
    /// Subheadings in order
    pub children: Vec<OutlineNode>,
}

fn insert_node(siblings: &mut Vec<OutlineNode>, entry: OutlineEntry) {
    if let Some(last) = siblings.last_mut() {
        if entry.level > last.entry.level {
            insert_node(&mut last.children, entry);
            return;
        }
    }
    siblings.push(OutlineNode {
        entry,
        children: Vec::new(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_serde() {
        let entry = OutlineEntry::new(2, "Methods", 3);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"level":"H2","text":"Methods","page":3}"#);

        let back: OutlineEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_heading_level_rejects_garbage() {
        assert!("H0".parse::<HeadingLevel>().is_err());
        assert!("2".parse::<HeadingLevel>().is_err());
        assert!("Hx".parse::<HeadingLevel>().is_err());
        assert_eq!("h3".parse::<HeadingLevel>().unwrap().get(), 3);
    }

    #[test]
    fn test_well_formed() {
        let ok = OutlineDocument::new(
            "T",
            vec![
                OutlineEntry::new(1, "a", 0),
                OutlineEntry::new(2, "b", 0),
                OutlineEntry::new(3, "c", 1),
                OutlineEntry::new(1, "d", 2),
            ],
        );
        assert!(ok.is_well_formed());

        let skips = OutlineDocument::new("T", vec![OutlineEntry::new(2, "a", 0)]);
        assert!(!skips.is_well_formed());
        assert!(OutlineDocument::default().is_well_formed());
    }

    #[test]
    fn test_tree() {
        let doc = OutlineDocument::new(
            "",
            vec![
                OutlineEntry::new(1, "One", 0),
                OutlineEntry::new(2, "One.A", 0),
                OutlineEntry::new(2, "One.B", 1),
                OutlineEntry::new(1, "Two", 2),
            ],
        );
        let tree = doc.tree();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[1].entry.text, "One.B");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_page_offset() {
        let doc = OutlineDocument::new("T", vec![OutlineEntry::new(1, "a", 0)]);
        let shifted = doc.with_page_offset(1);
        assert_eq!(shifted.outline[0].page, 1);
        assert_eq!(doc.outline[0].page, 0);
    }
}
