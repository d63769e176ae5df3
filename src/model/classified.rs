//! Per-fragment classification results.

use std::fmt;

use super::{HeadingLevel, TextFragment};

/// Role assigned to a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    /// Part of the document title
    Title,
    /// A heading at the given level
    Heading(HeadingLevel),
    /// Everything else
    Body,
}

impl Label {
    /// Check if this is a heading label.
    pub fn is_heading(&self) -> bool {
        matches!(self, Label::Heading(_))
    }

    /// Heading level, if any.
    pub fn level(&self) -> Option<HeadingLevel> {
        match self {
            Label::Heading(level) => Some(*level),
            _ => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Title => write!(f, "TITLE"),
            Label::Heading(level) => write!(f, "HEADING({})", level),
            Label::Body => write!(f, "BODY"),
        }
    }
}

/// Which rule produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// No visible text
    Empty,
    /// Repeated header or footer
    Boilerplate,
    /// Member of the title set
    Title,
    /// Font style matched a heading candidate
    Style,
    /// Leading numbering pattern
    Numbering,
    /// No rule matched
    Fallback,
}

/// A fragment together with the label the classifier gave it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedFragment {
    /// The source fragment
    pub fragment: TextFragment,
    /// Assigned role
    pub label: Label,
    /// Rule that fired
    pub reason: Reason,
}

impl ClassifiedFragment {
    /// Pair a fragment with its label.
    pub fn new(fragment: TextFragment, label: Label, reason: Reason) -> Self {
        Self {
            fragment,
            label,
            reason,
        }
    }
}
