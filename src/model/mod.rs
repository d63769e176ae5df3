//! Data model shared by the extractor, the outline pipeline and the emitters.
//!
//! Fragments flow in, classified fragments are an intermediate product, and
//! an [`OutlineDocument`] is the only thing that flows out.

mod classified;
mod fragment;
mod metadata;
mod outline;

pub use classified::{ClassifiedFragment, Label, Reason};
pub use fragment::{font_style_from_name, BBox, PageFrame, TextFragment};
pub use metadata::Metadata;
pub use outline::{HeadingLevel, OutlineDocument, OutlineEntry, OutlineNode};
