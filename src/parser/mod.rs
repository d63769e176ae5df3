//! Fragment extraction: PDF content streams (lopdf) or fragment JSON.

mod content;
mod fragments_json;
mod options;
mod pdf_parser;

pub use fragments_json::{parse_fragments_json, FragmentInput};
pub use options::{ErrorMode, PageSelection, ParseOptions};
pub use pdf_parser::{is_pdf, ExtractedDocument, PdfParser};
