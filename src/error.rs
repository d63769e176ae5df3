//! Error and warning types for pdf-outline.
//!
//! The outline core never fails: anomalies in the fragment stream are
//! absorbed and reported as [`Warning`]s. [`Error`] is reserved for the
//! boundaries (reading files, loading PDFs, parsing input JSON, rendering).

use std::fmt;
use std::io;
use thiserror::Error;

/// Result type alias for pdf-outline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the edges of outline extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and cannot be read.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Input JSON (fragments or an outline) could not be read.
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering (JSON, text, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

/// A recoverable anomaly recorded while building an outline.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A fragment was dropped because it cannot be placed or measured.
    MalformedFragment {
        /// Position of the fragment in the input sequence
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The document has fewer than two distinct font sizes, so no heading
    /// styles could be derived.
    AmbiguousStyleProfile {
        /// Number of distinct (0.1 pt bucketed) sizes seen
        distinct_sizes: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MalformedFragment { index, reason } => {
                write!(f, "dropped fragment #{}: {}", index, reason)
            }
            Warning::AmbiguousStyleProfile { distinct_sizes } => write!(
                f,
                "only {} distinct font size(s); no heading styles derived",
                distinct_sizes
            ),
        }
    }
}
