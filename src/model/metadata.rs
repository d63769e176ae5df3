//! Document information dictionary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata read from the PDF trailer and info dictionary.
///
/// Informational only: the outline title is always derived from the page
/// content, never from `/Title`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// `/Title` entry
    pub title: Option<String>,

    /// `/Author` entry
    pub author: Option<String>,

    /// `/Creator` application
    pub creator: Option<String>,

    /// `/Producer` application
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Create new metadata with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }

    /// `(label, value)` pairs for the fields that are present.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("PDF version", self.pdf_version.clone()),
            ("Pages", self.page_count.to_string()),
        ];
        if let Some(ref title) = self.title {
            rows.push(("Title", title.clone()));
        }
        if let Some(ref author) = self.author {
            rows.push(("Author", author.clone()));
        }
        if let Some(ref creator) = self.creator {
            rows.push(("Creator", creator.clone()));
        }
        if let Some(ref producer) = self.producer {
            rows.push(("Producer", producer.clone()));
        }
        if let Some(ref created) = self.created {
            rows.push(("Created", created.to_rfc3339()));
        }
        if self.encrypted {
            rows.push(("Encrypted", "yes".to_string()));
        }
        rows
    }
}
