//! PDF fragment extractor using lopdf.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{Metadata, OutlineEntry, PageFrame, TextFragment};

use super::content::extract_page_fragments;
use super::options::{ErrorMode, ParseOptions};

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";

/// How far into the file the header may start (some writers emit junk first).
const HEADER_SEARCH_LIMIT: usize = 1024;

/// Check if the data starts with a PDF header.
pub fn is_pdf(data: &[u8]) -> bool {
    let window = &data[..data.len().min(HEADER_SEARCH_LIMIT)];
    window
        .windows(PDF_MAGIC.len())
        .any(|w| w == PDF_MAGIC)
}

/// Everything extracted from one PDF.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    /// Text fragments of the selected pages (pages 0-based)
    pub fragments: Vec<TextFragment>,
    /// MediaBox of every selected page
    pub frames: Vec<PageFrame>,
    /// Info dictionary
    pub metadata: Metadata,
    /// Flattened `/Outlines` tree, empty when the document has none
    pub bookmarks: Vec<OutlineEntry>,
}

/// PDF document parser.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        if !is_pdf(data) {
            return Err(Error::UnknownFormat);
        }

        let doc = LopdfDocument::load_mem(data)?;

        // lopdf 0.34 cannot decrypt with a user password
        if options.password.is_some() && doc.is_encrypted() {
            log::warn!("Password was provided but lopdf 0.34 doesn't support decryption");
        }

        Ok(Self { doc, options })
    }

    /// Parse a PDF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a PDF from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Extract fragments, page frames, metadata and bookmarks.
    pub fn extract(&self) -> Result<ExtractedDocument> {
        let pages = self.doc.get_pages();
        let mut extracted = ExtractedDocument {
            metadata: self.metadata(),
            ..Default::default()
        };

        for (&page_num, &page_id) in pages.iter() {
            if !self.options.pages.includes(page_num) {
                continue;
            }
            let index = page_num - 1;
            extracted.frames.push(self.page_frame(page_id, index));

            match extract_page_fragments(&self.doc, page_id, index) {
                Ok(fragments) => extracted.fragments.extend(fragments),
                Err(e) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to extract text from page {}: {}", page_num, e);
                }
            }
        }

        if self.options.use_bookmarks {
            extracted.bookmarks = self
                .bookmarks()
                .into_iter()
                .filter(|entry| self.options.pages.includes(entry.page + 1))
                .collect();
        }

        log::debug!(
            "Extracted {} fragment(s) from {} page(s)",
            extracted.fragments.len(),
            extracted.frames.len()
        );
        Ok(extracted)
    }

    /// Read the info dictionary.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.doc.version.to_string());
        metadata.page_count = self.page_count();
        metadata.encrypted = self.doc.is_encrypted();

        let info = self
            .doc
            .trailer
            .get(b"Info")
            .ok()
            .and_then(|info| self.resolve_dict(info));

        if let Some(info) = info {
            metadata.title = get_string_from_dict(info, b"Title");
            metadata.author = get_string_from_dict(info, b"Author");
            metadata.creator = get_string_from_dict(info, b"Creator");
            metadata.producer = get_string_from_dict(info, b"Producer");
            metadata.created =
                get_string_from_dict(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
        }

        metadata
    }

    /// Flatten the document's own outline (bookmarks) into entries.
    ///
    /// Bookmarks whose destination cannot be resolved point at page 0.
    pub fn bookmarks(&self) -> Vec<OutlineEntry> {
        let mut entries = Vec::new();

        let first = self
            .doc
            .catalog()
            .ok()
            .and_then(|catalog| catalog.get(b"Outlines").ok())
            .and_then(|outlines| self.resolve_dict(outlines))
            .and_then(|outlines| outlines.get(b"First").ok())
            .and_then(|first| first.as_reference().ok());

        if let Some(first) = first {
            let page_numbers: HashMap<ObjectId, u32> = self
                .doc
                .get_pages()
                .into_iter()
                .map(|(num, id)| (id, num))
                .collect();
            let mut visited = HashSet::new();
            self.collect_bookmarks(first, 1, &page_numbers, &mut visited, &mut entries);
        }

        entries
    }

    /// Walk an outline item, its children (First) and its siblings (Next).
    fn collect_bookmarks(
        &self,
        start: ObjectId,
        depth: u8,
        page_numbers: &HashMap<ObjectId, u32>,
        visited: &mut HashSet<ObjectId>,
        entries: &mut Vec<OutlineEntry>,
    ) {
        let mut next = Some(start);
        while let Some(item_ref) = next.take() {
            // Malformed files can link items in a cycle
            if !visited.insert(item_ref) {
                break;
            }
            let Ok(item) = self.doc.get_dictionary(item_ref) else {
                break;
            };

            let title = get_string_from_dict(item, b"Title").unwrap_or_default();
            let page = self
                .destination_page(item, page_numbers)
                .map(|num| num.saturating_sub(1))
                .unwrap_or(0);
            let text = title.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                entries.push(OutlineEntry::new(depth, text, page));
            }

            if let Ok(child) = item.get(b"First").and_then(Object::as_reference) {
                self.collect_bookmarks(
                    child,
                    depth.saturating_add(1),
                    page_numbers,
                    visited,
                    entries,
                );
            }

            next = item.get(b"Next").and_then(Object::as_reference).ok();
        }
    }

    /// 1-based page number an outline item points at.
    fn destination_page(
        &self,
        item: &Dictionary,
        page_numbers: &HashMap<ObjectId, u32>,
    ) -> Option<u32> {
        let dest = match item.get(b"Dest") {
            Ok(dest) => dest,
            Err(_) => {
                let action = item.get(b"A").ok().and_then(|a| self.resolve_dict(a))?;
                action.get(b"D").ok()?
            }
        };

        let dest = match dest {
            Object::Reference(r) => self.doc.get_object(*r).ok()?,
            other => other,
        };
        let page_ref = dest.as_array().ok()?.first()?.as_reference().ok()?;
        page_numbers.get(&page_ref).copied()
    }

    /// MediaBox extents, following inherited values, defaulting to Letter.
    fn page_frame(&self, page_id: ObjectId, index: u32) -> PageFrame {
        let mut current = self.doc.get_dictionary(page_id).ok();
        let mut hops = 0;

        while let Some(dict) = current {
            if let Ok(media_box) = dict.get(b"MediaBox").and_then(Object::as_array) {
                let values: Vec<f32> = media_box.iter().filter_map(as_number).collect();
                if values.len() >= 4 {
                    return PageFrame::from_media_box(
                        index,
                        [values[0], values[1], values[2], values[3]],
                    );
                }
            }
            hops += 1;
            if hops > 32 {
                break;
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .ok()
                .and_then(|parent| self.doc.get_dictionary(parent).ok());
        }

        PageFrame::letter(index)
    }

    /// Dictionary behind a direct object or a reference.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get PDF version.
    pub fn version(&self) -> String {
        self.doc.version.to_string()
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Helper to get a string from a PDF dictionary.
fn get_string_from_dict(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Text strings are UTF-16BE with a BOM, otherwise UTF-8 or Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    // At minimum we need YYYY
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
