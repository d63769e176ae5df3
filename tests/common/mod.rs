//! Shared helpers for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use pdf_outline::TextFragment;

/// One line of text to place on a synthetic page.
pub struct Line {
    pub text: &'static str,
    pub bold: bool,
    pub size: i64,
    pub x: i64,
    pub y: i64,
}

impl Line {
    pub fn regular(text: &'static str, size: i64, y: i64) -> Self {
        Self {
            text,
            bold: false,
            size,
            x: 72,
            y,
        }
    }

    pub fn bold(text: &'static str, size: i64, y: i64) -> Self {
        Self {
            text,
            bold: true,
            size,
            x: 72,
            y,
        }
    }
}

/// A bookmark pointing at a page index, with optional children.
pub struct Bookmark {
    pub title: &'static str,
    pub page: usize,
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    pub fn new(title: &'static str, page: usize) -> Self {
        Self {
            title,
            page,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Bookmark>) -> Self {
        self.children = children;
        self
    }
}

/// Options for [`build_pdf`].
#[derive(Default)]
pub struct PdfSpec {
    /// Value of `/Title` in the info dictionary
    pub info_title: Option<&'static str>,
    /// Document outline
    pub bookmarks: Vec<Bookmark>,
    /// Lower edge of every MediaBox; the page stays 792 pt tall
    pub media_bottom: i64,
}

/// Build a Letter-size PDF in memory. `F1` is Helvetica, `F2` is
/// Helvetica-Bold.
pub fn build_pdf(pages: &[Vec<Line>], spec: &PdfSpec) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for line in lines {
            let font = if line.bold { "F2" } else { "F1" };
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(line.size)],
            ));
            operations.push(Operation::new(
                "Td",
                vec![Object::Integer(line.x), Object::Integer(line.y)],
            ));
            operations.push(Operation::new("Tj", vec![Object::string_literal(line.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(spec.media_bottom),
                Object::Integer(612),
                Object::Integer(spec.media_bottom + 792),
            ],
        });
        page_ids.push(page_id);
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_ids.len() as i64),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !spec.bookmarks.is_empty() {
        let outlines_id = doc.new_object_id();
        let (first, last) = add_bookmarks(&mut doc, &spec.bookmarks, outlines_id, &page_ids);
        doc.objects.insert(
            outlines_id,
            Object::Dictionary(dictionary! {
                "Type" => "Outlines",
                "First" => first,
                "Last" => last,
                "Count" => Object::Integer(spec.bookmarks.len() as i64),
            }),
        );
        catalog.set("Outlines", outlines_id);
    }
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", catalog_id);

    if let Some(title) = spec.info_title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

/// Add sibling items under `parent`; returns the first and last item ids.
fn add_bookmarks(
    doc: &mut Document,
    bookmarks: &[Bookmark],
    parent: ObjectId,
    page_ids: &[ObjectId],
) -> (ObjectId, ObjectId) {
    let item_ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();

    for (i, bookmark) in bookmarks.iter().enumerate() {
        let mut item = dictionary! {
            "Title" => Object::string_literal(bookmark.title),
            "Parent" => parent,
            "Dest" => vec![
                Object::Reference(page_ids[bookmark.page]),
                Object::Name(b"Fit".to_vec()),
            ],
        };
        if i > 0 {
            item.set("Prev", item_ids[i - 1]);
        }
        if i + 1 < item_ids.len() {
            item.set("Next", item_ids[i + 1]);
        }
        if !bookmark.children.is_empty() {
            let (first, last) = add_bookmarks(doc, &bookmark.children, item_ids[i], page_ids);
            item.set("First", first);
            item.set("Last", last);
            item.set("Count", Object::Integer(bookmark.children.len() as i64));
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(item));
    }

    (item_ids[0], item_ids[item_ids.len() - 1])
}

/// A short report: title, two numbered sections, body text.
pub fn report_pages() -> Vec<Vec<Line>> {
    vec![
        vec![
            Line::bold("Annual Report", 24, 720),
            Line::bold("1. Introduction", 18, 650),
            Line::regular("This report covers the results of the year.", 12, 620),
            Line::regular("It is organised in two short sections here.", 12, 606),
            Line::regular("Each section starts on its own line below.", 12, 592),
        ],
        vec![
            Line::bold("2. Methods", 18, 700),
            Line::regular("We measured everything that could be measured.", 12, 670),
            Line::regular("Then we measured it again to be quite sure.", 12, 656),
        ],
    ]
}

/// Fragment at a baseline with a regular or bold Helvetica face.
pub fn line(text: &str, page: u32, baseline: f32, size: f32, bold: bool) -> TextFragment {
    let font = if bold { "Helvetica-Bold" } else { "Helvetica" };
    let width = text.chars().count() as f32 * size * 0.5;
    TextFragment::at_baseline(text, page, 72.0, baseline, width, size, font)
}
