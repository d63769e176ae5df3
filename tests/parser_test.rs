//! Integration tests for PDF fragment extraction.

mod common;

use common::{build_pdf, report_pages, Bookmark, Line, PdfSpec};
use pdf_outline::{
    is_pdf, outline_bytes, Error, OutlineEntry, Outliner, PageSelection, ParseOptions, PdfParser,
};

#[test]
fn test_extracts_fragments_and_frames() {
    let data = build_pdf(&report_pages(), &PdfSpec::default());
    assert!(is_pdf(&data));

    let parser = PdfParser::from_bytes(&data).unwrap();
    assert_eq!(parser.page_count(), 2);

    let extracted = parser.extract().unwrap();
    assert_eq!(extracted.frames.len(), 2);
    assert_eq!(extracted.frames[0].width, 612.0);
    assert_eq!(extracted.frames[0].height, 792.0);
    assert_eq!(extracted.fragments.len(), 8);

    let title = &extracted.fragments[0];
    assert_eq!(title.text, "Annual Report");
    assert_eq!(title.page, 0);
    assert_eq!(title.font_size, 24.0);
    assert!(title.is_bold);
    assert_eq!(title.baseline_y, 720.0);
    assert_eq!(title.bbox.x0, 72.0);

    let body = &extracted.fragments[2];
    assert!(!body.is_bold);
    assert_eq!(body.font_size, 12.0);

    assert!(extracted.fragments[5..].iter().all(|f| f.page == 1));
}

#[test]
fn test_outline_from_pdf_bytes() {
    let data = build_pdf(&report_pages(), &PdfSpec::default());
    let doc = outline_bytes(&data).unwrap();

    assert_eq!(doc.title, "Annual Report");
    assert_eq!(
        doc.outline,
        vec![
            OutlineEntry::new(1, "1. Introduction", 0),
            OutlineEntry::new(1, "2. Methods", 1),
        ]
    );
}

#[test]
fn test_page_selection() {
    let data = build_pdf(&report_pages(), &PdfSpec::default());
    let options = ParseOptions::new().with_pages(PageSelection::Pages(vec![2]));
    let parser = PdfParser::from_bytes_with_options(&data, options).unwrap();
    let extracted = parser.extract().unwrap();

    assert_eq!(extracted.frames.len(), 1);
    assert_eq!(extracted.frames[0].page, 1);
    assert!(extracted.fragments.iter().all(|f| f.page == 1));
}

#[test]
fn test_metadata() {
    let spec = PdfSpec {
        info_title: Some("Info Title"),
        ..Default::default()
    };
    let data = build_pdf(&report_pages(), &spec);
    let metadata = PdfParser::from_bytes(&data).unwrap().metadata();

    assert_eq!(metadata.title.as_deref(), Some("Info Title"));
    assert_eq!(metadata.page_count, 2);
    assert!(!metadata.encrypted);
}

#[test]
fn test_bookmarks_preferred_when_enabled() {
    let spec = PdfSpec {
        bookmarks: vec![Bookmark::new("Opening", 0), Bookmark::new("Approach", 1)],
        ..Default::default()
    };
    let data = build_pdf(&report_pages(), &spec);

    let parser = PdfParser::from_bytes(&data).unwrap();
    assert_eq!(
        parser.bookmarks(),
        vec![
            OutlineEntry::new(1, "Opening", 0),
            OutlineEntry::new(1, "Approach", 1),
        ]
    );

    let with = Outliner::new().with_bookmarks(true).parse_bytes(&data).unwrap();
    assert!(with.from_bookmarks);
    assert_eq!(with.document.outline[1].text, "Approach");
    assert_eq!(with.document.title, "Annual Report");

    let without = Outliner::new().parse_bytes(&data).unwrap();
    assert!(!without.from_bookmarks);
    assert_eq!(without.document.outline[1].text, "2. Methods");
}

#[test]
fn test_bookmarks_follow_page_selection_and_depth() {
    let spec = PdfSpec {
        bookmarks: vec![
            Bookmark::new("Opening", 0).with_children(vec![
                Bookmark::new("Scope", 0).with_children(vec![Bookmark::new("Terms", 0)]),
                Bookmark::new("Late Note", 1),
            ]),
            Bookmark::new("Approach", 1).with_children(vec![Bookmark::new("Tools", 1)]),
        ],
        ..Default::default()
    };
    let data = build_pdf(&report_pages(), &spec);

    let capped = Outliner::new()
        .with_bookmarks(true)
        .with_max_depth(2)
        .parse_bytes(&data)
        .unwrap();
    let levels: Vec<u8> = capped.document.outline.iter().map(|e| e.level.get()).collect();
    assert_eq!(levels, vec![1, 2, 2, 2, 1, 2]);

    let second_page = Outliner::new()
        .with_bookmarks(true)
        .with_pages(PageSelection::Pages(vec![2]))
        .parse_bytes(&data)
        .unwrap();
    assert_eq!(
        second_page.document.outline,
        vec![
            OutlineEntry::new(1, "Late Note", 1),
            OutlineEntry::new(1, "Approach", 1),
            OutlineEntry::new(2, "Tools", 1),
        ]
    );
}

#[test]
fn test_offset_media_box() {
    let chapter_page = |heading: &'static str| {
        vec![
            Line::bold(heading, 18, 720),
            Line::regular("Notes gathered during the survey are listed here.", 12, 690),
            Line::regular("Every observation was checked by a second person.", 12, 676),
            Line::regular("Doubtful sightings are marked and kept separate.", 12, 662),
            Line::bold("Confidential Draft", 18, 110),
        ]
    };
    let pages = vec![
        vec![
            Line::bold("Field Notes", 24, 820),
            Line::bold("Chapter 1", 18, 740),
            Line::regular("The survey covered the northern valley in spring.", 12, 710),
            Line::regular("Weather was mild and the paths were mostly dry.", 12, 696),
            Line::regular("Most sites were visited twice over three weeks.", 12, 682),
            Line::bold("Confidential Draft", 18, 110),
        ],
        chapter_page("Chapter 2"),
        chapter_page("Chapter 3"),
    ];
    let spec = PdfSpec {
        media_bottom: 100,
        ..Default::default()
    };
    let data = build_pdf(&pages, &spec);

    let extracted = PdfParser::from_bytes(&data).unwrap().extract().unwrap();
    assert_eq!(extracted.frames[0].bottom, 100.0);
    assert_eq!(extracted.frames[0].height, 792.0);
    assert_eq!(extracted.frames[0].top(), 892.0);

    let doc = outline_bytes(&data).unwrap();
    assert_eq!(doc.title, "Field Notes");
    assert_eq!(
        doc.outline,
        vec![
            OutlineEntry::new(1, "Chapter 1", 0),
            OutlineEntry::new(1, "Chapter 2", 1),
            OutlineEntry::new(1, "Chapter 3", 2),
        ]
    );
}

#[test]
fn test_page_without_text() {
    let pages = vec![vec![], vec![Line::regular("Only text", 12, 700)]];
    let data = build_pdf(&pages, &PdfSpec::default());
    let extracted = PdfParser::from_bytes(&data).unwrap().extract().unwrap();

    assert_eq!(extracted.frames.len(), 2);
    assert_eq!(extracted.fragments.len(), 1);
    assert_eq!(extracted.fragments[0].page, 1);
}

#[test]
fn test_rejects_non_pdf() {
    assert!(matches!(
        PdfParser::from_bytes(b"<!DOCTYPE html><html></html>"),
        Err(Error::UnknownFormat)
    ));
    assert!(matches!(PdfParser::from_bytes(&[]), Err(Error::UnknownFormat)));
}
