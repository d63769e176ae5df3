//! Content stream interpretation: text-showing operators to fragments.
//!
//! Tracks the graphics and text matrices through `q`/`Q`/`cm`, `BT`/`ET`,
//! `Tf`, `TL`, `Td`/`TD`, `Tm`, `T*` and shows text for `Tj`, `TJ`, `'` and
//! `"`. Glyph widths are not read from the font; each character is assumed
//! to advance half the font size.

use std::collections::HashMap;

use lopdf::content::{Content, Operation};
use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::TextFragment;

/// Average glyph advance as a fraction of the font size.
const CHAR_ADVANCE: f32 = 0.5;

/// TJ adjustment (thousandths of a text space unit) treated as a word gap.
const SPACE_THRESHOLD: f32 = 200.0;

/// An affine transform `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        Some(Matrix {
            a: get_number(&operands[0])?,
            b: get_number(&operands[1])?,
            c: get_number(&operands[2])?,
            d: get_number(&operands[3])?,
            e: get_number(&operands[4])?,
            f: get_number(&operands[5])?,
        })
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Translation by `(tx, ty)` applied before `self`.
    fn translated(&self, tx: f32, ty: f32) -> Matrix {
        Matrix {
            e: tx * self.a + ty * self.c + self.e,
            f: tx * self.b + ty * self.d + self.f,
            ..*self
        }
    }

    fn horizontal_scale(&self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }

    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Font resource: base font name (subset prefix removed).
#[derive(Debug, Clone)]
struct FontInfo {
    name: String,
}

/// Text state carried across operators.
#[derive(Debug, Clone)]
struct TextState {
    ctm: Matrix,
    saved: Vec<Matrix>,
    tm: Matrix,
    tlm: Matrix,
    leading: f32,
    font_key: Vec<u8>,
    font_name: String,
    font_size: f32,
    in_text: bool,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            leading: 0.0,
            font_key: Vec::new(),
            font_name: String::new(),
            font_size: 12.0,
            in_text: false,
        }
    }
}

impl TextState {
    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = self.tlm.translated(tx, ty);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        let leading = if self.leading != 0.0 {
            self.leading
        } else {
            self.font_size * 1.2
        };
        self.move_line(0.0, -leading);
    }
}

/// Interprets a page's operations into fragments.
///
/// `decode` turns a string operand into text given the current font
/// resource key.
pub(crate) struct ContentInterpreter<'a, F>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    page: u32,
    fonts: &'a HashMap<Vec<u8>, FontInfo>,
    decode: F,
    state: TextState,
    fragments: Vec<TextFragment>,
}

impl<'a, F> ContentInterpreter<'a, F>
where
    F: Fn(&[u8], &[u8]) -> String,
{
    fn new(page: u32, fonts: &'a HashMap<Vec<u8>, FontInfo>, decode: F) -> Self {
        Self {
            page,
            fonts,
            decode,
            state: TextState::default(),
            fragments: Vec::new(),
        }
    }

    fn run(mut self, operations: &[Operation]) -> Vec<TextFragment> {
        for op in operations {
            self.apply(op);
        }
        self.fragments
    }

    fn apply(&mut self, op: &Operation) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.state.saved.push(self.state.ctm),
            "Q" => {
                if let Some(ctm) = self.state.saved.pop() {
                    self.state.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.ctm = m.then(&self.state.ctm);
                }
            }
            "BT" => {
                self.state.in_text = true;
                self.state.tm = Matrix::IDENTITY;
                self.state.tlm = Matrix::IDENTITY;
            }
            "ET" => self.state.in_text = false,
            "Tf" => {
                if operands.len() >= 2 {
                    if let Object::Name(key) = &operands[0] {
                        self.state.font_name = self
                            .fonts
                            .get(key.as_slice())
                            .map(|info| info.name.clone())
                            .unwrap_or_else(|| String::from_utf8_lossy(key).to_string());
                        self.state.font_key = key.clone();
                    }
                    self.state.font_size = get_number(&operands[1]).unwrap_or(12.0).abs();
                }
            }
            "TL" => {
                if let Some(leading) = operands.first().and_then(get_number) {
                    self.state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if operands.len() >= 2 {
                    let tx = get_number(&operands[0]).unwrap_or(0.0);
                    let ty = get_number(&operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        self.state.leading = -ty;
                    }
                    self.state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.state.tm = m;
                    self.state.tlm = m;
                }
            }
            "T*" => self.state.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = operands.first() {
                    let text = (self.decode)(self.state.font_key.as_slice(), bytes.as_slice());
                    self.show(text, 0.0);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }
            "'" | "\"" => {
                self.state.next_line();
                let index = if op.operator == "\"" { 2 } else { 0 };
                if let Some(Object::String(bytes, _)) = operands.get(index) {
                    let text = (self.decode)(self.state.font_key.as_slice(), bytes.as_slice());
                    self.show(text, 0.0);
                }
            }
            _ => {}
        }
    }

    /// TJ: strings interleaved with positioning adjustments. Large negative
    /// adjustments are word gaps unless the script does not use spaces.
    fn show_array(&mut self, items: &[Object]) {
        let mut combined = String::new();
        let mut adjustment = 0.0;

        for item in items {
            match item {
                Object::String(bytes, _) => {
                    let text = (self.decode)(self.state.font_key.as_slice(), bytes.as_slice());
                    combined.push_str(&text);
                }
                Object::Integer(_) | Object::Real(_) => {
                    let n = get_number(item).unwrap_or(0.0);
                    adjustment -= n / 1000.0 * self.state.font_size;
                    let gap = -n;
                    let ends_in_space = combined.ends_with(' ') || combined.ends_with('\u{00A0}');
                    if gap > SPACE_THRESHOLD && !ends_in_space {
                        if let Some(c) = combined.chars().last() {
                            if !is_spaceless_script_char(c) {
                                combined.push(' ');
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        self.show(combined, adjustment);
    }

    /// Emit a fragment at the current position and advance past it.
    fn show(&mut self, text: String, adjustment: f32) {
        let chars = text.chars().count() as f32;
        let advance = chars * CHAR_ADVANCE * self.state.font_size + adjustment;

        if self.state.in_text && !text.trim().is_empty() {
            let rm = self.state.tm.then(&self.state.ctm);
            let size = self.state.font_size * rm.vertical_scale();
            let width = chars * CHAR_ADVANCE * self.state.font_size * rm.horizontal_scale();
            self.fragments.push(TextFragment::at_baseline(
                text,
                self.page,
                rm.e,
                rm.f,
                width,
                size,
                self.state.font_name.clone(),
            ));
        }

        self.state.tm = self.state.tm.translated(advance, 0.0);
    }
}

/// Extract the text fragments of one page.
///
/// `page_index` is the zero-based index recorded on the fragments.
pub(crate) fn extract_page_fragments(
    doc: &LopdfDocument,
    page_id: ObjectId,
    page_index: u32,
) -> Result<Vec<TextFragment>> {
    let page_fonts = doc
        .get_page_fonts(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let fonts: HashMap<Vec<u8>, FontInfo> = page_fonts
        .iter()
        .map(|(key, font)| {
            let name = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            (key.clone(), FontInfo { name })
        })
        .collect();

    let content = get_page_content(doc, page_id)?;
    let content = Content::decode(&content)
        .map_err(|e| Error::TextExtract(format!("page {}: {}", page_index + 1, e)))?;

    let decode = |font_key: &[u8], bytes: &[u8]| {
        let encoding = page_fonts
            .get(font_key)
            .and_then(|font| font.get_font_encoding(doc).ok());
        match encoding {
            Some(ref enc) => LopdfDocument::decode_text(enc, bytes)
                .unwrap_or_else(|_| decode_text_simple(bytes)),
            None => decode_text_simple(bytes),
        }
    };

    Ok(ContentInterpreter::new(page_index, &fonts, decode).run(&content.operations))
}

/// Concatenated, decompressed content streams of a page.
fn get_page_content(doc: &LopdfDocument, page_id: ObjectId) -> Result<Vec<u8>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::PdfParse(e.to_string()))?;

    let contents = match page_dict.get(b"Contents") {
        Ok(contents) => contents,
        // A page without content is blank, not broken
        Err(_) => return Ok(Vec::new()),
    };

    let stream_data = |id: ObjectId| -> Result<Vec<u8>> {
        match doc.get_object(id) {
            Ok(Object::Stream(s)) => s
                .decompressed_content()
                .or_else(|_| Ok(s.content.clone())),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    };

    match contents {
        Object::Reference(r) => stream_data(*r),
        Object::Array(arr) => {
            let mut content = Vec::new();
            for obj in arr {
                if let Object::Reference(r) = obj {
                    if let Ok(data) = stream_data(*r) {
                        content.extend_from_slice(&data);
                        content.push(b' ');
                    }
                }
            }
            Ok(content)
        }
        _ => Err(Error::PdfParse("Invalid content stream".to_string())),
    }
}

/// Helper to extract a number from a PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Drop a `ABCDEF+` font subset tag.
fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.chars().all(|c| c.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

/// Scripts written without spaces between words (Chinese, Japanese kana).
/// Hangul is not included: Korean uses word spaces.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Decoding fallback when the font has no usable encoding.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        // Latin-1
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn name(s: &str) -> Object {
        Object::Name(s.as_bytes().to_vec())
    }

    fn int(n: i64) -> Object {
        Object::Integer(n)
    }

    fn string(s: &str) -> Object {
        Object::string_literal(s)
    }

    fn interpret(operations: Vec<Operation>) -> Vec<TextFragment> {
        let mut fonts = HashMap::new();
        fonts.insert(
            b"F1".to_vec(),
            FontInfo {
                name: "Helvetica-Bold".to_string(),
            },
        );
        let decode = |_: &[u8], bytes: &[u8]| decode_text_simple(bytes);
        ContentInterpreter::new(2, &fonts, decode).run(&operations)
    }

    #[test]
    fn test_positions_and_fonts() {
        let fragments = interpret(vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), int(24)]),
            op("Td", vec![int(72), int(700)]),
            op("Tj", vec![string("Title")]),
            op("Td", vec![int(0), int(-30)]),
            op("Tj", vec![string("Next")]),
            op("ET", vec![]),
        ]);

        assert_eq!(fragments.len(), 2);
        let title = &fragments[0];
        assert_eq!(title.text, "Title");
        assert_eq!(title.page, 2);
        assert_eq!(title.font_size, 24.0);
        assert!(title.is_bold);
        assert_eq!((title.bbox.x0, title.baseline_y), (72.0, 700.0));
        // 5 chars * 0.5 * 24
        assert!((title.bbox.width() - 60.0).abs() < 1e-3);

        // Td is relative to the start of the line, not the end of the text
        assert_eq!((fragments[1].bbox.x0, fragments[1].baseline_y), (72.0, 670.0));
    }

    #[test]
    fn test_text_matrix_scales_font() {
        let fragments = interpret(vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), int(1)]),
            op(
                "Tm",
                vec![
                    int(12),
                    int(0),
                    int(0),
                    int(12),
                    int(100),
                    int(500),
                ],
            ),
            op("Tj", vec![string("Scaled")]),
            op("ET", vec![]),
        ]);
        assert_eq!(fragments[0].font_size, 12.0);
        assert_eq!(fragments[0].bbox.x0, 100.0);
    }

    #[test]
    fn test_ctm_is_applied() {
        let fragments = interpret(vec![
            op("q", vec![]),
            op(
                "cm",
                vec![
                    int(2),
                    int(0),
                    int(0),
                    int(2),
                    int(10),
                    int(20),
                ],
            ),
            op("BT", vec![]),
            op("Tf", vec![name("F1"), int(10)]),
            op("Td", vec![int(5), int(5)]),
            op("Tj", vec![string("Big")]),
            op("ET", vec![]),
            op("Q", vec![]),
            op("BT", vec![]),
            op("Td", vec![int(5), int(5)]),
            op("Tj", vec![string("Small")]),
            op("ET", vec![]),
        ]);
        assert_eq!(fragments[0].font_size, 20.0);
        assert_eq!((fragments[0].bbox.x0, fragments[0].baseline_y), (20.0, 30.0));
        assert_eq!(fragments[1].font_size, 10.0);
        assert_eq!(fragments[1].bbox.x0, 5.0);
    }

    #[test]
    fn test_tj_array_word_gaps() {
        let fragments = interpret(vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), int(10)]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    string("Hello"),
                    int(-250),
                    string("World"),
                    int(-50),
                    string("!"),
                ])],
            ),
            op("ET", vec![]),
        ]);
        assert_eq!(fragments[0].text, "Hello World!");
    }

    #[test]
    fn test_leading_and_next_line() {
        let fragments = interpret(vec![
            op("BT", vec![]),
            op("Tf", vec![name("F1"), int(10)]),
            op("TL", vec![int(14)]),
            op("Td", vec![int(50), int(600)]),
            op("Tj", vec![string("one")]),
            op("'", vec![string("two")]),
            op("T*", vec![]),
            op("Tj", vec![string("three")]),
            op("ET", vec![]),
        ]);
        let ys: Vec<f32> = fragments.iter().map(|f| f.baseline_y).collect();
        assert_eq!(ys, vec![600.0, 586.0, 572.0]);
        assert!(fragments.iter().all(|f| f.bbox.x0 == 50.0));
    }

    #[test]
    fn test_text_outside_bt_is_ignored() {
        let fragments = interpret(vec![op("Tj", vec![string("stray")])]);
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_strip_subset_prefix() {
        assert_eq!(strip_subset_prefix("ABCDEF+Arial-Bold"), "Arial-Bold");
        assert_eq!(strip_subset_prefix("Arial+Extra"), "Arial+Extra");
        assert_eq!(strip_subset_prefix("Times-Roman"), "Times-Roman");
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"plain"), "plain");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x41]), "A");
        assert_eq!(decode_text_simple(&[0xE9]), "é");
    }
}
