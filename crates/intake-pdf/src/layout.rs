//! Paginated page composition on top of lopdf
//!
//! Pages are buffered as operation lists and only materialized into a
//! `lopdf::Document` in [`PageComposer::finish`]; the footer needs the
//! final page count, so it is stamped last, onto every buffered page.
//!
//! Coordinates are PDF points, origin bottom-left, US Letter.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const MARGIN: f32 = 50.0;

/// Height of the navy banner repeated at the top of every page.
pub const HEADER_HEIGHT: f32 = 45.0;

/// Vertical space reserved at the bottom of every page for the footer.
pub const FOOTER_RESERVE: f32 = 60.0;

pub const LINE_HEIGHT: f32 = 12.0;
pub const SECTION_BAR_HEIGHT: f32 = 18.0;

/// Column where field values start.
pub const VALUE_X: f32 = 210.0;

/// Fixed wrap boundary for field values, in characters.
pub const VALUE_WRAP_CHARS: usize = 58;

/// Extra indent for repeatable sub-entries (beneficiaries, policies).
pub const SUB_INDENT: f32 = 16.0;

#[derive(Debug, Clone, Copy)]
struct Rgb(f32, f32, f32);

const NAVY: Rgb = Rgb(0.043, 0.145, 0.278);
const GOLD: Rgb = Rgb(0.831, 0.686, 0.216);
const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
const INK: Rgb = Rgb(0.07, 0.09, 0.13);
const SLATE: Rgb = Rgb(0.42, 0.45, 0.50);
const RULE: Rgb = Rgb(0.78, 0.80, 0.83);

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Errors from PDF assembly.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("PDF assembly failed: {0}")]
    Assembly(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds a multi-page document from sections and label/value rows,
/// breaking pages when the remaining space cannot fit the next row.
pub struct PageComposer {
    title: String,
    subtitle: String,
    pages: Vec<Vec<Operation>>,
    ops: Vec<Operation>,
    y: f32,
}

impl PageComposer {
    pub fn new(title: &str, subtitle: &str) -> Self {
        let mut composer = Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            pages: Vec::new(),
            ops: Vec::new(),
            y: 0.0,
        };
        composer.draw_header();
        composer
    }

    /// Pages so far, counting the one in progress.
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    /// Start a new section: a full-width navy bar with the section title.
    /// Kept on the same page as at least one following row.
    pub fn section(&mut self, title: &str) {
        self.ensure_space(SECTION_BAR_HEIGHT + 10.0 + LINE_HEIGHT + 6.0);
        push_rect(
            &mut self.ops,
            MARGIN,
            self.y - SECTION_BAR_HEIGHT,
            PAGE_WIDTH - 2.0 * MARGIN,
            SECTION_BAR_HEIGHT,
            NAVY,
        );
        push_text(
            &mut self.ops,
            MARGIN + 8.0,
            self.y - SECTION_BAR_HEIGHT + 5.5,
            10.0,
            Font::Bold,
            WHITE,
            title,
        );
        self.y -= SECTION_BAR_HEIGHT + 10.0;
    }

    /// One label/value row. The value wraps at the fixed column boundary
    /// before the row height is computed, so the page-break check sees the
    /// true height.
    pub fn field(&mut self, label: &str, value: &str) {
        self.field_at(MARGIN, label, value, VALUE_WRAP_CHARS);
    }

    /// Indented variant for repeatable sub-entries.
    pub fn sub_field(&mut self, label: &str, value: &str) {
        self.field_at(MARGIN + SUB_INDENT, label, value, VALUE_WRAP_CHARS - 4);
    }

    /// Bold sub-entry heading, e.g. "Primary Beneficiary 1".
    pub fn sub_heading(&mut self, text: &str) {
        self.ensure_space(LINE_HEIGHT + 6.0);
        push_text(
            &mut self.ops,
            MARGIN + SUB_INDENT,
            self.y - 9.0,
            9.0,
            Font::Bold,
            INK,
            text,
        );
        self.y -= LINE_HEIGHT + 4.0;
    }

    /// Vertical gap between blocks.
    pub fn spacer(&mut self, height: f32) {
        self.y -= height;
    }

    fn field_at(&mut self, label_x: f32, label: &str, value: &str, wrap: usize) {
        let lines = wrap_text(value, wrap);
        let row_height = lines.len() as f32 * LINE_HEIGHT + 4.0;
        self.ensure_space(row_height);

        push_text(
            &mut self.ops,
            label_x,
            self.y - 9.0,
            9.0,
            Font::Regular,
            SLATE,
            label,
        );
        for (i, line) in lines.iter().enumerate() {
            push_text(
                &mut self.ops,
                VALUE_X + (label_x - MARGIN),
                self.y - 9.0 - i as f32 * LINE_HEIGHT,
                9.0,
                Font::Regular,
                INK,
                line,
            );
        }
        self.y -= row_height;
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < FOOTER_RESERVE {
            self.break_page();
        }
    }

    fn break_page(&mut self) {
        let finished = std::mem::take(&mut self.ops);
        self.pages.push(finished);
        self.draw_header();
    }

    fn draw_header(&mut self) {
        push_rect(
            &mut self.ops,
            0.0,
            PAGE_HEIGHT - HEADER_HEIGHT,
            PAGE_WIDTH,
            HEADER_HEIGHT,
            NAVY,
        );
        push_text(
            &mut self.ops,
            MARGIN,
            PAGE_HEIGHT - 27.0,
            16.0,
            Font::Bold,
            GOLD,
            &self.title,
        );
        push_text(
            &mut self.ops,
            MARGIN,
            PAGE_HEIGHT - 39.0,
            9.0,
            Font::Regular,
            WHITE,
            &self.subtitle,
        );
        self.y = PAGE_HEIGHT - HEADER_HEIGHT - 24.0;
    }

    /// Stamp footers (now that the total is known) and assemble the
    /// document. Streams are left uncompressed; callers may compress.
    pub fn finish(mut self) -> Result<Document, PdfError> {
        let current = std::mem::take(&mut self.ops);
        self.pages.push(current);

        let total = self.pages.len();
        for (index, ops) in self.pages.iter_mut().enumerate() {
            push_line(ops, MARGIN, 46.0, PAGE_WIDTH - MARGIN, 46.0, RULE);

            let label = format!("Page {} of {}", index + 1, total);
            let x = (PAGE_WIDTH - approx_text_width(&label, 8.0)) / 2.0;
            push_text(ops, x, 32.0, 8.0, Font::Regular, SLATE, &label);

            let notice = "CONFIDENTIAL: contains personal applicant information. \
                          For authorized use only.";
            let x = (PAGE_WIDTH - approx_text_width(notice, 7.0)) / 2.0;
            push_text(ops, x, 20.0, 7.0, Font::Regular, SLATE, notice);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let font_bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_regular,
                "F2" => font_bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(total);
        for ops in self.pages {
            let content = Content { operations: ops };
            let stream = Stream::new(dictionary! {}, content.encode()?);
            let content_id = doc.add_object(stream);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(PAGE_WIDTH),
                    Object::Real(PAGE_HEIGHT),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }
}

/// Wrap at a fixed character boundary. Words longer than the boundary are
/// hard-split. Always returns at least one line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        if current.is_empty() {
            while word.chars().count() > max_chars {
                let split = char_boundary(word, max_chars);
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            while word.chars().count() > max_chars {
                let split = char_boundary(word, max_chars);
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn char_boundary(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Helvetica has no embedded metrics here; average glyph width is close
/// enough for centering footer text.
fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5
}

fn push_rect(ops: &mut Vec<Operation>, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
    ops.push(Operation::new(
        "rg",
        vec![
            Object::Real(color.0),
            Object::Real(color.1),
            Object::Real(color.2),
        ],
    ));
    ops.push(Operation::new(
        "re",
        vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(w),
            Object::Real(h),
        ],
    ));
    ops.push(Operation::new("f", vec![]));
}

fn push_text(
    ops: &mut Vec<Operation>,
    x: f32,
    y: f32,
    size: f32,
    font: Font,
    color: Rgb,
    content: &str,
) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "rg",
        vec![
            Object::Real(color.0),
            Object::Real(color.1),
            Object::Real(color.2),
        ],
    ));
    ops.push(Operation::new(
        "Tf",
        vec![font.name().into(), Object::Real(size)],
    ));
    ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(sanitize_text(content))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn push_line(ops: &mut Vec<Operation>, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) {
    ops.push(Operation::new(
        "RG",
        vec![
            Object::Real(color.0),
            Object::Real(color.1),
            Object::Real(color.2),
        ],
    ));
    ops.push(Operation::new("w", vec![Object::Real(0.5)]));
    ops.push(Operation::new(
        "m",
        vec![Object::Real(x1), Object::Real(y1)],
    ));
    ops.push(Operation::new(
        "l",
        vec![Object::Real(x2), Object::Real(y2)],
    ));
    ops.push(Operation::new("S", vec![]));
}

/// The base fonts are Type1 Helvetica; anything outside ASCII would be
/// mis-encoded in the content stream, so it degrades to `?`.
fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_ascii_control() => ' ',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}
