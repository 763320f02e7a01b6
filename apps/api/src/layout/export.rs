//! PDF export adapter.
//!
//! Places the rendered blocks on a single A4 page using the static Helvetica width
//! tables, then serializes the page with lopdf. There is no pagination: content past
//! the bottom margin is still emitted, gets clipped by the page box, and is reported
//! through `overflowed`.
//!
//! Output is deterministic. The document carries no dates or generated IDs, so
//! exporting the same record twice yields identical bytes.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::font_metrics::{get_metrics, FontFace, PageConfig, BULLET};
use crate::layout::style::{self, Rgb, TextStyle};
use crate::render::blocks::{ContactItem, ContentBlock, HeadingLevel, LinkText, CONTACT_SEPARATOR};
use crate::render::RenderedResume;

/// Helvetica ascender and descender, in em.
const ASCENT: f32 = 0.718;
const DESCENT: f32 = 0.207;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished export. The caller owns the bytes.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// True when content ran past the bottom margin and was clipped.
    pub overflowed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Page layout
// ────────────────────────────────────────────────────────────────────────────

/// One line of text in a single style. `x`/`y` are the baseline origin in PDF
/// user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub style: TextStyle,
}

/// A horizontal rule under a section heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

/// Clickable area of a valid link: `[x1, y1, x2, y2]` in PDF user space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkArea {
    pub rect: [f32; 4],
    pub href: String,
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// Runs in reading order.
    pub runs: Vec<PlacedRun>,
    pub rules: Vec<Rule>,
    pub links: Vec<LinkArea>,
    /// Distance from the page top to the bottom of the last line.
    pub content_bottom: f32,
    pub overflowed: bool,
}

/// A piece of an inline line; `href` is set for valid links only.
struct Segment {
    text: String,
    href: Option<String>,
}

impl Segment {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Center,
}

/// Vertical cursor over the page. `top` is the distance from the page top to the
/// next free line box.
struct Cursor<'a> {
    config: &'a PageConfig,
    top: f32,
    page: PageLayout,
}

impl<'a> Cursor<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            top: config.margin_pt,
            page: PageLayout::default(),
        }
    }

    fn left(&self) -> f32 {
        self.config.margin_pt
    }

    fn right(&self) -> f32 {
        self.config.width_pt - self.config.margin_pt
    }

    fn line_box(&self, size: f32) -> f32 {
        size * self.config.line_height
    }

    /// PDF y of the baseline for a line of `size` placed at the cursor.
    fn baseline(&self, size: f32) -> f32 {
        let from_top = self.top + size * (self.config.line_height - 1.0) / 2.0 + size * ASCENT;
        self.config.height_pt - from_top
    }

    fn advance(&mut self, dy: f32) {
        self.top += dy;
    }

    /// Consumes one line box of `size`.
    fn next_line(&mut self, size: f32) {
        self.top += self.line_box(size);
        self.page.content_bottom = self.page.content_bottom.max(self.top);
    }

    /// Records a run and returns its width. Empty text places nothing.
    fn push_run(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        self.page.runs.push(PlacedRun {
            text: text.to_string(),
            x,
            y,
            style,
        });
        get_metrics(style.face).width_pt(text, style.size)
    }

    fn push_link(&mut self, href: &str, x: f32, y: f32, width: f32, size: f32) {
        self.page.links.push(LinkArea {
            rect: [x, y - size * DESCENT, x + width, y + size * ASCENT],
            href: href.to_string(),
        });
    }

    /// Wrapped text starting at `x`, one run per line.
    fn wrapped(&mut self, text: &str, style: TextStyle, x: f32, max_width: f32, align: Align) {
        let metrics = get_metrics(style.face);
        for line in metrics.wrap_lines(text, style.size, max_width) {
            let line_x = match align {
                Align::Left => x,
                Align::Center => {
                    let w = metrics.width_pt(&line, style.size);
                    x + ((max_width - w) / 2.0).max(0.0)
                }
            };
            let y = self.baseline(style.size);
            self.push_run(&line, line_x, y, style);
            self.next_line(style.size);
        }
    }

    /// Lays out inline segments, breaking only between segments.
    fn segments(&mut self, segments: &[Segment], style: TextStyle, indent: f32, align: Align) {
        let metrics = get_metrics(style.face);
        let x0 = self.left() + indent;
        let max_width = self.right() - x0;

        let mut lines: Vec<Vec<&Segment>> = vec![Vec::new()];
        let mut line_width = 0.0;
        for segment in segments {
            let w = metrics.width_pt(&segment.text, style.size);
            let line_started = lines.last().is_some_and(|l| !l.is_empty());
            if line_started && line_width + w > max_width {
                lines.push(Vec::new());
                line_width = 0.0;
            }
            if let Some(line) = lines.last_mut() {
                line.push(segment);
            }
            line_width += w;
        }

        for line in lines {
            let total: f32 = line
                .iter()
                .map(|s| metrics.width_pt(&s.text, style.size))
                .sum();
            let mut x = match align {
                Align::Left => x0,
                Align::Center => x0 + ((max_width - total) / 2.0).max(0.0),
            };
            let y = self.baseline(style.size);
            for segment in line {
                let run_style = if segment.href.is_some() {
                    TextStyle {
                        color: style::LINK_COLOR,
                        ..style
                    }
                } else {
                    style
                };
                let w = self.push_run(&segment.text, x, y, run_style);
                if let Some(href) = &segment.href {
                    self.push_link(href, x, y, w, style.size);
                }
                x += w;
            }
            self.next_line(style.size);
        }
    }

    fn block(&mut self, block: &ContentBlock, indent: f32) {
        let x = self.left() + indent;
        let width = self.right() - x;

        match block {
            ContentBlock::Heading {
                text,
                level: HeadingLevel::Title,
            } => {
                self.wrapped(text, style::NAME, x, width, Align::Center);
                self.advance(style::NAME_GAP);
            }
            ContentBlock::Heading {
                text,
                level: HeadingLevel::Section,
            } => {
                self.wrapped(text, style::SECTION_TITLE, x, width, Align::Left);
                self.advance(style::TITLE_RULE_PAD);
                let y = self.config.height_pt - self.top;
                self.page.rules.push(Rule {
                    x1: x,
                    x2: self.right(),
                    y,
                });
                self.advance(style::RULE_WIDTH + style::TITLE_GAP);
            }
            ContentBlock::Paragraph { text } => {
                self.wrapped(text, style::BODY, x, width, Align::Left);
            }
            ContentBlock::KeyValueRow { left, right } => {
                self.row(left, right, style::ROW_TITLE, x);
            }
            ContentBlock::BulletItem {
                text,
                aside,
                sub_items,
            } => {
                let bullet_x = x + style::BULLET_INDENT;
                let bullet_w =
                    get_metrics(style::BODY.face).width_pt(&BULLET.to_string(), style::BODY.size);
                let text_x = bullet_x + bullet_w + style::BULLET_GAP;

                let y = self.baseline(style::BODY.size);
                self.push_run(&BULLET.to_string(), bullet_x, y, style::BODY);
                match aside {
                    Some(aside) => self.row(text, aside, style::BODY, text_x),
                    None => {
                        let width = self.right() - text_x;
                        self.wrapped(text, style::BODY, text_x, width, Align::Left)
                    }
                }

                let sub_indent = text_x - self.left();
                for sub in sub_items {
                    self.block(sub, sub_indent);
                }
                self.advance(style::BULLET_SPACING);
            }
            ContentBlock::LinkText(link) => {
                self.segments(&link_segments(link), style::BODY, indent, Align::Left);
            }
            ContentBlock::ContactLine { items } => {
                let mut segments = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        segments.push(Segment::plain(CONTACT_SEPARATOR));
                    }
                    match item {
                        ContactItem::Field { label, value } => {
                            segments.push(Segment::plain(format!("{label}: {value}")));
                        }
                        ContactItem::Link(link) => segments.extend(link_segments(link)),
                    }
                }
                self.segments(&segments, style::CONTACT, indent, Align::Center);
                self.advance(style::CONTACT_GAP);
            }
        }
    }

    /// Left text wrapped in `left_style`, right text aligned to the right margin
    /// on the first line's baseline. The right run is recorded after the left lines
    /// so reading order stays left-then-right.
    fn row(&mut self, left: &str, right: &str, left_style: TextStyle, x: f32) {
        let right_style = style::DATES;
        let right_w = get_metrics(right_style.face).width_pt(right, right_style.size);
        let left_width = (self.right() - x - right_w - style::COLUMN_GAP).max(0.0);

        let first_baseline = self.baseline(left_style.size);
        self.wrapped(left, left_style, x, left_width, Align::Left);
        let right_x = self.right() - right_w;
        self.push_run(right, right_x, first_baseline, right_style);
    }

    fn finish(mut self) -> PageLayout {
        self.page.overflowed =
            self.page.content_bottom > self.config.height_pt - self.config.margin_pt + 0.01;
        self.page
    }
}

fn link_segments(link: &LinkText) -> Vec<Segment> {
    vec![
        Segment::plain(format!("{}: ", link.label)),
        Segment {
            text: link.text.clone(),
            href: link.valid_href.then(|| link.href.clone()),
        },
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExportAdapter {
    config: PageConfig,
}

impl ExportAdapter {
    pub fn new(config: PageConfig) -> Self {
        Self { config }
    }

    /// Positions every block on the page without serializing anything.
    pub fn layout(&self, resume: &RenderedResume) -> PageLayout {
        let mut cursor = Cursor::new(&self.config);

        for block in &resume.header {
            cursor.block(block, 0.0);
        }
        cursor.advance(style::HEADER_GAP);

        for (i, section) in resume.sections.iter().enumerate() {
            if i > 0 {
                cursor.advance(style::SECTION_GAP);
            }
            for block in &section.blocks {
                cursor.block(block, 0.0);
            }
        }

        cursor.finish()
    }

    pub fn export(&self, resume: &RenderedResume) -> Result<ExportedDocument, ExportError> {
        let page = self.layout(resume);
        if page.overflowed {
            warn!(
                content_bottom = page.content_bottom,
                page_height = self.config.height_pt,
                "resume content exceeds one page; overflow is clipped"
            );
        }

        let bytes = self.write_pdf(resume, &page)?;
        debug!(
            bytes = bytes.len(),
            runs = page.runs.len(),
            links = page.links.len(),
            "resume PDF written"
        );

        Ok(ExportedDocument {
            file_name: export_filename(&resume.name),
            bytes,
            overflowed: page.overflowed,
        })
    }

    fn write_pdf(
        &self,
        resume: &RenderedResume,
        page: &PageLayout,
    ) -> Result<Vec<u8>, ExportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in [FontFace::Helvetica, FontFace::HelveticaBold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.postscript_name(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let content = Content {
            operations: content_operations(page),
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

        let annots: Vec<Object> = page
            .links
            .iter()
            .map(|link| Object::Reference(doc.add_object(link_annotation(link))))
            .collect();

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => numbers(&[0.0, 0.0, self.config.width_pt, self.config.height_pt]),
            "Contents" => content_id,
            "Resources" => resources_id,
        };
        if !annots.is_empty() {
            page_dict.set("Annots", annots);
        }
        let page_id = doc.add_object(page_dict);

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(&format!("{} Resume", resume.name))),
            "Producer" => Object::string_literal("resume-api"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

fn content_operations(page: &PageLayout) -> Vec<Operation> {
    let mut ops = Vec::new();

    for rule in &page.rules {
        let Rgb(r, g, b) = style::RULE_COLOR;
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new("w", vec![style::RULE_WIDTH.into()]));
        ops.push(Operation::new("m", vec![rule.x1.into(), rule.y.into()]));
        ops.push(Operation::new("l", vec![rule.x2.into(), rule.y.into()]));
        ops.push(Operation::new("S", vec![]));
        ops.push(Operation::new("Q", vec![]));
    }

    for run in &page.runs {
        let Rgb(r, g, b) = run.style.color;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![run.style.face.resource_name().into(), run.style.size.into()],
        ));
        ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
        ops.push(Operation::new("Td", vec![run.x.into(), run.y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&run.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    ops
}

fn numbers(values: &[f32]) -> Object {
    Object::Array(values.iter().map(|&v| Object::from(v)).collect())
}

fn link_annotation(link: &LinkArea) -> Dictionary {
    let [x1, y1, x2, y2] = link.rect;
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => numbers(&[x1, y1, x2, y2]),
        "Border" => numbers(&[0.0, 0.0, 0.0]),
        "A" => dictionary! {
            "Type" => "Action",
            "S" => "URI",
            "URI" => Object::string_literal(link.href.as_str()),
        },
    }
}

/// Maps text onto the WinAnsi code page used by the standard fonts. Characters
/// outside it print as `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            '\t' | '\n' | '\r' => b' ',
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            BULLET => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// `{name with whitespace runs replaced by "_"}_Resume.pdf`.
pub fn export_filename(name: &str) -> String {
    format!("{}_Resume.pdf", WHITESPACE_RUN.replace_all(name, "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::a4_page_config;
    use crate::models::resume::{ProjectEntry, ResumeRecord};
    use crate::render::render_resume;
    use crate::render::test_support::{full_record, minimal_record};

    fn adapter() -> ExportAdapter {
        ExportAdapter::new(a4_page_config())
    }

    fn squash(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    /// Concatenated `Tj` strings of the only page, bullets removed.
    fn page_text(doc: &Document) -> String {
        let pages = doc.get_pages();
        let page_id = *pages.values().next().expect("one page");
        let content = Content::decode(&doc.get_page_content(page_id).expect("content"))
            .expect("decodable content");

        let mut bytes = Vec::new();
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(Object::String(s, _)) = op.operands.first() {
                bytes.extend(s.iter().copied().filter(|&b| b != 0x95));
            }
        }
        String::from_utf8(bytes).expect("ascii text")
    }

    fn annotation_uris(doc: &Document) -> Vec<String> {
        let pages = doc.get_pages();
        let page_id = *pages.values().next().expect("one page");
        let page = doc.get_dictionary(page_id).expect("page dict");
        let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
            return Vec::new();
        };
        annots
            .iter()
            .map(|annot| {
                let id = annot.as_reference().expect("annotation reference");
                let dict = doc.get_dictionary(id).expect("annotation dict");
                let action = dict.get(b"A").and_then(Object::as_dict).expect("action");
                let uri = action.get(b"URI").and_then(Object::as_str).expect("uri");
                String::from_utf8(uri.to_vec()).expect("utf8 uri")
            })
            .collect()
    }

    #[test]
    fn test_export_parses_as_single_page() {
        let exported = adapter().export(&render_resume(&full_record())).unwrap();
        let doc = Document::load_mem(&exported.bytes).unwrap();

        assert_eq!(doc.get_pages().len(), 1);
        assert!(!exported.overflowed);
        assert_eq!(exported.file_name, "Jane_Doe_Resume.pdf");
    }

    #[test]
    fn test_export_text_matches_fragments_in_order() {
        let rendered = render_resume(&full_record());
        let exported = adapter().export(&rendered).unwrap();
        let doc = Document::load_mem(&exported.bytes).unwrap();

        let expected = squash(&rendered.text_fragments().concat());
        assert_eq!(squash(&page_text(&doc)), expected);
    }

    #[test]
    fn test_export_is_byte_identical_across_runs() {
        let rendered = render_resume(&full_record());
        let first = adapter().export(&rendered).unwrap();
        let second = adapter().export(&rendered).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn test_valid_links_become_uri_annotations() {
        let exported = adapter().export(&render_resume(&full_record())).unwrap();
        let doc = Document::load_mem(&exported.bytes).unwrap();

        assert_eq!(
            annotation_uris(&doc),
            vec![
                "mailto:j@x.com",
                "https://linkedin.com/in/jdoe",
                "https://github.com/jdoe",
                "https://github.com/jdoe/ledger",
                "https://cncf.io/certs/1",
            ]
        );
    }

    #[test]
    fn test_annotation_uri_is_ascii() {
        let mut record = minimal_record();
        record.projects = vec![ProjectEntry {
            name: "Proj".to_string(),
            link: "github.com/josé/proj".to_string(),
            ..Default::default()
        }];
        let exported = adapter().export(&render_resume(&record)).unwrap();
        let doc = Document::load_mem(&exported.bytes).unwrap();

        let uris = annotation_uris(&doc);
        assert_eq!(uris.last().unwrap(), "https://github.com/jos%C3%A9/proj");
        assert!(uris.iter().all(|u| u.is_ascii()));
    }

    #[test]
    fn test_invalid_link_printed_without_annotation() {
        let exported = adapter().export(&render_resume(&full_record())).unwrap();
        let doc = Document::load_mem(&exported.bytes).unwrap();

        assert!(page_text(&doc).contains("not a url"));
        assert!(!annotation_uris(&doc).iter().any(|u| u.contains("not a url")));
    }

    #[test]
    fn test_minimal_record_exports_header_only() {
        let rendered = render_resume(&minimal_record());
        let layout = adapter().layout(&rendered);

        assert!(layout.rules.is_empty(), "no sections → no section rules");
        assert_eq!(layout.runs[0].text, "JANE DOE");
        assert_eq!(layout.runs[0].style, style::NAME);
    }

    #[test]
    fn test_name_is_centered() {
        let layout = adapter().layout(&render_resume(&minimal_record()));
        let config = a4_page_config();
        let name = &layout.runs[0];
        let width = get_metrics(FontFace::HelveticaBold).width_pt(&name.text, name.style.size);

        let left_gap = name.x - config.margin_pt;
        let right_gap = config.width_pt - config.margin_pt - (name.x + width);
        assert!((left_gap - right_gap).abs() < 0.01);
    }

    #[test]
    fn test_dates_right_aligned_to_margin() {
        let layout = adapter().layout(&render_resume(&full_record()));
        let config = a4_page_config();
        let dates = layout
            .runs
            .iter()
            .find(|r| r.text == "Jan 2021 - Present")
            .expect("experience dates");
        let width = get_metrics(dates.style.face).width_pt(&dates.text, dates.style.size);

        assert!((dates.x + width - (config.width_pt - config.margin_pt)).abs() < 0.01);
    }

    #[test]
    fn test_overflow_flagged_and_content_kept() {
        let mut record = full_record();
        record.summary = "Long summary sentence that keeps going. ".repeat(400);
        let rendered = render_resume(&record);
        let exported = adapter().export(&rendered).unwrap();
        let doc = Document::load_mem(&exported.bytes).unwrap();

        assert!(exported.overflowed);
        assert_eq!(doc.get_pages().len(), 1);
        assert!(page_text(&doc).contains("Certifications"));
    }

    #[test]
    fn test_empty_record_still_exports() {
        let exported = adapter()
            .export(&render_resume(&ResumeRecord::default()))
            .unwrap();
        assert_eq!(exported.file_name, "_Resume.pdf");
        assert!(Document::load_mem(&exported.bytes).is_ok());
    }

    #[test]
    fn test_export_filename_collapses_whitespace() {
        assert_eq!(export_filename("Jane  Q\tDoe"), "Jane_Q_Doe_Resume.pdf");
        assert_eq!(export_filename("Jane Doe"), "Jane_Doe_Resume.pdf");
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Café"), vec![b'C', b'a', b'f', 0xe9]);
        assert_eq!(encode_win_ansi("\u{2022} \u{2014}"), vec![0x95, b' ', 0x97]);
        assert_eq!(encode_win_ansi("日"), vec![b'?']);
    }
}
