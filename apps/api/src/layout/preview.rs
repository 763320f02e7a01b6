//! HTML preview adapter.
//!
//! Emits the same blocks as the PDF in the same order, as a maud fragment the
//! frontend drops into its preview pane. The height estimate runs the export
//! layout over a 736px column so both surfaces agree on wrapping.

use maud::{html, Markup};
use serde::Serialize;

use crate::layout::export::ExportAdapter;
use crate::layout::font_metrics::PageConfig;
use crate::render::blocks::{ContactItem, ContentBlock, HeadingLevel, LinkText, CONTACT_SEPARATOR};
use crate::render::RenderedResume;

/// Estimated heights above this get the multi-page advisory.
pub const ADVISORY_THRESHOLD: f32 = 1000.0;

pub const MULTI_PAGE_ADVISORY: &str =
    "Your resume may span multiple pages when PDF is generated.";

const PREVIEW_WIDTH: f32 = 800.0;
const PREVIEW_PADDING: f32 = 32.0;
/// A4 at 96 dpi.
const PREVIEW_PAGE_HEIGHT: f32 = 1123.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub html: String,
    pub estimated_height: f32,
    /// Non-blocking; the preview is still returned.
    pub advisory: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PreviewAdapter {
    estimator: ExportAdapter,
}

impl Default for PreviewAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewAdapter {
    pub fn new() -> Self {
        Self {
            estimator: ExportAdapter::new(PageConfig {
                width_pt: PREVIEW_WIDTH,
                height_pt: PREVIEW_PAGE_HEIGHT,
                margin_pt: PREVIEW_PADDING,
                line_height: 1.4,
            }),
        }
    }

    pub fn preview(&self, resume: &RenderedResume) -> PreviewDocument {
        let estimated_height = self.estimate_height(resume);
        let advisory =
            (estimated_height > ADVISORY_THRESHOLD).then(|| MULTI_PAGE_ADVISORY.to_string());

        PreviewDocument {
            html: render_markup(resume).into_string(),
            estimated_height,
            advisory,
        }
    }

    /// Rendered height in px, padding included.
    pub fn estimate_height(&self, resume: &RenderedResume) -> f32 {
        self.estimator.layout(resume).content_bottom + PREVIEW_PADDING
    }
}

pub fn render_markup(resume: &RenderedResume) -> Markup {
    html! {
        article.resume-preview {
            header.resume-header {
                @for block in &resume.header {
                    (block_markup(block))
                }
            }
            @for section in &resume.sections {
                section.resume-section data-section=(section.id.slug()) {
                    @for block in &section.blocks {
                        (block_markup(block))
                    }
                }
            }
        }
    }
}

fn block_markup(block: &ContentBlock) -> Markup {
    match block {
        ContentBlock::Heading {
            text,
            level: HeadingLevel::Title,
        } => html! { h1.resume-name { (text) } },
        ContentBlock::Heading {
            text,
            level: HeadingLevel::Section,
        } => html! {
            h2.section-title { (text) }
            hr.section-divider;
        },
        ContentBlock::Paragraph { text } => html! { p.paragraph { (text) } },
        ContentBlock::KeyValueRow { left, right } => html! {
            div.row-split {
                span.row-title { (left) }
                span.row-aside { (right) }
            }
        },
        ContentBlock::BulletItem {
            text,
            aside,
            sub_items,
        } => html! {
            div.bullet-item {
                span.bullet aria-hidden="true" { "\u{2022}" }
                div.bullet-body {
                    div.row-split {
                        span.bullet-text { (text) }
                        @if let Some(aside) = aside {
                            span.row-aside { (aside) }
                        }
                    }
                    @for sub in sub_items {
                        (block_markup(sub))
                    }
                }
            }
        },
        ContentBlock::LinkText(link) => html! { p.link-line { (link_markup(link)) } },
        ContentBlock::ContactLine { items } => html! {
            p.contact-line {
                @for (i, item) in items.iter().enumerate() {
                    @if i > 0 { (CONTACT_SEPARATOR) }
                    (contact_item_markup(item))
                }
            }
        },
    }
}

fn contact_item_markup(item: &ContactItem) -> Markup {
    match item {
        ContactItem::Field { label, value } => html! { (label) ": " (value) },
        ContactItem::Link(link) => link_markup(link),
    }
}

fn link_markup(link: &LinkText) -> Markup {
    html! {
        (link.label) ": "
        @if link.valid_href {
            a href=(link.href) target="_blank" rel="noopener noreferrer" { (link.text) }
        } @else {
            (link.text)
        }
    }
}
