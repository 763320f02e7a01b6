//! Block rendering: turns the normalized resume into presentation-agnostic content blocks.
//!
//! Both layout adapters (PDF export and HTML preview) consume exactly these blocks, so
//! every textual rule lives here: label wording, separators, bullet splitting, and the
//! link-or-plain-text decision.

use serde::Serialize;

use crate::render::normalize::{ascii_uri, NormalizedResume, ResolvedLink};
use crate::render::sections::SectionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    /// The candidate's name at the top of the page.
    Title,
    /// A section heading.
    Section,
}

/// A labelled link such as `Link: https://example.com`.
///
/// When `valid_href` is false the adapters print `text` without a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkText {
    pub label: String,
    pub text: String,
    pub href: String,
    pub valid_href: bool,
}

impl LinkText {
    /// Builds a link from a resolved user link. Valid links show their normalized
    /// href; invalid ones show the raw input.
    pub fn from_resolved(label: &str, link: &ResolvedLink) -> Self {
        let text = if link.valid {
            link.href.clone()
        } else {
            link.raw.clone()
        };
        Self {
            label: label.to_string(),
            text,
            href: link.uri.clone(),
            valid_href: link.valid,
        }
    }

    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        format!("{}: {}", self.label, self.text)
    }
}

/// One `label: value` element of a header contact line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContactItem {
    Field { label: String, value: String },
    Link(LinkText),
}

#[cfg(test)]
impl ContactItem {
    pub fn plain_text(&self) -> String {
        match self {
            ContactItem::Field { label, value } => format!("{label}: {value}"),
            ContactItem::Link(link) => link.plain_text(),
        }
    }
}

/// Separator between contact items.
pub const CONTACT_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        text: String,
        level: HeadingLevel,
    },
    Paragraph {
        text: String,
    },
    /// Left text with a right-aligned companion (usually dates).
    KeyValueRow {
        left: String,
        right: String,
    },
    BulletItem {
        text: String,
        /// Right-aligned text on the bullet's first line.
        aside: Option<String>,
        /// Paragraph or LinkText lines indented under the bullet.
        sub_items: Vec<ContentBlock>,
    },
    LinkText(LinkText),
    ContactLine {
        items: Vec<ContactItem>,
    },
}

impl ContentBlock {
    fn heading(text: impl Into<String>, level: HeadingLevel) -> Self {
        ContentBlock::Heading {
            text: text.into(),
            level,
        }
    }

    fn paragraph(text: impl Into<String>) -> Self {
        ContentBlock::Paragraph { text: text.into() }
    }

    fn bullet(text: impl Into<String>) -> Self {
        ContentBlock::BulletItem {
            text: text.into(),
            aside: None,
            sub_items: Vec::new(),
        }
    }

    /// The block's text in reading order, one entry per visual element.
    #[cfg(test)]
    pub fn text_fragments(&self) -> Vec<String> {
        match self {
            ContentBlock::Heading { text, .. } | ContentBlock::Paragraph { text } => {
                vec![text.clone()]
            }
            ContentBlock::KeyValueRow { left, right } => vec![left.clone(), right.clone()],
            ContentBlock::BulletItem {
                text,
                aside,
                sub_items,
            } => {
                let mut out = vec![text.clone()];
                out.extend(aside.iter().cloned());
                out.extend(sub_items.iter().flat_map(ContentBlock::text_fragments));
                out
            }
            ContentBlock::LinkText(link) => vec![link.plain_text()],
            ContentBlock::ContactLine { items } => vec![items
                .iter()
                .map(ContactItem::plain_text)
                .collect::<Vec<_>>()
                .join(CONTACT_SEPARATOR)],
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

/// Header blocks: uppercased name, contact line, optional profile-link line.
pub fn render_header(resume: &NormalizedResume) -> Vec<ContentBlock> {
    let info = &resume.personal;
    let mut blocks = vec![ContentBlock::heading(
        info.name.to_uppercase(),
        HeadingLevel::Title,
    )];

    blocks.push(ContentBlock::ContactLine {
        items: vec![
            ContactItem::Link(LinkText {
                label: "Email".to_string(),
                text: info.email.clone(),
                href: ascii_uri(&format!("mailto:{}", info.email)),
                valid_href: !info.email.is_empty(),
            }),
            ContactItem::Field {
                label: "Phone".to_string(),
                value: info.phone.clone(),
            },
            ContactItem::Field {
                label: "Location".to_string(),
                value: info.location.clone(),
            },
        ],
    });

    let profile_links: Vec<ContactItem> = [("LinkedIn", &info.linkedin), ("GitHub", &info.github)]
        .into_iter()
        .filter_map(|(label, link)| {
            link.as_ref()
                .map(|l| ContactItem::Link(LinkText::from_resolved(label, l)))
        })
        .collect();

    if !profile_links.is_empty() {
        blocks.push(ContentBlock::ContactLine {
            items: profile_links,
        });
    }

    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

/// Renders one section: its heading followed by the entry blocks in input order.
///
/// Callers decide inclusion with `select_sections`; this function renders whatever
/// it is given, including sections that would normally be omitted.
pub fn render_section(section: SectionId, resume: &NormalizedResume) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::heading(section.title(), HeadingLevel::Section)];

    match section {
        SectionId::Summary => blocks.push(ContentBlock::paragraph(resume.summary.clone())),

        SectionId::Experience => {
            for exp in &resume.experience {
                blocks.push(ContentBlock::KeyValueRow {
                    left: format!("{} | {}", exp.company, exp.position),
                    right: format!("{} - {}", exp.start_date, exp.end_date),
                });
                blocks.push(ContentBlock::paragraph(exp.description.clone()));
            }
        }

        SectionId::Education => {
            for edu in &resume.education {
                blocks.push(ContentBlock::KeyValueRow {
                    left: edu.institution.clone(),
                    right: edu.graduation_date.clone(),
                });
                blocks.push(ContentBlock::paragraph(format!(
                    "{} in {}",
                    edu.degree, edu.field
                )));
            }
        }

        SectionId::Skills => {
            blocks.extend(resume.skills.iter().map(|s| ContentBlock::bullet(s.clone())));
        }

        SectionId::Projects => {
            for project in &resume.projects {
                let text = if project.description.is_empty() {
                    project.name.clone()
                } else {
                    format!("{}: {}", project.name, project.description)
                };
                let mut sub_items = Vec::new();
                if !project.technologies.is_empty() {
                    sub_items.push(ContentBlock::paragraph(format!(
                        "Technologies: {}",
                        project.technologies
                    )));
                }
                if let Some(link) = &project.link {
                    sub_items.push(ContentBlock::LinkText(LinkText::from_resolved("Link", link)));
                }
                blocks.push(ContentBlock::BulletItem {
                    text,
                    aside: None,
                    sub_items,
                });
            }
        }

        SectionId::Achievements => {
            for achievement in &resume.achievements {
                blocks.push(ContentBlock::BulletItem {
                    text: achievement.description.clone(),
                    aside: non_empty(&achievement.date),
                    sub_items: Vec::new(),
                });
            }
        }

        SectionId::Certifications => {
            for cert in &resume.certifications {
                let mut sub_items =
                    vec![ContentBlock::paragraph(format!("Issuer: {}", cert.issuer))];
                if let Some(link) = &cert.link {
                    sub_items.push(ContentBlock::LinkText(LinkText::from_resolved("Link", link)));
                }
                blocks.push(ContentBlock::BulletItem {
                    text: cert.name.clone(),
                    aside: non_empty(&cert.date),
                    sub_items,
                });
            }
        }
    }

    blocks
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}
