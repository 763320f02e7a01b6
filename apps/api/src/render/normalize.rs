//! Resume document model: the canonical, render-ready view of a submitted record.
//!
//! `normalize` is total: it never fails and never trims free-text fields. The only
//! derived data is link resolution (scheme added, URL well-formedness checked) and
//! skill tokenization. Nothing is written back into the source record.

use serde::Serialize;
use url::Url;

use crate::models::resume::{AchievementEntry, EducationEntry, ExperienceEntry, ResumeRecord};

/// A user-supplied link after scheme normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLink {
    /// The value exactly as the user typed it.
    pub raw: String,
    /// `raw` with `https://` prepended unless it already carries an http(s) scheme.
    pub href: String,
    /// Percent-encoded ASCII form of `href`; the hyperlink target. Same as `href` when invalid.
    pub uri: String,
    /// Whether `href` parses as an absolute URL. Invalid links render as plain text.
    pub valid: bool,
}

impl ResolvedLink {
    /// Resolves a raw link field. Empty input means "no link".
    pub fn resolve(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        let href = ensure_https(raw);
        let valid = is_valid_url(&href);
        let uri = if valid { ascii_uri(&href) } else { href.clone() };
        Some(Self {
            raw: raw.to_string(),
            href,
            uri,
            valid,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: Option<ResolvedLink>,
    pub github: Option<ResolvedLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedProject {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub link: Option<ResolvedLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedCertification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub link: Option<ResolvedLink>,
}

/// The record after link and skill normalization, prior to section selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedResume {
    pub personal: NormalizedPersonalInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    /// Trimmed, non-blank skill lines in input order.
    pub skills: Vec<String>,
    pub projects: Vec<NormalizedProject>,
    pub achievements: Vec<AchievementEntry>,
    pub certifications: Vec<NormalizedCertification>,
}

/// Builds the canonical view of a record. Borrowing keeps the caller's record untouched.
pub fn normalize(raw: &ResumeRecord) -> NormalizedResume {
    let info = &raw.personal_info;

    NormalizedResume {
        personal: NormalizedPersonalInfo {
            name: info.name.clone(),
            email: info.email.clone(),
            phone: info.phone.clone(),
            location: info.location.clone(),
            linkedin: ResolvedLink::resolve(&info.linkedin),
            github: ResolvedLink::resolve(&info.github),
        },
        summary: raw.summary.clone(),
        experience: raw.experience.clone(),
        education: raw.education.clone(),
        skills: split_skills(&raw.skills),
        projects: raw
            .projects
            .iter()
            .map(|p| NormalizedProject {
                name: p.name.clone(),
                description: p.description.clone(),
                technologies: p.technologies.clone(),
                link: ResolvedLink::resolve(&p.link),
            })
            .collect(),
        achievements: raw.achievements.clone(),
        certifications: raw
            .certifications
            .iter()
            .map(|c| NormalizedCertification {
                name: c.name.clone(),
                issuer: c.issuer.clone(),
                date: c.date.clone(),
                link: ResolvedLink::resolve(&c.link),
            })
            .collect(),
    }
}

/// Prepends `https://` unless the value already starts with `http://` or `https://`.
pub fn ensure_https(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Standard URL-parse check. Only hrefs that parse with a host are hyperlinked.
pub fn is_valid_url(href: &str) -> bool {
    match Url::parse(href) {
        Ok(url) => url.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

/// Serializes a URL in its percent-encoded ASCII form. Unparseable input is returned as is.
pub fn ascii_uri(href: &str) -> String {
    Url::parse(href)
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

/// Splits the skills field on newlines, trims each line and drops blank ones.
pub fn split_skills(skills: &str) -> Vec<String> {
    skills
        .split('\n')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
