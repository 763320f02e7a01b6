//! Section assembly: which optional sections appear, and in what order.
//!
//! # Inclusion rules
//! - Summary: non-empty text
//! - Experience / Education: at least one entry (entries with empty fields still count)
//! - Skills: at least one non-blank line
//! - Projects / Certifications: the FIRST entry has a non-empty `name`
//! - Achievements: the FIRST entry has a non-empty `description`
//!
//! The first-entry rule only looks at index 0. A populated second entry behind an
//! empty first one does not make the section appear.

use serde::{Deserialize, Serialize};

use crate::render::normalize::NormalizedResume;

/// The seven optional resume sections. The header is not a section; it is always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionId {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Achievements,
    Certifications,
}

impl SectionId {
    /// Fixed document order.
    pub const ORDER: [SectionId; 7] = [
        SectionId::Summary,
        SectionId::Experience,
        SectionId::Education,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Achievements,
        SectionId::Certifications,
    ];

    /// Heading text printed above the section.
    pub fn title(self) -> &'static str {
        match self {
            SectionId::Summary => "Professional Summary",
            SectionId::Experience => "Work Experience",
            SectionId::Education => "Education",
            SectionId::Skills => "Skills",
            SectionId::Projects => "Projects",
            SectionId::Achievements => "Achievements",
            SectionId::Certifications => "Certifications",
        }
    }

    /// Stable identifier used in markup attributes.
    pub fn slug(self) -> &'static str {
        match self {
            SectionId::Summary => "summary",
            SectionId::Experience => "experience",
            SectionId::Education => "education",
            SectionId::Skills => "skills",
            SectionId::Projects => "projects",
            SectionId::Achievements => "achievements",
            SectionId::Certifications => "certifications",
        }
    }
}

/// Returns the sections to render, in fixed order.
pub fn select_sections(resume: &NormalizedResume) -> Vec<SectionId> {
    SectionId::ORDER
        .into_iter()
        .filter(|&id| is_included(id, resume))
        .collect()
}

fn is_included(id: SectionId, resume: &NormalizedResume) -> bool {
    match id {
        SectionId::Summary => !resume.summary.is_empty(),
        SectionId::Experience => !resume.experience.is_empty(),
        SectionId::Education => !resume.education.is_empty(),
        SectionId::Skills => !resume.skills.is_empty(),
        SectionId::Projects => resume
            .projects
            .first()
            .is_some_and(|p| !p.name.is_empty()),
        SectionId::Achievements => resume
            .achievements
            .first()
            .is_some_and(|a| !a.description.is_empty()),
        SectionId::Certifications => resume
            .certifications
            .first()
            .is_some_and(|c| !c.name.is_empty()),
    }
}
