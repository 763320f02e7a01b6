// Resume rendering pipeline: record → normalized view → section selection → content blocks.
// Pure and synchronous; the layout adapters in `crate::layout` consume its output.

pub mod blocks;
pub mod handlers;
pub mod normalize;
pub mod sections;
pub mod validation;

use serde::Serialize;

use crate::models::resume::ResumeRecord;
use blocks::{render_header, render_section, ContentBlock};
use normalize::normalize;
use sections::{select_sections, SectionId};

/// The blocks of one included section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionBlocks {
    pub id: SectionId,
    pub blocks: Vec<ContentBlock>,
}

/// Full pipeline output: header blocks followed by the included sections in fixed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedResume {
    /// Raw candidate name, used for the download file name.
    pub name: String,
    pub header: Vec<ContentBlock>,
    pub sections: Vec<SectionBlocks>,
}

impl RenderedResume {
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.sections.iter().map(|s| s.id).collect()
    }

    /// Every block in document order.
    #[cfg(test)]
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.header
            .iter()
            .chain(self.sections.iter().flat_map(|s| s.blocks.iter()))
    }

    /// The document's text in reading order. Both adapters must reproduce this sequence.
    #[cfg(test)]
    pub fn text_fragments(&self) -> Vec<String> {
        self.blocks().flat_map(ContentBlock::text_fragments).collect()
    }
}

/// Runs the whole pipeline on a record.
pub fn render_resume(record: &ResumeRecord) -> RenderedResume {
    let resume = normalize(record);
    let sections = select_sections(&resume)
        .into_iter()
        .map(|id| SectionBlocks {
            id,
            blocks: render_section(id, &resume),
        })
        .collect();

    RenderedResume {
        name: resume.personal.name.clone(),
        header: render_header(&resume),
        sections,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{full_record, minimal_record};
    use super::*;
    use crate::render::blocks::HeadingLevel;

    #[test]
    fn test_minimal_record_renders_header_only() {
        let rendered = render_resume(&minimal_record());

        assert!(rendered.section_ids().is_empty());
        assert_eq!(
            rendered.header[0],
            ContentBlock::Heading {
                text: "JANE DOE".to_string(),
                level: HeadingLevel::Title,
            }
        );
    }

    #[test]
    fn test_full_record_sections_follow_fixed_order() {
        let rendered = render_resume(&full_record());
        assert_eq!(rendered.section_ids(), SectionId::ORDER.to_vec());
        for section in &rendered.sections {
            assert_eq!(
                section.blocks[0],
                ContentBlock::Heading {
                    text: section.id.title().to_string(),
                    level: HeadingLevel::Section,
                }
            );
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let record = full_record();
        let first = render_resume(&record);
        let second = render_resume(&record);

        assert_eq!(first, second);
        assert_eq!(first.text_fragments(), second.text_fragments());
    }

    #[test]
    fn test_text_fragments_start_with_header() {
        let fragments = render_resume(&full_record()).text_fragments();
        assert_eq!(fragments[0], "JANE DOE");
        assert_eq!(fragments[1], "Email: j@x.com | Phone: 555 | Location: NYC");
        assert_eq!(
            fragments[2],
            "LinkedIn: https://linkedin.com/in/jdoe | GitHub: https://github.com/jdoe"
        );
        assert_eq!(fragments[3], "Professional Summary");
    }
}
