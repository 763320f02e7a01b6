use crate::models::resume::ResumeRecord;
use crate::render::normalize::split_skills;

pub const SUMMARY_INSTRUCTION: &str = "Please directly create a concise, professional summary \
    paragraph highlighting strengths and career focus. Do not open with \"Here is a professional \
    summary for your resume.\" Just provide the summary directly. Avoid giving explanations or \
    context about the summary.";

/// Builds the summary prompt from a record's experience, education and skills.
///
/// The fallback generator parses this same text, so the line shapes
/// (`- X at`, `in X from`, the line after `Skills:`) are load-bearing.
pub fn build_summary_prompt(record: &ResumeRecord) -> String {
    let experience = record
        .experience
        .iter()
        .map(|e| {
            format!(
                "- {} at {} ({} - {})",
                e.position, e.company, e.start_date, e.end_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let education = record
        .education
        .iter()
        .map(|e| {
            format!(
                "- {} in {} from {}, {}",
                e.degree, e.field, e.institution, e.graduation_date
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let skills = split_skills(&record.skills).join(", ");

    format!(
        "Generate a professional resume summary for a person with the following background:\n\n\
         Experience:\n{experience}\n\n\
         Education:\n{education}\n\n\
         Skills:\n{skills}\n\n\
         {SUMMARY_INSTRUCTION}"
    )
}
