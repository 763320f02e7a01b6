//! Local summary generator used when the LLM is unavailable.
//!
//! Pulls skills, positions and education fields out of the summary prompt with
//! regexes and fills one of three fixed templates. Template choice is delegated to
//! a `TemplatePicker` so tests can pin it.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::Serialize;

pub const TEMPLATES: [&str; 3] = [
    "Dedicated professional with expertise in {skills}. Brings valuable experience as a \
     {position} with a strong educational background in {education}. Known for delivering \
     exceptional results through analytical thinking and creative problem-solving.",
    "Results-driven {position} professional with a proven track record in {skills}. Leverages \
     strong {education} knowledge to implement innovative solutions. Committed to excellence \
     and continuous improvement in all professional endeavors.",
    "Versatile and analytical professional specializing in {skills}. Experienced {position} \
     with a solid foundation in {education}. Excels at translating complex concepts into \
     actionable strategies and driving measurable outcomes.",
];

const DEFAULT_SKILLS: &str = "various technical and soft skills";
const DEFAULT_POSITION: &str = "experienced";
const DEFAULT_EDUCATION: &str = "professional";
const MAX_SKILLS: usize = 3;

static POSITION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"- ([\w\s]+) at").expect("position pattern is valid"));
static EDUCATION_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"in ([\w\s]+) from").expect("education pattern is valid"));

// ────────────────────────────────────────────────────────────────────────────
// Template selection
// ────────────────────────────────────────────────────────────────────────────

pub trait TemplatePicker: Send + Sync {
    /// Returns an index in `0..count`. `count` is never zero.
    fn pick(&self, count: usize) -> usize;
}

/// Uniform random choice; the production default.
pub struct RandomPicker;

impl TemplatePicker for RandomPicker {
    fn pick(&self, count: usize) -> usize {
        rand::thread_rng().gen_range(0..count)
    }
}

/// Always the same template (clamped to the last one).
#[cfg(test)]
pub struct FixedPicker(pub usize);

#[cfg(test)]
impl TemplatePicker for FixedPicker {
    fn pick(&self, count: usize) -> usize {
        self.0.min(count - 1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword extraction
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryKeywords {
    pub skills: Vec<String>,
    pub positions: Vec<String>,
    pub education: Vec<String>,
}

pub fn extract_keywords(prompt: &str) -> SummaryKeywords {
    SummaryKeywords {
        skills: extract_skills(prompt),
        positions: captures(&POSITION, prompt),
        education: captures(&EDUCATION_FIELD, prompt),
    }
}

/// Skills are the comma-separated list on the `Skills:` line, or on the line right
/// after it when the heading stands alone.
fn extract_skills(prompt: &str) -> Vec<String> {
    let Some((_, rest)) = prompt.split_once("Skills:") else {
        return Vec::new();
    };

    let mut lines = rest.lines();
    let same_line = lines.next().unwrap_or_default();
    let line = if same_line.trim().is_empty() {
        lines.next().unwrap_or_default()
    } else {
        same_line
    };

    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn captures(pattern: &Regex, prompt: &str) -> Vec<String> {
    pattern
        .captures_iter(prompt)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Template filling
// ────────────────────────────────────────────────────────────────────────────

pub fn fill_template(template: &str, keywords: &SummaryKeywords) -> String {
    let skills = if keywords.skills.is_empty() {
        DEFAULT_SKILLS.to_string()
    } else {
        keywords
            .skills
            .iter()
            .take(MAX_SKILLS)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    };
    let position = keywords
        .positions
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_POSITION);
    let education = keywords
        .education
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_EDUCATION);

    template
        .replacen("{skills}", &skills, 1)
        .replacen("{position}", position, 1)
        .replacen("{education}", education, 1)
}

pub fn generate_fallback_summary(prompt: &str, picker: &dyn TemplatePicker) -> String {
    let keywords = extract_keywords(prompt);
    let index = picker.pick(TEMPLATES.len());
    fill_template(TEMPLATES[index], &keywords)
}
