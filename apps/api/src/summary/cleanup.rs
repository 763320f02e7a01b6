//! Post-processing for model output: models often wrap the summary in a preamble,
//! quotes, or a closing sentence describing what the summary does.

use once_cell::sync::Lazy;
use regex::Regex;

const PREAMBLES: [&str; 5] = [
    "Here is a professional resume summary for the individual:",
    "Here's a professional summary for your resume:",
    "Professional Summary:",
    "Here is a concise professional summary:",
    "Here's a professional resume summary:",
];

/// Trailing self-descriptions. Each runs to the end of its line.
static EXPLANATIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)This summary (aims|highlights|showcases|emphasizes).*",
        r"(?i)The above summary (highlights|showcases|emphasizes).*",
        r"(?i)This professional summary (aims|highlights|showcases|emphasizes).*",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("explanation pattern is valid"))
    .collect()
});

pub fn cleanup_summary(raw: &str) -> String {
    let mut cleaned = raw.trim().to_string();

    for preamble in PREAMBLES {
        if let Some(rest) = cleaned.strip_prefix(preamble) {
            cleaned = rest.trim().to_string();
        }
    }

    if let Some(inner) = cleaned
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        cleaned = inner.trim().to_string();
    }

    for pattern in EXPLANATIONS.iter() {
        cleaned = pattern.replacen(&cleaned, 1, "").trim().to_string();
    }

    cleaned
}
