// src/analysis/findings.rs
use super::result::Findings;

const BULLET: &str = "- ";
const HEADER: &str = "potential findings:";

pub fn parse_findings(findings: &Findings) -> Vec<String> {
    match findings {
        Findings::List(items) => items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Findings::Text(text) => parse_findings_text(text),
    }
}

// Plain prose without any dash is shown as a single finding
pub fn parse_findings_text(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    if !text.contains('-') {
        return vec![text.trim().to_string()];
    }

    text.split(BULLET)
        .map(str::trim)
        .filter(|item| !item.is_empty() && !item.eq_ignore_ascii_case(HEADER))
        .map(str::to_string)
        .collect()
}
