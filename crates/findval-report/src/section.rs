//! FINDINGS section extraction.

use regex::Regex;
use std::sync::OnceLock;

fn findings_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)FINDINGS:?\s+").expect("valid findings marker regex"))
}

fn impression_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)IMPRESSION").expect("valid impression marker regex"))
}

const FINDINGS: &str = "FINDINGS";

/// Body of the FINDINGS section.
///
/// - `FINDINGS` (any case, optional colon, then whitespace) starts the body;
///   the next `IMPRESSION` (any case) or end of text ends it.
/// - Without trailing whitespace, everything after the literal marker is
///   returned, minus a leading colon.
/// - Reports with no marker are returned unchanged.
pub fn extract_findings_section(report_text: &str) -> &str {
    if let Some(marker) = findings_marker().find(report_text) {
        let body = &report_text[marker.end()..];
        let end = impression_marker()
            .find(body)
            .map_or(body.len(), |m| m.start());
        return body[..end].trim();
    }

    // ASCII uppercasing keeps byte offsets aligned with the original text.
    if let Some(idx) = report_text.to_ascii_uppercase().find(FINDINGS) {
        let rest = report_text[idx + FINDINGS.len()..].trim();
        return rest.strip_prefix(':').map_or(rest, str::trim);
    }

    report_text
}
