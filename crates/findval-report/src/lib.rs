//! Report text segmentation for findval
//!
//! Turns a free-text radiology report into numbered sentence units that
//! reviewers annotate, and aligns externally supplied evidence spans back to
//! those units:
//!
//! - `extract_findings_section`: the FINDINGS body (up to IMPRESSION)
//! - `segment`: header-aware sentence splitting, 1-indexed
//! - `split_header` / `is_templated_none`: per-sentence helpers
//! - `match_source_to_sentence`: fragment → sentence index (containment)
//!
//! All functions are pure; indices are stable for a fixed input text.

pub mod section;
pub mod segment;
pub mod source;

pub use section::extract_findings_section;
pub use segment::{is_templated_none, segment, split_header, Sentence};
pub use source::match_source_to_sentence;

/// Segment the findings section of a full report.
///
/// This is the standard pipeline applied to every imported report before
/// annotation.
pub fn prepare_report(report_text: &str) -> Vec<Sentence> {
    let sentences = segment(extract_findings_section(report_text));
    tracing::debug!(sentences = sentences.len(), "prepared report");
    sentences
}
