//! Header-aware sentence segmentation.
//!
//! Structured reports interleave section headers ("Lungs:",
//! "Cardiomediastinal/Hilar:") with free text. Each block of text after a
//! header is prefixed with that header and then split into sentences, so every
//! sentence carries its section context.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A header token anywhere in the text: capitalized words joined by slashes
/// or whitespace, then a colon.
fn subsection_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Z][A-Za-z]+(?:[/\s]+[A-Z][A-Za-z]+)*:").expect("valid header regex")
    })
}

/// A header at the start of a sentence, including the whitespace after it.
fn leading_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z][A-Za-z]+(?:[/\s]+[A-Z][A-Za-z]+)*:\s*)")
            .expect("valid leading header regex")
    })
}

fn templated_none() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^[A-Za-z/\s]+:\s*none\.?\s*$").expect("valid templated-none regex")
    })
}

/// Sentence boundary: a period, whitespace, then an uppercase letter.
///
/// Conservative on purpose so abbreviations like "approx. 5 mm" stay whole.
fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\.\s+[A-Z]").expect("valid sentence boundary regex"))
}

/// One addressable sentence of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// 1-based position in document order.
    pub index: usize,
    pub text: String,
}

impl Sentence {
    /// `(header, content)`; see [`split_header`].
    pub fn header_and_content(&self) -> (&str, &str) {
        split_header(&self.text)
    }

    pub fn is_templated_none(&self) -> bool {
        is_templated_none(&self.text)
    }
}

impl AsRef<str> for Sentence {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

enum Block<'t> {
    Header(&'t str),
    Text(&'t str),
}

fn blocks(text: &str) -> Vec<Block<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in subsection_header().find_iter(text) {
        out.push(Block::Text(&text[last..m.start()]));
        out.push(Block::Header(m.as_str()));
        last = m.end();
    }
    out.push(Block::Text(&text[last..]));
    out
}

fn split_sentences(content: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for m in sentence_boundary().find_iter(content) {
        // Keep the period on the left; the uppercase letter (one ASCII byte)
        // starts the next sentence.
        out.push(&content[start..m.start() + 1]);
        start = m.end() - 1;
    }
    out.push(&content[start..]);
    out
}

/// Split text into 1-indexed sentences.
///
/// - A header applies to the next non-empty text block only; a header
///   directly followed by another header is replaced by it.
/// - Empty fragments and bare "none" fragments are dropped.
pub fn segment(text: &str) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut header: Option<&str> = None;

    for block in blocks(text) {
        match block {
            Block::Header(h) => header = Some(h.trim()),
            Block::Text(t) => {
                let t = t.trim();
                if t.is_empty() {
                    continue;
                }
                let content = match header.take() {
                    Some(h) => format!("{h} {t}"),
                    None => t.to_string(),
                };
                for fragment in split_sentences(&content) {
                    let fragment = fragment.trim();
                    if fragment.is_empty() || fragment.eq_ignore_ascii_case("none") {
                        continue;
                    }
                    sentences.push(Sentence {
                        index: sentences.len() + 1,
                        text: fragment.to_string(),
                    });
                }
            }
        }
    }

    sentences
}

/// Whether a sentence is boilerplate of the form `Header: none.`
pub fn is_templated_none(sentence: &str) -> bool {
    templated_none().is_match(sentence)
}

/// Split `"Header: content"` into `("Header:", "content")`.
///
/// Sentences without a leading header yield `("", sentence)`.
pub fn split_header(sentence: &str) -> (&str, &str) {
    match leading_header().captures(sentence).and_then(|c| c.get(1)) {
        Some(m) => (m.as_str().trim_end(), sentence[m.end()..].trim()),
        None => ("", sentence),
    }
}
