//! Source-span alignment: which sentence does an evidence fragment come from?
//!
//! This is a substring-containment heuristic, not an edit distance. Extraction
//! tools quote either part of a sentence or a span covering a whole sentence
//! plus context; both directions of containment count.

/// 1-based index of the sentence best matching `fragment`.
///
/// Comparison is case-insensitive on trimmed text. A sentence scores the
/// length of whichever side is contained in the other; the strictly highest
/// score wins, so ties keep the earliest sentence. `None` for a blank
/// fragment or when no sentence overlaps.
pub fn match_source_to_sentence<S: AsRef<str>>(fragment: &str, sentences: &[S]) -> Option<usize> {
    let fragment = fragment.trim().to_lowercase();
    if fragment.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for (idx, sentence) in sentences.iter().enumerate() {
        let sentence = sentence.as_ref().trim().to_lowercase();
        let overlap = if sentence.contains(&fragment) {
            fragment.chars().count()
        } else if fragment.contains(&sentence) {
            sentence.chars().count()
        } else {
            continue;
        };

        if overlap > best.map_or(0, |(_, score)| score) {
            best = Some((idx + 1, overlap));
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_within_sentence() {
        assert_eq!(
            match_source_to_sentence(
                "small pleural effusion",
                &["There is a small pleural effusion on the left."]
            ),
            Some(1)
        );
    }

    #[test]
    fn blank_fragment_is_none() {
        assert_eq!(match_source_to_sentence("", &["Lungs are clear."]), None);
        assert_eq!(match_source_to_sentence("   ", &["Lungs are clear."]), None);
    }

    #[test]
    fn no_containment_is_none() {
        assert_eq!(
            match_source_to_sentence("rib fracture", &["Lungs are clear.", "No effusion."]),
            None
        );
    }

    #[test]
    fn sentence_within_fragment_scores_sentence_length() {
        let sentences = ["No effusion.", "Heart size is normal.", "Lungs are clear."];
        // The fragment covers two sentences; the longer one wins.
        assert_eq!(
            match_source_to_sentence("heart size is normal. lungs are clear. ", &sentences),
            Some(2)
        );
    }

    #[test]
    fn ties_keep_earliest() {
        let sentences = ["Mild atelectasis.", "Mild atelectasis."];
        assert_eq!(match_source_to_sentence("atelectasis", &sentences), Some(1));
    }

    #[test]
    fn case_insensitive() {
        let sentences = ["Lungs: Clear.", "PLEURA: Small LEFT effusion."];
        assert_eq!(match_source_to_sentence("small left EFFUSION", &sentences), Some(2));
    }
}
