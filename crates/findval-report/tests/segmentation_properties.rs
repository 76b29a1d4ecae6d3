use findval_report::{match_source_to_sentence, prepare_report, segment, split_header};
use proptest::prelude::*;

const REPORT: &str = "EXAM: CT chest without contrast.\n\
HISTORY: Cough.\n\
FINDINGS:\n\
Lungs/Airways: 6 mm nodule in the right upper lobe. No consolidation.\n\
Pleura: Small left pleural effusion.\n\
Heart: none.\n\
Bones: Degenerative changes. Approx. 2 cm lesion is unchanged.\n\
IMPRESSION:\n\
1. Right upper lobe nodule.";

#[test]
fn structured_report_round_trip() {
    let sentences = prepare_report(REPORT);
    let texts: Vec<&str> = sentences.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Lungs/Airways: 6 mm nodule in the right upper lobe.",
            "No consolidation.",
            "Pleura: Small left pleural effusion.",
            "Heart: none.",
            "Bones: Degenerative changes.",
            "Approx. 2 cm lesion is unchanged.",
        ]
    );

    assert_eq!(
        split_header(&sentences[0].text),
        ("Lungs/Airways:", "6 mm nodule in the right upper lobe.")
    );
    assert!(sentences[3].is_templated_none());

    assert_eq!(
        match_source_to_sentence("small left pleural effusion", &sentences),
        Some(3)
    );
    assert_eq!(match_source_to_sentence("2 cm lesion", &sentences), Some(6));
}

fn word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z]{1,8}").unwrap()
}

fn sentence_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(word(), 1..6).prop_map(|words| format!("{}.", words.join(" ")))
}

fn report_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        (proptest::option::of("[A-Z][a-z]{2,8}"), sentence_text()),
        0..8,
    )
    .prop_map(|parts| {
        parts
            .into_iter()
            .map(|(header, text)| match header {
                Some(h) => format!("{h}: {text}"),
                None => text,
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn indices_are_one_based_and_contiguous(text in report_text()) {
        let sentences = segment(&text);
        for (pos, sentence) in sentences.iter().enumerate() {
            prop_assert_eq!(sentence.index, pos + 1);
            prop_assert!(!sentence.text.is_empty());
        }
    }

    #[test]
    fn segmentation_is_deterministic(text in report_text()) {
        prop_assert_eq!(segment(&text), segment(&text));
    }

    #[test]
    fn split_header_rebuilds_sentence(text in report_text()) {
        for sentence in segment(&text) {
            let (header, content) = split_header(&sentence.text);
            if header.is_empty() {
                prop_assert_eq!(content, sentence.text.as_str());
            } else {
                prop_assert_eq!(format!("{header} {content}"), sentence.text.clone());
            }
        }
    }

    #[test]
    fn every_sentence_aligns_to_itself_or_an_earlier_duplicate(text in report_text()) {
        let sentences = segment(&text);
        for sentence in &sentences {
            let idx = match_source_to_sentence(&sentence.text, &sentences);
            prop_assert!(idx.is_some());
            prop_assert!(idx.unwrap() <= sentence.index);
        }
    }
}
