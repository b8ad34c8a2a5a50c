//! Best-effort extraction of answers and tag structure from raw completions.

const ANSWER_OPEN: &str = "<answer>";
const ANSWER_CLOSE: &str = "</answer>";

/// Extract the answer text between `<answer>` tags.
///
/// Takes everything after the last opening tag, then everything before
/// the first closing tag in that remainder, trimmed. Missing tags fall
/// through to the surrounding text; this heuristic never fails, and a
/// missing input yields an empty string.
pub fn extract_answer(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let after_open = match text.rfind(ANSWER_OPEN) {
        Some(idx) => &text[idx + ANSWER_OPEN.len()..],
        None => text,
    };
    let before_close = match after_open.find(ANSWER_CLOSE) {
        Some(idx) => &after_open[..idx],
        None => after_open,
    };

    before_close.trim().to_string()
}

/// Character count of the text after the last occurrence of `sep`,
/// or of the whole text when `sep` is absent
fn tail_len_after_last(text: &str, sep: &str) -> usize {
    match text.rfind(sep) {
        Some(idx) => text[idx + sep.len()..].chars().count(),
        None => text.chars().count(),
    }
}

/// Score the structural tags of one completion.
///
/// Each of the four markers contributes 0.125 when it occurs exactly
/// once; duplicates earn nothing. The two `</answer>` variants each
/// subtract 0.001 per trailing character after the answer block, which
/// discourages content after the answer. Missing input scores 0.
pub fn score_tags(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };

    let mut score = 0.0;
    if text.matches("<think>\n").count() == 1 {
        score += 0.125;
    }
    if text.matches("\n</think>\n").count() == 1 {
        score += 0.125;
    }
    if text.matches("\n<answer>\n").count() == 1 {
        score += 0.125;
        score -= tail_len_after_last(text, "\n</answer>\n") as f64 * 0.001;
    }
    if text.matches("\n</answer>").count() == 1 {
        score += 0.125;
        score -= (tail_len_after_last(text, "\n</answer>") as f64 - 1.0) * 0.001;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_answer_well_formed() {
        let text = "<think>\nsome reasoning\n</think>\n<answer>\n42\n</answer>\n";
        assert_eq!(extract_answer(Some(text)), "42");
    }

    #[test]
    fn test_extract_answer_missing_input() {
        assert_eq!(extract_answer(None), "");
    }

    #[test]
    fn test_extract_answer_uses_last_open_tag() {
        let text = "<answer>first</answer><answer> second </answer>";
        assert_eq!(extract_answer(Some(text)), "second");
    }

    #[test]
    fn test_extract_answer_no_tags_returns_trimmed_text() {
        assert_eq!(extract_answer(Some("  plain text  ")), "plain text");
    }

    #[test]
    fn test_extract_answer_open_tag_only() {
        assert_eq!(extract_answer(Some("prefix<answer> 7 ")), "7");
    }

    #[test]
    fn test_score_tags_missing_input() {
        assert_eq!(score_tags(None), 0.0);
    }

    #[test]
    fn test_score_tags_perfect_structure() {
        let text = "<think>\nreasoning\n</think>\n<answer>\n42\n</answer>\n";
        assert!((score_tags(Some(text)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_tags_duplicate_marker_earns_nothing() {
        let text = "<think>\n<think>\nreasoning\n</think>\n<answer>\n42\n</answer>\n";
        // The duplicated opening marker forfeits its 0.125.
        assert!((score_tags(Some(text)) - 0.375).abs() < 1e-9);
    }

    #[test]
    fn test_score_tags_trailing_text_penalized() {
        let clean = "<think>\nr\n</think>\n<answer>\n42\n</answer>\n";
        let trailing = "<think>\nr\n</think>\n<answer>\n42\n</answer>\nextra!";
        assert!(score_tags(Some(trailing)) < score_tags(Some(clean)));
    }

    #[test]
    fn test_score_tags_plain_text_scores_zero() {
        assert_eq!(score_tags(Some("no tags here")), 0.0);
    }

    proptest! {
        #[test]
        fn prop_extract_answer_is_trimmed(text in ".*") {
            let extracted = extract_answer(Some(&text));
            prop_assert_eq!(extracted.trim(), extracted.as_str());
        }

        #[test]
        fn prop_extract_answer_never_contains_close_tag(text in ".*") {
            let extracted = extract_answer(Some(&text));
            prop_assert!(!extracted.contains("</answer>"));
        }
    }
}
