//! Span locator.
//!
//! Model-supplied offsets are advisory only; the offsets that matter are
//! recomputed here against the live document text.

use crate::document::Span;

/// Find every disjoint occurrence of `needle` in `haystack`, scanning left
/// to right and resuming each search at the previous match's end.
///
/// Offsets are char positions, end exclusive, so `haystack[start..end]`
/// taken char-wise equals `needle` for every returned span. A needle that
/// does not occur yields an empty list; so does an empty needle.
pub fn locate_all(haystack: &str, needle: &str) -> Vec<Span> {
    if needle.is_empty() {
        return Vec::new();
    }

    let needle_chars = needle.chars().count();
    let mut spans = Vec::new();
    let mut byte_pos = 0;
    let mut chars_before = 0;

    while let Some(offset) = haystack[byte_pos..].find(needle) {
        let match_start = byte_pos + offset;
        chars_before += haystack[byte_pos..match_start].chars().count();
        spans.push(Span::new(chars_before, chars_before + needle_chars));
        byte_pos = match_start + needle.len();
        chars_before += needle_chars;
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn finds_single_occurrence_at_char_offset() {
        let spans = locate_all("我走出学校大门。", "走出");
        assert_eq!(spans, vec![Span::new(1, 3)]);
    }

    #[test]
    fn finds_every_occurrence() {
        let spans = locate_all("春天的花园真美。花园里开满了花。", "花园");
        assert_eq!(spans, vec![Span::new(3, 5), Span::new(8, 10)]);
    }

    #[test]
    fn missing_needle_yields_empty_list() {
        assert!(locate_all("我走出学校大门。", "跑进").is_empty());
    }

    #[test]
    fn empty_needle_yields_empty_list() {
        assert!(locate_all("我走出学校大门。", "").is_empty());
    }

    #[test]
    fn empty_haystack_yields_empty_list() {
        assert!(locate_all("", "走出").is_empty());
    }

    #[test]
    fn adjacent_occurrences_stay_disjoint() {
        let spans = locate_all("哈哈哈哈", "哈哈");
        assert_eq!(spans, vec![Span::new(0, 2), Span::new(2, 4)]);
    }

    #[test]
    fn ascii_offsets_match() {
        let spans = locate_all("the cat sat on the mat", "the");
        assert_eq!(spans, vec![Span::new(0, 3), Span::new(15, 18)]);
    }

    fn char_slice(text: &str, span: Span) -> String {
        text.chars()
            .skip(span.start)
            .take(span.end - span.start)
            .collect()
    }

    proptest! {
        /// Every returned span slices back to the needle.
        #[test]
        fn spans_slice_back_to_needle(
            haystack in "[a-d花园走出 ]{0,60}",
            needle in "[a-d花园]{1,4}",
        ) {
            for span in locate_all(&haystack, &needle) {
                prop_assert_eq!(char_slice(&haystack, span), needle.clone());
            }
        }

        /// Spans come back ordered and non-overlapping.
        #[test]
        fn spans_are_ordered_and_disjoint(
            haystack in "[ab花]{0,80}",
            needle in "[ab花]{1,3}",
        ) {
            let spans = locate_all(&haystack, &needle);
            for pair in spans.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start);
            }
        }

        /// A needle known to be present is always found.
        #[test]
        fn embedded_needle_is_found(
            prefix in "[a-z ]{0,20}",
            needle in "[A-Z]{1,5}",
            suffix in "[a-z ]{0,20}",
        ) {
            let haystack = format!("{prefix}{needle}{suffix}");
            let spans = locate_all(&haystack, &needle);
            prop_assert!(!spans.is_empty());
            prop_assert_eq!(char_slice(&haystack, spans[0]), needle);
        }
    }
}
