//! Tooltip resolver.

use shared_types::{AnalysisResponse, Category};

use crate::document::WritingDocument;

/// Feedback surfaced when the learner interacts with an annotated span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub category: Category,
    pub comment: String,
    pub suggestion: Option<String>,
}

/// Resolve the interacted text to its originating record.
///
/// First containment match wins (record text containing the interacted text,
/// or the reverse). When records have overlapping or substring texts this
/// can attach the wrong comment to a span; that ambiguity is kept from the
/// original behavior rather than resolved here.
pub fn resolve(interacted_text: &str, response: &AnalysisResponse) -> Option<Feedback> {
    if interacted_text.is_empty() {
        return None;
    }

    response
        .records()
        .find(|r| r.text.contains(interacted_text) || interacted_text.contains(&r.text))
        .map(|r| Feedback {
            category: r.category,
            comment: r.comment.clone(),
            suggestion: r.suggestion.clone(),
        })
}

/// Currently shown tooltip, if any.
#[derive(Debug, Clone, Default)]
pub struct TooltipState {
    shown: Option<Feedback>,
}

impl TooltipState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle an interaction at char position `pos`. Inside an annotation,
    /// the matching record's feedback is shown; anywhere else the current
    /// tooltip is dismissed.
    pub fn interact(
        &mut self,
        doc: &WritingDocument,
        response: &AnalysisResponse,
        pos: usize,
    ) -> Option<&Feedback> {
        match doc.annotation_at(pos) {
            Some(annotation) => {
                let interacted = doc.slice(annotation.span);
                self.shown = resolve(&interacted, response);
            }
            None => self.shown = None,
        }
        self.shown.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.shown = None;
    }

    pub fn shown(&self) -> Option<&Feedback> {
        self.shown.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::apply_highlights;
    use pretty_assertions::assert_eq;
    use shared_types::AnalysisRecord;

    fn response() -> AnalysisResponse {
        AnalysisResponse {
            highlights: vec![AnalysisRecord {
                text: "花园里开满了花".to_string(),
                category: Category::Excellent,
                comment: "画面感很强".to_string(),
                suggestion: None,
                start: 0,
                end: 0,
            }],
            improvements: vec![],
            verb_replacements: vec![AnalysisRecord {
                text: "走出".to_string(),
                category: Category::Verb,
                comment: "可以更有力度".to_string(),
                suggestion: Some("跨出".to_string()),
                start: 0,
                end: 0,
            }],
        }
    }

    #[test]
    fn resolves_exact_text() {
        let feedback = resolve("走出", &response()).unwrap();
        assert_eq!(feedback.category, Category::Verb);
        assert_eq!(feedback.suggestion.as_deref(), Some("跨出"));
    }

    #[test]
    fn resolves_partial_text_by_containment() {
        // The rendered span may be a fragment of the record text.
        let feedback = resolve("开满了花", &response()).unwrap();
        assert_eq!(feedback.category, Category::Excellent);
        assert_eq!(feedback.comment, "画面感很强");
    }

    #[test]
    fn unknown_text_resolves_to_nothing() {
        assert!(resolve("不存在的文字", &response()).is_none());
        assert!(resolve("", &response()).is_none());
    }

    #[test]
    fn first_containment_match_wins_on_collision() {
        // Two records where one text contains the other: the earlier record
        // in response order is returned, even for the longer span.
        let ambiguous = AnalysisResponse {
            highlights: vec![AnalysisRecord {
                text: "大门".to_string(),
                category: Category::Excellent,
                comment: "first".to_string(),
                suggestion: None,
                start: 0,
                end: 0,
            }],
            improvements: vec![AnalysisRecord {
                text: "学校大门".to_string(),
                category: Category::Improvement,
                comment: "second".to_string(),
                suggestion: None,
                start: 0,
                end: 0,
            }],
            verb_replacements: vec![],
        };
        let feedback = resolve("学校大门", &ambiguous).unwrap();
        assert_eq!(feedback.comment, "first");
    }

    #[test]
    fn interact_inside_annotation_shows_feedback() {
        let mut doc = WritingDocument::with_text("我走出学校大门。");
        let response = response();
        apply_highlights(&mut doc, &response);

        let mut tooltip = TooltipState::new();
        let feedback = tooltip.interact(&doc, &response, 1).cloned();
        assert_eq!(feedback.unwrap().category, Category::Verb);
        assert!(tooltip.shown().is_some());
    }

    #[test]
    fn interact_outside_annotation_dismisses() {
        let mut doc = WritingDocument::with_text("我走出学校大门。");
        let response = response();
        apply_highlights(&mut doc, &response);

        let mut tooltip = TooltipState::new();
        tooltip.interact(&doc, &response, 1);
        assert!(tooltip.shown().is_some());

        tooltip.interact(&doc, &response, 5);
        assert!(tooltip.shown().is_none());
    }
}
