//! Flat-string document model.
//!
//! The editable document is a canonical flat string plus a set of
//! annotations. Annotations decorate ranges of the visible text and never
//! change its content or length. All offsets are char offsets, end
//! exclusive.

use shared_types::Category;

/// A (start, end) char-offset pair, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// Visual decoration over a document range.
///
/// `record` is a non-owning back-reference: the index of the originating
/// record in the applied analysis response (highlights, then improvements,
/// then verb replacements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Annotation {
    pub span: Span,
    pub category: Category,
    pub record: usize,
}

/// One styled run of the rendered text. `category` is `None` for plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub span: Span,
    pub category: Option<Category>,
}

/// The editor's document: text content plus annotations.
///
/// Text is mutated only through [`WritingDocument::set_text`]; annotations
/// only through the highlight applier. Replacing the text drops all
/// annotations, since they must not outlive the ranges they decorate.
#[derive(Debug, Clone, Default)]
pub struct WritingDocument {
    text: String,
    annotations: Vec<Annotation>,
}

impl WritingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars, matching annotation offsets.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Replace the text content. Existing annotations are stale against the
    /// new text and are cleared.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.annotations.clear();
    }

    /// The text covered by `span`, by char offsets.
    pub fn slice(&self, span: Span) -> String {
        self.text
            .chars()
            .skip(span.start)
            .take(span.end.saturating_sub(span.start))
            .collect()
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn clear_annotations(&mut self) {
        self.annotations.clear();
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// The annotation under `pos`, if any. Later annotations win where
    /// ranges overlap, matching re-application order.
    pub fn annotation_at(&self, pos: usize) -> Option<&Annotation> {
        self.annotations.iter().rev().find(|a| a.span.contains(pos))
    }

    /// Re-derive styled runs by splitting the text on annotation boundaries.
    /// Covers the whole text; unannotated stretches come back with
    /// `category: None`.
    pub fn runs(&self) -> Vec<Run> {
        let len = self.char_len();
        if len == 0 {
            return Vec::new();
        }

        let mut boundaries: Vec<usize> = vec![0, len];
        for annotation in &self.annotations {
            boundaries.push(annotation.span.start.min(len));
            boundaries.push(annotation.span.end.min(len));
        }
        boundaries.sort_unstable();
        boundaries.dedup();

        boundaries
            .windows(2)
            .map(|pair| {
                let span = Span::new(pair[0], pair[1]);
                let category = self.annotation_at(span.start).map(|a| a.category);
                Run { span, category }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn annotation(start: usize, end: usize, category: Category) -> Annotation {
        Annotation {
            span: Span::new(start, end),
            category,
            record: 0,
        }
    }

    #[test]
    fn set_text_clears_annotations() {
        let mut doc = WritingDocument::with_text("我走出学校大门。");
        doc.add_annotation(annotation(1, 3, Category::Verb));
        doc.set_text("我跨出学校大门。");
        assert!(doc.annotations().is_empty());
    }

    #[test]
    fn slice_uses_char_offsets() {
        let doc = WritingDocument::with_text("我走出学校大门。");
        assert_eq!(doc.slice(Span::new(1, 3)), "走出");
    }

    #[test]
    fn char_len_counts_chars_not_bytes() {
        let doc = WritingDocument::with_text("我走出学校大门。");
        assert_eq!(doc.char_len(), 8);
    }

    #[test]
    fn runs_split_on_annotation_boundaries() {
        let mut doc = WritingDocument::with_text("我走出学校大门。");
        doc.add_annotation(annotation(1, 3, Category::Verb));
        let runs = doc.runs();
        assert_eq!(
            runs,
            vec![
                Run {
                    span: Span::new(0, 1),
                    category: None
                },
                Run {
                    span: Span::new(1, 3),
                    category: Some(Category::Verb)
                },
                Run {
                    span: Span::new(3, 8),
                    category: None
                },
            ]
        );
    }

    #[test]
    fn runs_cover_whole_text() {
        let mut doc = WritingDocument::with_text("春天的花园真美。花园里开满了花。");
        doc.add_annotation(annotation(3, 5, Category::Excellent));
        doc.add_annotation(annotation(8, 10, Category::Excellent));
        let runs = doc.runs();
        assert_eq!(runs.first().unwrap().span.start, 0);
        assert_eq!(runs.last().unwrap().span.end, doc.char_len());
        for pair in runs.windows(2) {
            assert_eq!(pair[0].span.end, pair[1].span.start);
        }
    }

    #[test]
    fn later_annotation_wins_on_overlap() {
        let mut doc = WritingDocument::with_text("abcdef");
        doc.add_annotation(annotation(0, 4, Category::Excellent));
        doc.add_annotation(annotation(2, 6, Category::Improvement));
        assert_eq!(
            doc.annotation_at(3).map(|a| a.category),
            Some(Category::Improvement)
        );
    }

    #[test]
    fn empty_document_has_no_runs() {
        let doc = WritingDocument::new();
        assert!(doc.runs().is_empty());
    }
}
