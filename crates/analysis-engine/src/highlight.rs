//! Highlight applier.

use shared_types::AnalysisResponse;

use crate::document::{Annotation, WritingDocument};
use crate::locate::locate_all;

/// Apply one analysis response's highlights to the document.
///
/// All existing annotations are cleared first (a full clear, not
/// incremental), then every located occurrence of every record's text gets
/// an annotation carrying the record's category and index. Text content is
/// never touched. Records whose text does not occur in the document are
/// silently skipped. Re-running with the same text and response produces
/// the same annotation set.
pub fn apply_highlights(doc: &mut WritingDocument, response: &AnalysisResponse) {
    doc.clear_annotations();

    for (record_idx, record) in response.records().enumerate() {
        for span in locate_all(doc.text(), &record.text) {
            doc.add_annotation(Annotation {
                span,
                category: record.category,
                record: record_idx,
            });
        }
    }
}
