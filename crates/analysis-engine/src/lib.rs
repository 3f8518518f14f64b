//! Writing analysis and highlight mapping.
//!
//! Turns a learner's text plus a generation provider's feedback records into
//! annotations over the document: locate each record's literal snippet in the
//! live text, mark every occurrence with its category, and resolve feedback
//! tooltips on interaction. The document is modeled as a canonical flat
//! string; styled runs for rendering are re-derived by splitting on
//! annotation boundaries.

pub mod document;
pub mod highlight;
pub mod locate;
pub mod prompt;
pub mod session;
pub mod tooltip;
pub mod tracker;

pub use document::{Annotation, Run, Span, WritingDocument};
pub use highlight::apply_highlights;
pub use locate::locate_all;
pub use session::{ChatSession, SessionError, SessionState, WritingSession};
pub use tooltip::{resolve, Feedback, TooltipState};
pub use tracker::{word_count, WritingTimer};
