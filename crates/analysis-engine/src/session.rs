//! Editor session state machine.
//!
//! Replaces the ad-hoc UI flags of the original editor with explicit
//! transitions: Idle → Writing on the first non-empty edit, Writing →
//! Analyzing on the save trigger, Analyzing → Writing when the response
//! lands or the call fails.

use shared_types::{AnalysisResponse, ChatMessage, ChatRole};

use crate::document::WritingDocument;
use crate::highlight::apply_highlights;
use crate::prompt;
use crate::tooltip::{Feedback, TooltipState};
use crate::tracker::{word_count, WritingTimer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Writing,
    Analyzing,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("document is empty")]
    EmptyDocument,
    #[error("analysis already in flight")]
    AlreadyAnalyzing,
}

/// One learner's editing session: the document, its lifecycle state, the
/// writing timer, and the last applied analysis.
#[derive(Debug, Clone, Default)]
pub struct WritingSession {
    document: WritingDocument,
    state: SessionStateInner,
    timer: WritingTimer,
    restricted_delete: bool,
    analysis: Option<AnalysisResponse>,
    tooltip: TooltipState,
}

// Default for the enum wrapper without exposing a Default impl on
// SessionState itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SessionStateInner(SessionState);

impl Default for SessionStateInner {
    fn default() -> Self {
        Self(SessionState::Idle)
    }
}

impl WritingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state.0
    }

    pub fn document(&self) -> &WritingDocument {
        &self.document
    }

    pub fn word_count(&self) -> usize {
        word_count(self.document.text())
    }

    pub fn timer(&self) -> &WritingTimer {
        &self.timer
    }

    pub fn analysis(&self) -> Option<&AnalysisResponse> {
        self.analysis.as_ref()
    }

    /// Restricted-delete mode: shortening edits are rejected outright.
    pub fn set_restricted_delete(&mut self, enabled: bool) {
        self.restricted_delete = enabled;
    }

    pub fn restricted_delete(&self) -> bool {
        self.restricted_delete
    }

    /// Apply a full-text edit. Returns false (leaving the document
    /// untouched) when restricted-delete mode rejects a shortening edit.
    /// The first non-empty edit starts the timer and the session.
    pub fn apply_edit(&mut self, new_text: &str) -> bool {
        if self.restricted_delete && new_text.chars().count() < self.document.char_len() {
            return false;
        }

        self.document.set_text(new_text);

        if self.state.0 == SessionState::Idle && !new_text.is_empty() {
            self.state.0 = SessionState::Writing;
            self.timer.start();
        }
        true
    }

    /// One second of elapsed time while the session is active.
    pub fn tick(&mut self) {
        if self.state.0 != SessionState::Idle {
            self.timer.tick();
        }
    }

    /// Save trigger: move to Analyzing and hand back the prompt to send.
    pub fn begin_analysis(&mut self) -> Result<String, SessionError> {
        if self.document.text().trim().is_empty() {
            return Err(SessionError::EmptyDocument);
        }
        if self.state.0 == SessionState::Analyzing {
            return Err(SessionError::AlreadyAnalyzing);
        }
        self.state.0 = SessionState::Analyzing;
        Ok(prompt::analysis_prompt(self.document.text()))
    }

    /// Apply a landed analysis response. Unconditional: a stale response
    /// arriving after a newer one still overwrites the annotation set
    /// (last write wins, no sequencing token).
    pub fn finish_analysis(&mut self, response: AnalysisResponse) {
        apply_highlights(&mut self.document, &response);
        self.analysis = Some(response);
        self.state.0 = SessionState::Writing;
    }

    /// Provider failure: drop back to Writing with annotations untouched.
    pub fn fail_analysis(&mut self) {
        if self.state.0 == SessionState::Analyzing {
            self.state.0 = SessionState::Writing;
        }
    }

    /// Interaction at char position `pos`: show or dismiss the tooltip.
    pub fn interact(&mut self, pos: usize) -> Option<&Feedback> {
        match &self.analysis {
            Some(response) => self.tooltip.interact(&self.document, response, pos),
            None => {
                self.tooltip.dismiss();
                None
            }
        }
    }

    pub fn dismiss_tooltip(&mut self) {
        self.tooltip.dismiss();
    }

    pub fn tooltip(&self) -> Option<&Feedback> {
        self.tooltip.shown()
    }
}

/// Chat alongside the editor. The system message is seeded with the current
/// writing at session start and is never surfaced to the learner.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(current_writing: &str) -> Self {
        Self {
            messages: vec![ChatMessage::system(prompt::chat_system_prompt(
                current_writing,
            ))],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Full transcript, system message included.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// What the learner sees: everything but system messages.
    pub fn visible_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
    }
}
