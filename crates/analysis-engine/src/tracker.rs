//! Word count and writing timer.

/// Word count as shown to the learner: every non-whitespace char counts,
/// with no word tokenization. Full-width spaces are whitespace too.
pub fn word_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Wall-clock writing timer.
///
/// Starts on the first non-empty edit, ticks once per second while the
/// session is active, and stops without resetting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WritingTimer {
    elapsed_secs: u64,
    running: bool,
}

impl WritingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// One second of writing time. No-op while stopped.
    pub fn tick(&mut self) {
        if self.running {
            self.elapsed_secs += 1;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    /// `MM:SS` display form.
    pub fn formatted(&self) -> String {
        format!("{:02}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }
}
