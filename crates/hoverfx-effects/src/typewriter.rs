//! Character-by-character text reveal.

/// Reveals `text` one character per `char_delay_ms`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    text: String,
    started_ms: u64,
    char_delay_ms: u64,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, started_ms: u64, char_delay_ms: u64) -> Self {
        Self {
            text: text.into(),
            started_ms,
            char_delay_ms,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Start revealing again from the first character.
    pub fn restart(&mut self, now_ms: u64) {
        self.started_ms = now_ms;
    }

    /// Number of characters revealed at `now_ms`.
    pub fn revealed_chars(&self, now_ms: u64) -> usize {
        let total = self.text.chars().count();
        if self.char_delay_ms == 0 {
            return total;
        }
        let elapsed = now_ms.saturating_sub(self.started_ms);
        usize::try_from(elapsed / self.char_delay_ms)
            .unwrap_or(usize::MAX)
            .min(total)
    }

    /// The visible prefix at `now_ms`.
    pub fn visible(&self, now_ms: u64) -> &str {
        let count = self.revealed_chars(now_ms);
        match self.text.char_indices().nth(count) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    pub fn is_complete(&self, now_ms: u64) -> bool {
        self.revealed_chars(now_ms) == self.text.chars().count()
    }
}
