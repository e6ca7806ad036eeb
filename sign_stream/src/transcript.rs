//! The growing sentence built from committed symbols.

/// Symbol logged for a manual space.
pub const SPACE: &str = " ";

/// Committed symbols plus the display sentence.
///
/// Grows only by appending; [`clear`](Transcript::clear) empties it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    symbols:  Vec<String>,
    sentence: String,
}

impl Transcript {
    pub fn new() -> Self { Self::default() }

    /// Append a recognized symbol.  The sentence gets the symbol and a
    /// separating space.
    pub fn commit(&mut self, symbol: &str) {
        self.symbols.push(symbol.to_string());
        self.sentence.push_str(symbol);
        self.sentence.push(' ');
    }

    pub fn insert_space(&mut self) {
        self.symbols.push(SPACE.to_string());
        self.sentence.push_str(SPACE);
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
        self.sentence.clear();
    }

    /// The last `max_chars` characters of the sentence.
    pub fn render(&self, max_chars: usize) -> &str {
        let count = self.sentence.chars().count();
        if count <= max_chars {
            return &self.sentence;
        }
        let start = self.sentence.char_indices()
            .nth(count - max_chars)
            .map_or(self.sentence.len(), |(i, _)| i);
        &self.sentence[start..]
    }

    /// Symbols joined by single spaces, or `None` when there is nothing to
    /// speak.
    pub fn speakable_text(&self) -> Option<String> {
        if self.symbols.is_empty() {
            None
        } else {
            Some(self.symbols.join(" "))
        }
    }

    pub fn symbols(&self)  -> &[String] { &self.symbols }
    pub fn sentence(&self) -> &str      { &self.sentence }
    pub fn is_empty(&self) -> bool      { self.symbols.is_empty() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
