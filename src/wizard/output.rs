//! Styled text output for the wizard transcript.
//!
//! The wizard never talks to the terminal directly. It emits styled segments
//! and line breaks into a [`StyleOutput`]; the terminal layer converts the
//! in-memory [`Transcript`] into ratatui lines.

/// Color token attached to a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Default terminal color (also used after a reset)
    Plain,
    /// Labels and bracketed catalog indices
    Accent,
    /// Catalog entry names
    Emphasis,
    /// Secondary hints
    Muted,
}

/// A run of text rendered with one tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Color token
    pub tone: Tone,
    /// Text content
    pub text: String,
}

/// Primitives for emitting styled text into a rendered area.
pub trait StyleOutput {
    /// Appends `text` in `tone` to the current line.
    fn write(&mut self, tone: Tone, text: &str);

    /// Ends the current line.
    fn newline(&mut self);

    /// Clears everything rendered so far.
    fn clear(&mut self);

    /// Plain text of the rendered line at `index`.
    fn line(&self, index: usize) -> Option<String>;

    /// Total number of rendered lines.
    fn line_count(&self) -> usize;
}

/// In-memory [`StyleOutput`] keeping every line as styled segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lines: Vec<Vec<Segment>>,
    /// A line break was emitted and no text has been written after it yet.
    pending_break: bool,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Styled segments of every line.
    #[must_use]
    pub fn lines(&self) -> &[Vec<Segment>] {
        &self.lines
    }

    /// Plain text of every line.
    #[must_use]
    pub fn plain_lines(&self) -> Vec<String> {
        (0..self.lines.len()).filter_map(|i| self.line(i)).collect()
    }
}

impl StyleOutput for Transcript {
    fn write(&mut self, tone: Tone, text: &str) {
        if self.lines.is_empty() || self.pending_break {
            self.lines.push(Vec::new());
            self.pending_break = false;
        }
        if text.is_empty() {
            return;
        }

        // The check above guarantees a current line exists.
        if let Some(line) = self.lines.last_mut() {
            match line.last_mut() {
                Some(last) if last.tone == tone => last.text.push_str(text),
                _ => line.push(Segment {
                    tone,
                    text: text.to_string(),
                }),
            }
        }
    }

    fn newline(&mut self) {
        if self.lines.is_empty() || self.pending_break {
            self.lines.push(Vec::new());
        }
        self.pending_break = true;
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.pending_break = false;
    }

    fn line(&self, index: usize) -> Option<String> {
        self.lines
            .get(index)
            .map(|segments| segments.iter().map(|s| s.text.as_str()).collect())
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_and_breaks() {
        let mut out = Transcript::new();
        out.write(Tone::Accent, "Selected store: ");
        out.write(Tone::Plain, "Shop");
        out.newline();
        out.newline();
        out.write(Tone::Plain, "next");

        assert_eq!(out.line_count(), 3);
        assert_eq!(out.line(0).as_deref(), Some("Selected store: Shop"));
        assert_eq!(out.line(1).as_deref(), Some(""));
        assert_eq!(out.line(2).as_deref(), Some("next"));
        assert_eq!(out.line(3), None);
    }

    #[test]
    fn test_trailing_break_does_not_open_a_line() {
        let mut out = Transcript::new();
        out.write(Tone::Plain, "a");
        out.newline();
        assert_eq!(out.line_count(), 1);

        out.clear();
        assert_eq!(out.line_count(), 0);
        out.newline();
        assert_eq!(out.line_count(), 1);
    }

    #[test]
    fn test_adjacent_segments_with_same_tone_merge() {
        let mut out = Transcript::new();
        out.write(Tone::Plain, "ab");
        out.write(Tone::Plain, "cd");
        out.write(Tone::Accent, "ef");
        assert_eq!(out.lines()[0].len(), 2);
        assert_eq!(out.lines()[0][0].text, "abcd");
    }
}
