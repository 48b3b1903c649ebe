/// Output buffering: deferred blank lines and the Markdown document
use std::fmt::Write as _;

/// Blank code lines held back until a non-blank line follows
///
/// Flushing only in front of a non-blank line means a code block never ends
/// in blank lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlankBuffer {
    pending: usize,
}

impl BlankBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self) {
        self.pending += 1;
    }

    /// Forget the held blanks (they were trailing)
    pub fn clear(&mut self) {
        self.pending = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Move the held blanks into `out`, leaving the buffer empty
    pub fn flush_into(&mut self, out: &mut Vec<String>) {
        out.extend(std::iter::repeat_with(String::new).take(self.pending));
        self.pending = 0;
    }
}

/// Append-only sequence of Markdown lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDocument {
    lines: Vec<String>,
}

impl OutputDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, lines: I) {
        self.lines.extend(lines);
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render with every line terminated by `\n`
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let capacity = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = String::with_capacity(capacity);
        for line in &self.lines {
            // Writing to a String cannot fail
            let _ = writeln!(out, "{line}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_buffer_flush() {
        let mut blanks = BlankBuffer::new();
        blanks.push();
        blanks.push();
        assert_eq!(blanks.len(), 2);

        let mut out = vec!["x".to_string()];
        blanks.flush_into(&mut out);
        assert_eq!(out, vec!["x", "", ""]);
        assert!(blanks.is_empty());
    }

    #[test]
    fn test_blank_buffer_clear() {
        let mut blanks = BlankBuffer::new();
        blanks.push();
        blanks.clear();

        let mut out = Vec::new();
        blanks.flush_into(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_document_extend_keeps_order() {
        let mut doc = OutputDocument::new();
        assert!(doc.is_empty());
        doc.push("a");
        doc.extend(["```".to_string(), "x;".to_string()]);
        assert_eq!(doc.lines(), ["a", "```", "x;"]);
        assert_eq!(doc.into_lines(), vec!["a", "```", "x;"]);
    }

    #[test]
    fn test_to_markdown_terminates_lines() {
        let mut doc = OutputDocument::new();
        doc.push("# Title");
        doc.push("");
        doc.push("text");
        assert_eq!(doc.to_markdown(), "# Title\n\ntext\n");
        assert_eq!(doc.len(), 3);
    }
}
