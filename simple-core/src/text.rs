//! Immutable source text with line bookkeeping.

use crate::span::Span;

/// Source text plus the byte offset at which every line starts.
///
/// `\n`, `\r` and `\r\n` each count as one line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    line_starts: Vec<u32>,
}

impl SourceText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        SourceText { text, line_starts }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Slice of the text covered by `span`, clamped to the text bounds.
    pub fn slice(&self, span: Span) -> &str {
        let end = (span.end() as usize).min(self.text.len());
        let start = (span.start as usize).min(end);
        self.text.get(start..end).unwrap_or("")
    }

    /// Zero-based line index containing `position`.
    pub fn line_index(&self, position: u32) -> usize {
        if position as usize >= self.text.len() {
            return self.line_starts.len() - 1;
        }
        match self.line_starts.binary_search(&position) {
            Ok(index) => index,
            Err(insert) => insert - 1,
        }
    }

    /// Zero-based (line, column) of `position`; the column is a byte offset
    /// from the start of the line.
    pub fn line_column(&self, position: u32) -> (usize, usize) {
        let line = self.line_index(position);
        let position = position.min(self.text.len() as u32);
        let column = position - self.line_starts[line];
        (line, column as usize)
    }

    /// Span of a line, excluding its line break.
    pub fn line_span(&self, line: usize) -> Span {
        let Some(&start) = self.line_starts.get(line) else {
            return Span::empty(0);
        };
        let mut end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len() as u32);
        let bytes = self.text.as_bytes();
        if end > start && bytes[end as usize - 1] == b'\n' {
            end -= 1;
        }
        if end > start && bytes[end as usize - 1] == b'\r' {
            end -= 1;
        }
        Span::from_bounds(start, end)
    }

    pub fn line_text(&self, line: usize) -> &str {
        self.slice(self.line_span(line))
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        SourceText::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        SourceText::new(text)
    }
}

fn compute_line_starts(text: &str) -> Vec<u32> {
    let bytes = text.as_bytes();
    let mut starts = vec![0];
    let mut position = 0;
    while position < bytes.len() {
        match bytes[position] {
            b'\r' => {
                if bytes.get(position + 1) == Some(&b'\n') {
                    position += 1;
                }
                starts.push(position as u32 + 1);
            }
            b'\n' => starts.push(position as u32 + 1),
            _ => {}
        }
        position += 1;
    }
    starts
}
