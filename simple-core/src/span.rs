//! Source spans.

/// A half-open range of byte offsets into a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub length: u32,
}

impl Span {
    pub fn new(start: u32, length: u32) -> Self {
        Span { start, length }
    }

    /// Build a span from two offsets. An `end` before `start` collapses
    /// to an empty span at `start`.
    pub fn from_bounds(start: u32, end: u32) -> Self {
        Span {
            start,
            length: end.saturating_sub(start),
        }
    }

    /// Zero-length span at `offset`.
    pub fn empty(offset: u32) -> Self {
        Span {
            start: offset,
            length: 0,
        }
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span::from_bounds(self.start.min(other.start), self.end().max(other.end()))
    }

    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end() <= self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bounds_computes_length() {
        let span = Span::from_bounds(3, 10);
        assert_eq!(span.start, 3);
        assert_eq!(span.length, 7);
        assert_eq!(span.end(), 10);
    }

    #[test]
    fn inverted_bounds_collapse() {
        let span = Span::from_bounds(8, 2);
        assert_eq!(span, Span::empty(8));
    }

    #[test]
    fn cover_is_bounding_union() {
        let a = Span::new(2, 3);
        let b = Span::new(10, 1);
        let union = a.cover(b);
        assert_eq!(union, Span::from_bounds(2, 11));
        assert!(union.contains(a));
        assert!(union.contains(b));
    }
}
