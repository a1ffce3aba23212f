//! Byte ranges into the document source.

use std::ops::Range;

/// A half-open byte range `start..end` in the document source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Start offset (inclusive).
    pub fn start(&self) -> usize {
        self.start
    }

    /// End offset (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for zero-length spans.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_basics() {
        let span = Span::new(4..10);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert!(Span::new(7..3).is_empty());
    }
}
