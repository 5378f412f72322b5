//! Byte-offset source spans.
//!
//! Tokens never carry pointers into the source; they carry a compact
//! 8-byte `Span` that the owning [`SourceView`](crate::SourceView)
//! resolves back to bytes. Spans of successive tokens in a stream are
//! non-overlapping and their starts increase monotonically, so
//! reassembling all spans in stream order reproduces the source.

use std::fmt;

/// Half-open byte range `[start, end)` into one source buffer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span. `start <= end` is the caller's contract.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Zero-length span at `offset`. Used for synthesized tokens and
    /// structural error markers that do not own source bytes.
    #[inline]
    pub const fn point(offset: u32) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Length in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// `true` for zero-length spans.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `true` if `offset` falls inside the span.
    #[inline]
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }

    /// `true` if `other` lies fully within this span. Empty spans at the
    /// boundaries count as contained.
    #[inline]
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both inputs.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Convert to a `usize` range for slicing.
    #[inline]
    pub fn to_range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

// Spans ride on every token; keep them at two words max.
const _: () = assert!(std::mem::size_of::<Span>() == 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_and_empty() {
        assert_eq!(Span::new(2, 7).len(), 5);
        assert!(!Span::new(2, 7).is_empty());
        assert!(Span::point(4).is_empty());
        assert_eq!(Span::point(4).len(), 0);
    }

    #[test]
    fn contains_offset() {
        let s = Span::new(3, 6);
        assert!(!s.contains(2));
        assert!(s.contains(3));
        assert!(s.contains(5));
        assert!(!s.contains(6));
    }

    #[test]
    fn contains_span() {
        let outer = Span::new(2, 10);
        assert!(outer.contains_span(Span::new(2, 10)));
        assert!(outer.contains_span(Span::new(4, 6)));
        assert!(outer.contains_span(Span::point(10)));
        assert!(!outer.contains_span(Span::new(1, 3)));
        assert!(!outer.contains_span(Span::new(9, 11)));
    }

    #[test]
    fn merge_covers_both() {
        assert_eq!(Span::new(2, 4).merge(Span::new(7, 9)), Span::new(2, 9));
        assert_eq!(Span::new(7, 9).merge(Span::new(2, 4)), Span::new(2, 9));
        assert_eq!(Span::point(5).merge(Span::new(5, 8)), Span::new(5, 8));
    }

    #[test]
    fn display_format() {
        assert_eq!(Span::new(1, 4).to_string(), "1..4");
    }
}
