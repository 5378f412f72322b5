//! Non-owning view of one source buffer.
//!
//! The view is the single source of truth for spans: every token's span
//! resolves against exactly one `SourceView`, and the underlying buffer
//! must outlive the whole pipeline plus any diagnostic that quotes it.
//! The view itself is two pointers; copying it is free.

use std::borrow::Cow;

use crate::decode::Utf8Decoder;
use crate::span::Span;

/// Borrowed source bytes with a logical file name.
///
/// The buffer is never mutated and is not required to be valid UTF-8;
/// undecodable runs surface as error tokens downstream, not as failures
/// here.
#[derive(Copy, Clone, Debug)]
pub struct SourceView<'a> {
    name: &'a str,
    bytes: &'a [u8],
}

impl<'a> SourceView<'a> {
    /// Wrap a named byte buffer.
    ///
    /// Buffers at or above 4 GiB are not representable by the 32-bit
    /// span layout and are truncated to `u32::MAX` bytes.
    pub fn new(name: &'a str, bytes: &'a [u8]) -> Self {
        let bytes = if bytes.len() > u32::MAX as usize {
            &bytes[..u32::MAX as usize]
        } else {
            bytes
        };
        SourceView { name, bytes }
    }

    /// The logical file name used in diagnostics.
    #[inline]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The full source bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Source length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.bytes.len() as u32
    }

    /// `true` when the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` when `span` lies within the buffer.
    #[inline]
    pub fn contains(&self, span: Span) -> bool {
        span.start <= span.end && span.end <= self.len()
    }

    /// The bytes covered by `span`. Out-of-range spans clamp to the
    /// buffer end rather than panicking; the lexer never produces them.
    pub fn slice(&self, span: Span) -> &'a [u8] {
        let end = (span.end as usize).min(self.bytes.len());
        let start = (span.start as usize).min(end);
        &self.bytes[start..end]
    }

    /// Best-effort text of `span`, replacing undecodable runs.
    pub fn text(&self, span: Span) -> Cow<'a, str> {
        String::from_utf8_lossy(self.slice(span))
    }

    /// Lazily decode the bytes of `span`.
    pub fn decode(&self, span: Span) -> Utf8Decoder<'a> {
        Utf8Decoder::new(self.slice(span), span.start)
    }

    /// Decode the whole buffer.
    pub fn decode_all(&self) -> Utf8Decoder<'a> {
        Utf8Decoder::new(self.bytes, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_accessors() {
        let view = SourceView::new("a.rebuild", b"hello");
        assert_eq!(view.name(), "a.rebuild");
        assert_eq!(view.len(), 5);
        assert!(!view.is_empty());
        assert_eq!(view.as_bytes(), b"hello");
    }

    #[test]
    fn empty_view() {
        let view = SourceView::new("e", b"");
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
        assert_eq!(view.slice(Span::new(0, 0)), b"");
    }

    #[test]
    fn slice_and_text() {
        let view = SourceView::new("s", b"hello world");
        assert_eq!(view.slice(Span::new(6, 11)), b"world");
        assert_eq!(view.text(Span::new(0, 5)), "hello");
    }

    #[test]
    fn slice_clamps_out_of_range() {
        let view = SourceView::new("s", b"abc");
        assert_eq!(view.slice(Span::new(1, 9)), b"bc");
        assert_eq!(view.slice(Span::new(7, 9)), b"");
    }

    #[test]
    fn contains_span() {
        let view = SourceView::new("s", b"abc");
        assert!(view.contains(Span::new(0, 3)));
        assert!(view.contains(Span::point(3)));
        assert!(!view.contains(Span::new(2, 4)));
    }

    #[test]
    fn text_replaces_invalid_runs() {
        let view = SourceView::new("s", b"a\xFFb");
        assert_eq!(view.text(Span::new(0, 3)), "a\u{FFFD}b");
    }
}
