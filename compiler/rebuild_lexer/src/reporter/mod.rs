//! Diagnostic extraction from the nested block tree.
//!
//! The reporter walks block lines in source order and turns token
//! errors into [`Diagnostic`]s. Aggregation keeps the output readable:
//! all untainted markers of one error kind on one excerpt become a
//! single diagnostic with one highlight per marker, and reported
//! markers are latched in a taint set so every physical source region
//! is mentioned at most once — running the reporter twice on the same
//! tree reports nothing the second time.
//!
//! Excerpts extend a token's span to the enclosing line boundaries and
//! are rendered through the escape pass, so tabs, control codes and
//! undecodable bytes stay visible.

mod escape;
#[cfg(test)]
mod tests;

use rebuild_diagnostic::{Diagnostic, LexerCode, Marker, Sink, SourceCodeBlock};
use rebuild_lexer_core::{
    IndentationErrorKind, NumberErrorKind, OperatorErrorKind, SourceView, Span, StringErrorKind,
};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::nesting::{BlockLine, BlockLiteral, InsignificantKind, LineItem, NestedKind};
use escape::escape_excerpt;

/// What a marker was reported as; one token span can surface once per
/// kind (a string literal may legitimately produce both an escape
/// diagnostic and an encoding diagnostic).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum TaintKind {
    Decode,
    MixedIndent,
    UnexpectedCharacter,
    String(StringErrorKind),
    Number(NumberErrorKind),
    Operator(OperatorErrorKind),
}

/// Walks nested block lines and extracts deduplicated diagnostics.
///
/// The taint latch lives here, not on the tokens: the set of reported
/// `(span, kind)` pairs persists across calls, so re-running `report`
/// over the same tree is silent.
#[derive(Debug, Default)]
pub struct Reporter {
    reported: FxHashSet<(Span, TaintKind)>,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter::default()
    }

    /// Extract diagnostics for every untainted error in `block`.
    pub fn report(&mut self, block: &BlockLiteral, view: &SourceView<'_>, sink: &mut dyn Sink) {
        debug!(lines = block.lines.len(), "reporting block");
        self.walk_block(block, view, sink);
    }

    /// Latch `(span, kind)`; `true` when it was not reported before.
    fn taint(&mut self, span: Span, kind: TaintKind) -> bool {
        self.reported.insert((span, kind))
    }

    fn walk_block(&mut self, block: &BlockLiteral, view: &SourceView<'_>, sink: &mut dyn Sink) {
        self.report_mixed_indentation(block, view, sink);
        for line in &block.lines {
            line.for_each_interleaved(|item| match item {
                LineItem::Insignificant(insig) => match &insig.kind {
                    InsignificantKind::NewLineIndentation(info)
                    | InsignificantKind::BlockEndIdentifier(info) => {
                        let own: Vec<Span> = info
                            .spans_of(IndentationErrorKind::DecodedErrorPosition)
                            .collect();
                        self.report_decode(line, insig.span, own, view, sink);
                    }
                    InsignificantKind::InvalidEncoding => {
                        self.report_decode(line, insig.span, vec![insig.span], view, sink);
                    }
                    InsignificantKind::CommentLiteral(errors) => {
                        self.report_decode(line, insig.span, errors.clone(), view, sink);
                    }
                    InsignificantKind::UnexpectedCharacter => {
                        self.report_unexpected_character(line, insig.span, view, sink);
                    }
                    _ => {}
                },
                LineItem::Token(token) => match &token.kind {
                    NestedKind::BlockLiteral(child) => self.walk_block(child, view, sink),
                    NestedKind::IdentifierLiteral { decode_errors, .. } => {
                        self.report_decode(line, token.span, decode_errors.clone(), view, sink);
                    }
                    NestedKind::StringLiteral(value) => {
                        self.report_string(line, token.span, value, view, sink);
                    }
                    NestedKind::NumberLiteral(value) => {
                        self.report_number(line, token.span, value, view, sink);
                    }
                    NestedKind::OperatorLiteral(value) => {
                        self.report_operator(line, token.span, value, view, sink);
                    }
                    _ => {}
                },
            });
        }
    }

    // ─── Mixed indentation (code 3) ─────────────────────────────────

    /// One diagnostic aggregates every affected line of the block, so
    /// two misindented sibling lines produce a single report.
    fn report_mixed_indentation(
        &mut self,
        block: &BlockLiteral,
        view: &SourceView<'_>,
        sink: &mut dyn Sink,
    ) {
        let mut markers = Vec::new();
        let mut union: Option<Span> = None;
        for line in &block.lines {
            for insig in &line.insignificants {
                let info = match &insig.kind {
                    InsignificantKind::NewLineIndentation(info)
                    | InsignificantKind::BlockEndIdentifier(info) => info,
                    _ => continue,
                };
                let mixed: Vec<Span> = info
                    .spans_of(IndentationErrorKind::MixedIndentCharacter)
                    .collect();
                if mixed.is_empty() || !self.taint(insig.span, TaintKind::MixedIndent) {
                    continue;
                }
                union = Some(union.map_or(insig.span, |u| u.merge(insig.span)));
                markers.extend(mixed);
            }
        }
        let Some(union) = union else { return };
        let excerpt = extend_to_line_boundaries(view, union);
        self.emit(
            sink,
            view,
            LexerCode::MixedIndentation,
            "Mixed indentation characters",
            "The indentation mixes tabs and spaces.".to_string(),
            excerpt,
            &markers,
        );
    }

    // ─── Decode errors (code 1) ─────────────────────────────────────

    /// Report `own_markers` of `trigger_span` together with every other
    /// untainted decode marker on the same excerpt.
    fn report_decode(
        &mut self,
        line: &BlockLine,
        trigger_span: Span,
        own_markers: Vec<Span>,
        view: &SourceView<'_>,
        sink: &mut dyn Sink,
    ) {
        if own_markers.is_empty() || !self.taint(trigger_span, TaintKind::Decode) {
            return;
        }
        let excerpt = line_excerpt(line, view, trigger_span);
        let mut markers = own_markers;
        self.collect_decode_markers(line, excerpt, &mut markers);
        markers.sort_by_key(|s| s.start);
        let paragraph = if markers.len() == 1 {
            "The UTF-8 decoder encountered an invalid encoding."
        } else {
            "The UTF-8 decoder encountered multiple invalid encodings."
        };
        self.emit(
            sink,
            view,
            LexerCode::InvalidEncoding,
            "Invalid UTF-8 encoding",
            paragraph.to_string(),
            excerpt,
            &markers,
        );
    }

    /// Pull every untainted decode marker within `excerpt` out of the
    /// line, tainting the owning tokens.
    fn collect_decode_markers(&mut self, line: &BlockLine, excerpt: Span, markers: &mut Vec<Span>) {
        line.for_each_interleaved(|item| {
            let (span, candidate): (Span, Vec<Span>) = match item {
                LineItem::Insignificant(insig) => match &insig.kind {
                    InsignificantKind::NewLineIndentation(info)
                    | InsignificantKind::BlockEndIdentifier(info) => (
                        insig.span,
                        info.spans_of(IndentationErrorKind::DecodedErrorPosition)
                            .collect(),
                    ),
                    InsignificantKind::InvalidEncoding => (insig.span, vec![insig.span]),
                    InsignificantKind::CommentLiteral(errors) => (insig.span, errors.clone()),
                    _ => return,
                },
                LineItem::Token(token) => match &token.kind {
                    NestedKind::IdentifierLiteral { decode_errors, .. } => {
                        (token.span, decode_errors.clone())
                    }
                    NestedKind::StringLiteral(value) => (
                        token.span,
                        value
                            .errors
                            .iter()
                            .filter(|e| e.kind == StringErrorKind::InvalidEncoding)
                            .map(|e| e.span)
                            .collect(),
                    ),
                    _ => return,
                },
            };
            if candidate.is_empty() || !excerpt.contains_span(span) {
                return;
            }
            if self.taint(span, TaintKind::Decode) {
                markers.extend(candidate);
            }
        });
    }

    // ─── Unexpected characters (code 2) ─────────────────────────────

    fn report_unexpected_character(
        &mut self,
        line: &BlockLine,
        trigger_span: Span,
        view: &SourceView<'_>,
        sink: &mut dyn Sink,
    ) {
        if !self.taint(trigger_span, TaintKind::UnexpectedCharacter) {
            return;
        }
        let excerpt = line_excerpt(line, view, trigger_span);
        let mut markers = vec![trigger_span];
        line.for_each_interleaved(|item| {
            if let LineItem::Insignificant(insig) = item {
                if matches!(insig.kind, InsignificantKind::UnexpectedCharacter)
                    && excerpt.contains_span(insig.span)
                    && self.taint(insig.span, TaintKind::UnexpectedCharacter)
                {
                    markers.push(insig.span);
                }
            }
        });
        markers.sort_by_key(|s| s.start);
        let paragraph = if markers.len() == 1 {
            "The tokenizer encountered a character that is not part of any Rebuild language token."
        } else {
            "The tokenizer encountered multiple characters that are not part of any Rebuild language token."
        };
        self.emit(
            sink,
            view,
            LexerCode::UnexpectedCharacters,
            "Unexpected characters",
            paragraph.to_string(),
            excerpt,
            &markers,
        );
    }

    // ─── Strings (codes 10–14) ──────────────────────────────────────

    fn report_string(
        &mut self,
        line: &BlockLine,
        span: Span,
        value: &rebuild_lexer_core::StringValue,
        view: &SourceView<'_>,
        sink: &mut dyn Sink,
    ) {
        for &kind in StringErrorKind::ALL {
            let markers: Vec<Span> = value
                .errors
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.span)
                .collect();
            if markers.is_empty() {
                continue;
            }
            if kind == StringErrorKind::InvalidEncoding {
                // Encoding damage inside a string reports through the
                // shared decode aggregation.
                self.report_decode(line, span, markers, view, sink);
                continue;
            }
            if !self.taint(span, TaintKind::String(kind)) {
                continue;
            }
            let (code, title, paragraph) = match kind {
                StringErrorKind::EndOfInput => (
                    LexerCode::StringUnterminated,
                    "Unexpected end of input",
                    "The string was not terminated.",
                ),
                StringErrorKind::InvalidEscape => (
                    LexerCode::StringUnknownEscape,
                    "Unknown escape sequence",
                    "These escape sequences are unknown.",
                ),
                StringErrorKind::InvalidControl => (
                    LexerCode::StringInvalidControl,
                    "Invalid control characters",
                    "Use of invalid control characters. Use escape sequences.",
                ),
                StringErrorKind::InvalidDecimalUnicode => (
                    LexerCode::StringInvalidDecimalUnicode,
                    "Invalid decimal unicode",
                    "Use of invalid decimal unicode values.",
                ),
                StringErrorKind::InvalidHexUnicode => (
                    LexerCode::StringInvalidHexUnicode,
                    "Invalid hexadecimal unicode",
                    "Use of invalid hexadecimal unicode values.",
                ),
                StringErrorKind::InvalidEncoding => unreachable!("handled above"),
            };
            let excerpt = line_excerpt(line, view, span);
            self.emit(sink, view, code, title, paragraph.to_string(), excerpt, &markers);
        }
    }

    // ─── Numbers (codes 20–22) ──────────────────────────────────────

    fn report_number(
        &mut self,
        line: &BlockLine,
        span: Span,
        value: &rebuild_lexer_core::NumberValue,
        view: &SourceView<'_>,
        sink: &mut dyn Sink,
    ) {
        for &kind in NumberErrorKind::ALL {
            let markers: Vec<Span> = value
                .errors
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.span)
                .collect();
            if markers.is_empty() || !self.taint(span, TaintKind::Number(kind)) {
                continue;
            }
            let (code, title, paragraph) = match kind {
                NumberErrorKind::MissingExponent => (
                    LexerCode::NumberMissingExponent,
                    "Missing exponent value",
                    "After the exponent sign an actual value is expected.",
                ),
                NumberErrorKind::MissingValue => (
                    LexerCode::NumberMissingValue,
                    "Missing value",
                    "After the radix prefix an actual value is expected.",
                ),
                NumberErrorKind::MissingBoundary => (
                    LexerCode::NumberMissingBoundary,
                    "Missing boundary",
                    "The number literal ends with an unknown suffix.",
                ),
            };
            let excerpt = line_excerpt(line, view, span);
            self.emit(sink, view, code, title, paragraph.to_string(), excerpt, &markers);
        }
    }

    // ─── Operators (codes 30–32) ────────────────────────────────────

    fn report_operator(
        &mut self,
        line: &BlockLine,
        span: Span,
        value: &rebuild_lexer_core::OperatorValue,
        view: &SourceView<'_>,
        sink: &mut dyn Sink,
    ) {
        for &kind in OperatorErrorKind::ALL {
            let markers: Vec<Span> = value
                .errors
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.span)
                .collect();
            if markers.is_empty() || !self.taint(span, TaintKind::Operator(kind)) {
                continue;
            }
            let (code, title, paragraph) = match kind {
                OperatorErrorKind::WrongClose => (
                    LexerCode::OperatorWrongClose,
                    "Operator wrong close",
                    "The closing sign does not match the opening sign.",
                ),
                OperatorErrorKind::UnexpectedClose => (
                    LexerCode::OperatorUnexpectedClose,
                    "Operator unexpected close",
                    "There was no opening sign before the closing sign.",
                ),
                OperatorErrorKind::NotClosed => (
                    LexerCode::OperatorNotClosed,
                    "Operator not closed",
                    "The operator ends before the closing sign was found.",
                ),
            };
            let excerpt = line_excerpt(line, view, span);
            self.emit(sink, view, code, title, paragraph.to_string(), excerpt, &markers);
        }
    }

    // ─── Emission ───────────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    fn emit(
        &self,
        sink: &mut dyn Sink,
        view: &SourceView<'_>,
        code: LexerCode,
        title: &str,
        paragraph: String,
        excerpt: Span,
        marker_spans: &[Span],
    ) {
        let escaped = escape_excerpt(view.slice(excerpt), excerpt.start, marker_spans);
        let highlights = escaped.markers.into_iter().map(Marker::new).collect();
        let line = line_of_offset(view.as_bytes(), excerpt.start);
        debug!(%code, line, markers = marker_spans.len(), "diagnostic");
        sink.report(Diagnostic::explained(
            code.code(),
            title,
            paragraph,
            SourceCodeBlock::new(escaped.text, highlights, line),
        ));
    }
}

// ─── Excerpt helpers ────────────────────────────────────────────────

/// Extend `span` to the enclosing line boundaries, clamped to the
/// containing line's overall span.
fn line_excerpt(line: &BlockLine, view: &SourceView<'_>, span: Span) -> Span {
    let bounds = line.span().unwrap_or(span);
    extend_lines_within(view, span, bounds)
}

/// Extend backward to the previous newline and forward to the next one,
/// never beyond `bounds`.
fn extend_lines_within(view: &SourceView<'_>, span: Span, bounds: Span) -> Span {
    let bytes = view.as_bytes();
    let mut start = span.start;
    while start > bounds.start && !matches!(bytes[start as usize - 1], b'\n' | b'\r') {
        start -= 1;
    }
    let mut end = span.end;
    while end < bounds.end && !matches!(bytes[end as usize], b'\n' | b'\r') {
        end += 1;
    }
    Span::new(start, end)
}

/// Extend to line boundaries within the whole view; used by the
/// cross-line mixed-indentation report.
fn extend_to_line_boundaries(view: &SourceView<'_>, span: Span) -> Span {
    extend_lines_within(view, span, Span::new(0, view.len()))
}

/// 1-based source line of `offset`.
fn line_of_offset(bytes: &[u8], offset: u32) -> u32 {
    let mut line = 1;
    let mut i = 0usize;
    while i < offset as usize {
        match bytes[i] {
            b'\n' => {
                line += 1;
                i += 1;
            }
            b'\r' => {
                line += 1;
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
            }
            _ => i += 1,
        }
    }
    line
}
