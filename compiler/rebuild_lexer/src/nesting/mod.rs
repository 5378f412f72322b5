//! Indentation-driven block assembly.
//!
//! Consumes the filtered stream and produces a tree: a root
//! [`BlockLiteral`] of [`BlockLine`]s, where a line holds the
//! significant tokens the parser consumes and, separately, the
//! insignificants the reporter needs (newlines, comments, whitespace,
//! block markers, and every structural error marker).
//!
//! Blocks are tracked on a stack. Each open block remembers the column
//! of its header line (the line carrying the opening colon) and the
//! column of its body, fixed by the first body line. A line break at
//! column c closes every block deeper than c, then either starts a
//! sibling line, opens the pending block's body, or flags an
//! `UnexpectedIndent` and stays at the body column.


use rebuild_lexer_core::{
    DecodeErrors, IndentationInfo, NumberValue, OperatorValue, Position, Span, StringValue,
};
use tracing::trace;

use crate::token::{FilterToken, FilterTokenKind};

// ─── Data model ─────────────────────────────────────────────────────

/// A container of block lines: one indentation-defined block.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BlockLiteral {
    pub lines: Vec<BlockLine>,
}

/// One logical line inside a block.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BlockLine {
    pub tokens: Vec<Nested>,
    pub insignificants: Vec<InsignificantToken>,
}

/// A significant token of a block line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Nested {
    pub span: Span,
    pub position: Position,
    pub kind: NestedKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NestedKind {
    BlockLiteral(BlockLiteral),
    IdentifierLiteral {
        decode_errors: DecodeErrors,
        left_separated: bool,
        right_separated: bool,
    },
    OperatorLiteral(OperatorValue),
    StringLiteral(StringValue),
    NumberLiteral(NumberValue),
    ColonSeparator,
    CommaSeparator,
    SquareBracketOpen,
    SquareBracketClose,
    BracketOpen,
    BracketClose,
}

/// A token the parser ignores but the reporter needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsignificantToken {
    pub span: Span,
    pub position: Position,
    pub kind: InsignificantKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsignificantKind {
    CommentLiteral(DecodeErrors),
    WhiteSpaceSeparator,
    InvalidEncoding,
    UnexpectedCharacter,
    SemicolonSeparator,
    NewLineIndentation(IndentationInfo),
    BlockStartColon,
    BlockEndIdentifier(IndentationInfo),
    /// A line deeper than its block that no colon asked for.
    UnexpectedIndent,
    /// Significant content on the same line after a block end.
    UnexpectedTokensAfterEnd,
    /// A block end with no block open.
    UnexpectedBlockEnd,
    /// A block that had to close without its `end`.
    MissingBlockEnd,
    /// A block end whose column matches no open block header.
    MisIndentedBlockEnd,
}

/// A line item in source order: token or insignificant.
#[derive(Copy, Clone, Debug)]
pub enum LineItem<'a> {
    Token(&'a Nested),
    Insignificant(&'a InsignificantToken),
}

impl LineItem<'_> {
    pub fn span(&self) -> Span {
        match self {
            LineItem::Token(t) => t.span,
            LineItem::Insignificant(i) => i.span,
        }
    }
}

impl BlockLine {
    /// Visit tokens and insignificants merged by span start, the order
    /// they appear in the source.
    pub fn for_each_interleaved<'a>(&'a self, mut f: impl FnMut(LineItem<'a>)) {
        let mut tokens = self.tokens.iter().peekable();
        let mut insignificants = self.insignificants.iter().peekable();
        loop {
            match (tokens.peek(), insignificants.peek()) {
                (Some(t), Some(i)) => {
                    if t.span.start < i.span.start {
                        f(LineItem::Token(tokens.next().expect("peeked")));
                    } else {
                        f(LineItem::Insignificant(insignificants.next().expect("peeked")));
                    }
                }
                (Some(_), None) => f(LineItem::Token(tokens.next().expect("peeked"))),
                (None, Some(_)) => {
                    f(LineItem::Insignificant(insignificants.next().expect("peeked")));
                }
                (None, None) => break,
            }
        }
    }

    /// The overall span of the line's content.
    pub fn span(&self) -> Option<Span> {
        let mut all = self
            .tokens
            .iter()
            .map(|t| t.span)
            .chain(self.insignificants.iter().map(|i| i.span));
        let first = all.next()?;
        Some(all.fold(first, Span::merge))
    }
}

// ─── Assembly ───────────────────────────────────────────────────────

/// Assemble the filtered stream into the root block.
pub fn nest<I: Iterator<Item = FilterToken>>(input: I) -> BlockLiteral {
    let mut nester = Nester::new();
    for token in input {
        nester.step(token);
    }
    nester.finish()
}

struct OpenBlock {
    /// Column of the line carrying the opening colon; -1 for the root.
    header_column: i64,
    /// Column of the block body, fixed by its first line.
    body_column: Option<i64>,
    lines: Vec<BlockLine>,
    current: BlockLine,
    line_open: bool,
    /// Merged span and first position of the block content.
    span: Option<Span>,
    position: Option<Position>,
    /// Where the opening colon sat; locates empty blocks.
    opened_at: Option<(Span, Position)>,
}

impl OpenBlock {
    fn new(header_column: i64, opened_at: Option<(Span, Position)>) -> Self {
        OpenBlock {
            header_column,
            body_column: None,
            lines: Vec::new(),
            current: BlockLine::default(),
            line_open: false,
            span: None,
            position: None,
            opened_at,
        }
    }

    fn track(&mut self, span: Span, position: Position) {
        self.span = Some(self.span.map_or(span, |s| s.merge(span)));
        if self.position.is_none() {
            self.position = Some(position);
        }
    }

    fn finish_line(&mut self) {
        if self.line_open {
            self.lines.push(std::mem::take(&mut self.current));
            self.line_open = false;
        }
    }
}

enum CloseReason {
    /// Closed without its `end` (dedent, deeper end, or end of input).
    Missing,
    /// Closed by a block end at the matching column.
    Clean(InsignificantToken),
    /// Closed by a block end whose column matches no open header.
    MisIndented(InsignificantToken),
}

struct Nester {
    stack: Vec<OpenBlock>,
    after_end: bool,
    swallowed: Option<(Span, Position)>,
}

impl Nester {
    fn new() -> Self {
        Nester {
            stack: vec![OpenBlock::new(-1, None)],
            after_end: false,
            swallowed: None,
        }
    }

    // ─── Current line plumbing ──────────────────────────────────────

    fn top(&mut self) -> &mut OpenBlock {
        self.stack.last_mut().expect("the root block never closes")
    }

    /// The block whose current line receives loose tokens. A block
    /// whose body has not started yet (between the colon and the next
    /// line break) is skipped: whitespace and comments there belong to
    /// the header line of the parent.
    fn carrier(&mut self) -> &mut OpenBlock {
        let mut index = self.stack.len() - 1;
        while index > 0 && !self.stack[index].line_open && self.stack[index].body_column.is_none() {
            index -= 1;
        }
        &mut self.stack[index]
    }

    fn push_token(&mut self, span: Span, position: Position, kind: NestedKind) {
        let carrier = self.carrier();
        carrier.line_open = true;
        carrier.track(span, position);
        carrier.current.tokens.push(Nested {
            span,
            position,
            kind,
        });
    }

    fn push_insignificant(&mut self, span: Span, position: Position, kind: InsignificantKind) {
        let carrier = self.carrier();
        carrier.line_open = true;
        carrier.track(span, position);
        carrier.current.insignificants.push(InsignificantToken {
            span,
            position,
            kind,
        });
    }

    fn start_line(&mut self) {
        self.top().finish_line();
        self.top().line_open = true;
    }

    // ─── After-end swallowing ───────────────────────────────────────

    /// While a block end's line continues, everything up to the next
    /// line break collapses into one `UnexpectedTokensAfterEnd` marker.
    fn flush_after_end(&mut self) {
        if !self.after_end {
            return;
        }
        self.after_end = false;
        if let Some((span, position)) = self.swallowed.take() {
            self.push_insignificant(span, position, InsignificantKind::UnexpectedTokensAfterEnd);
        }
    }

    fn swallow(&mut self, span: Span, position: Position) {
        self.swallowed = Some(match self.swallowed {
            Some((s, p)) => (s.merge(span), p),
            None => (span, position),
        });
    }

    // ─── Structure ──────────────────────────────────────────────────

    fn line_break(&mut self, info: IndentationInfo, span: Span, position: Position) {
        self.flush_after_end();
        let column = i64::from(info.column);
        loop {
            let (header, body) = {
                let top = self.top();
                (top.header_column, top.body_column)
            };
            match body {
                None => {
                    if column > header {
                        // First body line fixes the block column.
                        self.top().body_column = Some(column);
                        self.start_line();
                        break;
                    }
                    // The block never got a body.
                    if self.stack.len() == 1 {
                        self.start_line();
                        break;
                    }
                    self.close_top(CloseReason::Missing);
                }
                Some(body) => {
                    if column == body || (column < body && self.stack.len() == 1) {
                        self.start_line();
                        break;
                    } else if column > body {
                        // Deeper than the block without a colon asking
                        // for it: flag it and stay at the body column.
                        self.start_line();
                        self.push_insignificant(
                            span,
                            position,
                            InsignificantKind::NewLineIndentation(info),
                        );
                        self.push_insignificant(
                            Span::point(span.end),
                            position,
                            InsignificantKind::UnexpectedIndent,
                        );
                        return;
                    } else {
                        self.close_top(CloseReason::Missing);
                    }
                }
            }
        }
        self.push_insignificant(span, position, InsignificantKind::NewLineIndentation(info));
    }

    fn block_start(&mut self, span: Span, position: Position) {
        self.flush_after_end();
        self.push_insignificant(span, position, InsignificantKind::BlockStartColon);
        let header = {
            let top = self.top();
            top.body_column.unwrap_or(top.header_column)
        };
        trace!(header, "open block");
        self.stack
            .push(OpenBlock::new(header, Some((span, position))));
    }

    fn block_end(&mut self, info: IndentationInfo, span: Span, position: Position) {
        self.flush_after_end();
        let column = i64::from(info.column);
        let marker = InsignificantToken {
            span,
            position,
            kind: InsignificantKind::BlockEndIdentifier(info),
        };
        if self.stack.len() == 1 {
            // No block to close: the end starts a line of its own.
            self.start_line();
            self.push_insignificant(marker.span, marker.position, marker.kind);
            self.push_insignificant(
                Span::point(span.end),
                position,
                InsignificantKind::UnexpectedBlockEnd,
            );
        } else if self.stack[1..].iter().any(|b| b.header_column == column) {
            // Close inner blocks without ends, then the match cleanly.
            while self.top().header_column != column {
                self.close_top(CloseReason::Missing);
            }
            self.close_top(CloseReason::Clean(marker));
        } else {
            self.close_top(CloseReason::MisIndented(marker));
        }
        self.after_end = true;
    }

    /// Pop the innermost block and hand its literal to the parent line.
    fn close_top(&mut self, reason: CloseReason) {
        let mut block = self.stack.pop().expect("close_top never pops the root");
        debug_assert!(!self.stack.is_empty());
        block.finish_line();
        let (span, position) = match (block.span, block.position, block.opened_at) {
            (Some(s), Some(p), _) => (s, p),
            (_, _, Some((colon, p))) => (Span::point(colon.end), p),
            _ => (Span::point(0), Position::default()),
        };
        trace!(lines = block.lines.len(), "close block");
        self.push_token(
            span,
            position,
            NestedKind::BlockLiteral(BlockLiteral { lines: block.lines }),
        );
        match reason {
            CloseReason::Missing => self.push_insignificant(
                Span::point(span.end),
                position,
                InsignificantKind::MissingBlockEnd,
            ),
            CloseReason::Clean(marker) => {
                let top = self.top();
                top.track(marker.span, marker.position);
                top.current.insignificants.push(marker);
            }
            CloseReason::MisIndented(marker) => {
                let point = Span::point(marker.span.start);
                let position = marker.position;
                let top = self.top();
                top.track(marker.span, marker.position);
                top.current.insignificants.push(marker);
                self.push_insignificant(point, position, InsignificantKind::MisIndentedBlockEnd);
            }
        }
    }

    // ─── Main step ──────────────────────────────────────────────────

    fn step(&mut self, token: FilterToken) {
        let FilterToken {
            span,
            position,
            kind,
        } = token;
        match kind {
            FilterTokenKind::NewLineIndentation {
                value,
                collapsed: false,
            } => self.line_break(value, span, position),
            FilterTokenKind::NewLineIndentation {
                value,
                collapsed: true,
            } => {
                // A collapsed newline still breaks the physical line,
                // ending any after-end swallowing.
                self.flush_after_end();
                self.push_insignificant(
                    span,
                    position,
                    InsignificantKind::NewLineIndentation(value),
                );
            }
            FilterTokenKind::BlockEndIdentifier(info) => self.block_end(info, span, position),
            FilterTokenKind::BlockStartColon if self.after_end => self.swallow(span, position),
            FilterTokenKind::BlockStartColon => self.block_start(span, position),
            _ if self.after_end => self.swallow(span, position),
            FilterTokenKind::IdentifierLiteral {
                decode_errors,
                left_separated,
                right_separated,
            } => self.push_token(
                span,
                position,
                NestedKind::IdentifierLiteral {
                    decode_errors,
                    left_separated,
                    right_separated,
                },
            ),
            FilterTokenKind::OperatorLiteral(v) => {
                self.push_token(span, position, NestedKind::OperatorLiteral(v))
            }
            FilterTokenKind::StringLiteral(v) => {
                self.push_token(span, position, NestedKind::StringLiteral(v))
            }
            FilterTokenKind::NumberLiteral(v) => {
                self.push_token(span, position, NestedKind::NumberLiteral(v))
            }
            FilterTokenKind::ColonSeparator => {
                self.push_token(span, position, NestedKind::ColonSeparator)
            }
            FilterTokenKind::CommaSeparator => {
                self.push_token(span, position, NestedKind::CommaSeparator)
            }
            FilterTokenKind::SquareBracketOpen => {
                self.push_token(span, position, NestedKind::SquareBracketOpen)
            }
            FilterTokenKind::SquareBracketClose => {
                self.push_token(span, position, NestedKind::SquareBracketClose)
            }
            FilterTokenKind::BracketOpen => {
                self.push_token(span, position, NestedKind::BracketOpen)
            }
            FilterTokenKind::BracketClose => {
                self.push_token(span, position, NestedKind::BracketClose)
            }
            FilterTokenKind::WhiteSpaceSeparator => {
                self.push_insignificant(span, position, InsignificantKind::WhiteSpaceSeparator)
            }
            FilterTokenKind::CommentLiteral(e) => {
                self.push_insignificant(span, position, InsignificantKind::CommentLiteral(e))
            }
            FilterTokenKind::SemicolonSeparator => {
                self.push_insignificant(span, position, InsignificantKind::SemicolonSeparator)
            }
            FilterTokenKind::InvalidEncoding => {
                self.push_insignificant(span, position, InsignificantKind::InvalidEncoding)
            }
            FilterTokenKind::UnexpectedCharacter => {
                self.push_insignificant(span, position, InsignificantKind::UnexpectedCharacter)
            }
        }
    }

    fn finish(mut self) -> BlockLiteral {
        self.flush_after_end();
        while self.stack.len() > 1 {
            self.close_top(CloseReason::Missing);
        }
        let mut root = self.stack.pop().expect("root block present");
        root.finish_line();
        BlockLiteral { lines: root.lines }
    }
}
