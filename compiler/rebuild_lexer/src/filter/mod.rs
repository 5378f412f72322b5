//! Single-pass token filter.
//!
//! The filter sits between the scanner and the nesting stage. It is a
//! stateful transducer with bounded look-ahead that
//!
//! 1. emits exactly one synthetic column-0 newline before the first
//!    significant token and demotes the leading noise behind it,
//! 2. collapses newline runs so only the last newline drives a line,
//! 3. demotes trailing noise at the end of input,
//! 4. marks identifiers with left/right separation flags,
//! 5. rewrites a `:` that ends its line into `BlockStartColon`, and
//! 6. merges a line-driving newline directly followed by the
//!    identifier `end` into `BlockEndIdentifier`.
//!
//! Nothing is byte-dropped: demoted tokens pass through as
//! insignificants so span coverage holds and the reporter still sees
//! their errors.


use std::collections::VecDeque;

use rebuild_lexer_core::{IndentationInfo, Position, SourceView, Span, Token, TokenKind};
use tracing::trace;

use crate::token::{FilterToken, FilterTokenKind};

/// Pull-based filter over a raw token stream.
pub struct Filter<'a, I: Iterator<Item = Token>> {
    view: SourceView<'a>,
    input: I,
    lookahead: VecDeque<Token>,
    queue: VecDeque<FilterToken>,
    started: bool,
    /// Whether the last pushed token separates a following identifier.
    prev_separating: bool,
}

impl<'a, I: Iterator<Item = Token>> Filter<'a, I> {
    pub fn new(view: SourceView<'a>, input: I) -> Self {
        Filter {
            view,
            input,
            lookahead: VecDeque::new(),
            queue: VecDeque::new(),
            started: false,
            prev_separating: true,
        }
    }

    // ─── Input buffering ────────────────────────────────────────────

    fn peek_input(&mut self, n: usize) -> Option<&Token> {
        while self.lookahead.len() <= n {
            let next = self.input.next()?;
            self.lookahead.push_back(next);
        }
        self.lookahead.get(n)
    }

    fn next_input(&mut self) -> Option<Token> {
        if let Some(t) = self.lookahead.pop_front() {
            Some(t)
        } else {
            self.input.next()
        }
    }

    fn peek_is_noise(&mut self) -> bool {
        matches!(
            self.peek_input(0).map(|t| &t.kind),
            Some(
                TokenKind::NewLineIndentation(_)
                    | TokenKind::WhiteSpaceSeparator
                    | TokenKind::CommentLiteral(_)
            )
        )
    }

    /// Is the next token the bare identifier `end`, starting exactly at
    /// `adjacent_to`? Merging requires adjacency so the merged span
    /// never overlaps tokens emitted in between.
    fn next_is_end_ident(&mut self, adjacent_to: u32) -> bool {
        let view = self.view;
        match self.peek_input(0) {
            Some(t) => {
                t.span.start == adjacent_to
                    && matches!(&t.kind, TokenKind::IdentifierLiteral(e) if e.is_empty())
                    && view.slice(t.span) == b"end"
            }
            None => false,
        }
    }

    // ─── Output ─────────────────────────────────────────────────────

    fn push(&mut self, span: Span, position: Position, kind: FilterTokenKind) {
        self.prev_separating = separates_following(&kind);
        self.queue.push_back(FilterToken {
            span,
            position,
            kind,
        });
    }

    /// Pass a noise token through demoted: newlines lose their driving
    /// force, whitespace and comments stay what they are.
    fn push_demoted(&mut self, token: Token) {
        let kind = match token.kind {
            TokenKind::NewLineIndentation(value) => FilterTokenKind::NewLineIndentation {
                value,
                collapsed: true,
            },
            TokenKind::WhiteSpaceSeparator => FilterTokenKind::WhiteSpaceSeparator,
            TokenKind::CommentLiteral(errors) => FilterTokenKind::CommentLiteral(errors),
            other => unreachable_noise(other),
        };
        self.push(token.span, token.position, kind);
    }

    // ─── Stream start ───────────────────────────────────────────────

    fn start_phase(&mut self) {
        let mut noise = Vec::new();
        while self.peek_is_noise() {
            let Some(t) = self.next_input() else { break };
            noise.push(t);
        }
        if self.peek_input(0).is_none() {
            // Nothing significant in the whole input: no synthetic
            // driver, everything demotes.
            for t in noise {
                self.push_demoted(t);
            }
            return;
        }
        let span = Span::point(0);
        let position = Position::new(1, 1, 0);
        let info = IndentationInfo::default();
        if noise.is_empty() && self.next_is_end_ident(0) {
            let end_tok = self.take_end_ident();
            self.push_block_end(span.merge(end_tok.span), position, info);
        } else {
            trace!("synthetic line start");
            self.push(
                span,
                position,
                FilterTokenKind::NewLineIndentation {
                    value: info,
                    collapsed: false,
                },
            );
            for t in noise {
                self.push_demoted(t);
            }
        }
    }

    // ─── Newline runs ───────────────────────────────────────────────

    /// Collect a maximal run of newlines, whitespace and comments that
    /// starts with `first` (a newline). The last newline of the run
    /// drives; everything else demotes. A run that reaches the end of
    /// input is trailing noise and fully demotes.
    fn newline_run(&mut self, first: Token) {
        let mut run = vec![first];
        while self.peek_is_noise() {
            let Some(t) = self.next_input() else { break };
            run.push(t);
        }
        if self.peek_input(0).is_none() {
            for t in run {
                self.push_demoted(t);
            }
            return;
        }
        let driver_idx = run
            .iter()
            .rposition(|t| t.kind.is_newline())
            .unwrap_or_default();
        let mut driver = None;
        for (i, t) in run.into_iter().enumerate() {
            if i == driver_idx {
                driver = Some(t);
            } else {
                // Anything after the driver would have to be a comment,
                // and comments always run to the next newline, so the
                // driver is the last element whenever the run is
                // followed by a significant token.
                self.push_demoted(t);
            }
        }
        let Some(d) = driver else { return };
        let TokenKind::NewLineIndentation(info) = d.kind else {
            return;
        };
        if self.next_is_end_ident(d.span.end) {
            let end_tok = self.take_end_ident();
            self.push_block_end(d.span.merge(end_tok.span), d.position, info);
        } else {
            self.push(
                d.span,
                d.position,
                FilterTokenKind::NewLineIndentation {
                    value: info,
                    collapsed: false,
                },
            );
        }
    }

    fn take_end_ident(&mut self) -> Token {
        self.next_input()
            .expect("peeked `end` identifier is present")
    }

    fn push_block_end(&mut self, span: Span, position: Position, info: IndentationInfo) {
        trace!(column = info.column, "block end rewrite");
        self.push(span, position, FilterTokenKind::BlockEndIdentifier(info));
    }

    // ─── Colon ──────────────────────────────────────────────────────

    /// A colon whose next non-whitespace, non-comment token is a
    /// newline opens a block.
    fn colon(&mut self, token: Token) {
        let mut mid = Vec::new();
        while matches!(
            self.peek_input(0).map(|t| &t.kind),
            Some(TokenKind::WhiteSpaceSeparator | TokenKind::CommentLiteral(_))
        ) {
            let Some(t) = self.next_input() else { break };
            mid.push(t);
        }
        let opens_block = matches!(
            self.peek_input(0).map(|t| &t.kind),
            Some(TokenKind::NewLineIndentation(_))
        );
        if opens_block {
            trace!("block start rewrite");
            self.push(token.span, token.position, FilterTokenKind::BlockStartColon);
        } else {
            self.push(token.span, token.position, FilterTokenKind::ColonSeparator);
        }
        for t in mid {
            self.push_demoted(t);
        }
    }

    // ─── Identifiers ────────────────────────────────────────────────

    fn identifier(&mut self, token: Token) {
        let TokenKind::IdentifierLiteral(decode_errors) = token.kind else {
            return;
        };
        let left_separated = self.prev_separating;
        let right_separated = match self.peek_input(0) {
            None => true,
            Some(t) => matches!(
                t.kind,
                TokenKind::NewLineIndentation(_)
                    | TokenKind::WhiteSpaceSeparator
                    | TokenKind::CommentLiteral(_)
                    | TokenKind::CommaSeparator
                    | TokenKind::SemicolonSeparator
                    | TokenKind::ColonSeparator
                    | TokenKind::BracketClose
                    | TokenKind::SquareBracketClose
            ),
        };
        self.push(
            token.span,
            token.position,
            FilterTokenKind::IdentifierLiteral {
                decode_errors,
                left_separated,
                right_separated,
            },
        );
    }

    // ─── Main step ──────────────────────────────────────────────────

    fn refill(&mut self) {
        if !self.started {
            self.started = true;
            self.start_phase();
            return;
        }
        let Some(token) = self.next_input() else {
            return;
        };
        match token.kind {
            TokenKind::NewLineIndentation(_) => self.newline_run(token),
            TokenKind::ColonSeparator => self.colon(token),
            TokenKind::IdentifierLiteral(_) => self.identifier(token),
            TokenKind::WhiteSpaceSeparator => {
                self.push(token.span, token.position, FilterTokenKind::WhiteSpaceSeparator)
            }
            TokenKind::CommentLiteral(e) => {
                self.push(token.span, token.position, FilterTokenKind::CommentLiteral(e))
            }
            TokenKind::OperatorLiteral(v) => {
                self.push(token.span, token.position, FilterTokenKind::OperatorLiteral(v))
            }
            TokenKind::StringLiteral(v) => {
                self.push(token.span, token.position, FilterTokenKind::StringLiteral(v))
            }
            TokenKind::NumberLiteral(v) => {
                self.push(token.span, token.position, FilterTokenKind::NumberLiteral(v))
            }
            TokenKind::CommaSeparator => {
                self.push(token.span, token.position, FilterTokenKind::CommaSeparator)
            }
            TokenKind::SemicolonSeparator => {
                self.push(token.span, token.position, FilterTokenKind::SemicolonSeparator)
            }
            TokenKind::SquareBracketOpen => {
                self.push(token.span, token.position, FilterTokenKind::SquareBracketOpen)
            }
            TokenKind::SquareBracketClose => {
                self.push(token.span, token.position, FilterTokenKind::SquareBracketClose)
            }
            TokenKind::BracketOpen => {
                self.push(token.span, token.position, FilterTokenKind::BracketOpen)
            }
            TokenKind::BracketClose => {
                self.push(token.span, token.position, FilterTokenKind::BracketClose)
            }
            TokenKind::InvalidEncoding => {
                self.push(token.span, token.position, FilterTokenKind::InvalidEncoding)
            }
            TokenKind::UnexpectedCharacter => {
                self.push(token.span, token.position, FilterTokenKind::UnexpectedCharacter)
            }
        }
    }
}

impl<I: Iterator<Item = Token>> Iterator for Filter<'_, I> {
    type Item = FilterToken;

    fn next(&mut self) -> Option<FilterToken> {
        loop {
            if let Some(t) = self.queue.pop_front() {
                return Some(t);
            }
            self.refill();
            if self.queue.is_empty() && self.started {
                // refill makes progress whenever input remains; an
                // empty queue here means the input is exhausted.
                if self.lookahead.is_empty() {
                    return None;
                }
            }
        }
    }
}

/// Does `kind` separate an identifier that directly follows it?
/// Open brackets separate only what follows them, close brackets only
/// what precedes them (see the right-separation check).
fn separates_following(kind: &FilterTokenKind) -> bool {
    matches!(
        kind,
        FilterTokenKind::NewLineIndentation { .. }
            | FilterTokenKind::BlockStartColon
            | FilterTokenKind::BlockEndIdentifier(_)
            | FilterTokenKind::WhiteSpaceSeparator
            | FilterTokenKind::CommentLiteral(_)
            | FilterTokenKind::CommaSeparator
            | FilterTokenKind::SemicolonSeparator
            | FilterTokenKind::ColonSeparator
            | FilterTokenKind::BracketOpen
            | FilterTokenKind::SquareBracketOpen
    )
}

#[cold]
fn unreachable_noise(kind: TokenKind) -> FilterTokenKind {
    // Only newline/whitespace/comment tokens are ever demoted; this
    // keeps the match exhaustive without panicking in release builds.
    debug_assert!(false, "demoted a non-noise token: {}", kind.name());
    FilterTokenKind::WhiteSpaceSeparator
}
