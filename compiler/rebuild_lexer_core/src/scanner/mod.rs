//! Hand-written byte-level scanner.
//!
//! The scanner pulls bytes through a [`Cursor`] and emits one [`Token`]
//! per `next()` call, covering the next maximal byte range. Dispatch is
//! on the current byte; each arm calls a focused method that advances
//! the cursor and returns the token kind. The token's span and position
//! are assembled by the dispatch loop itself, so every arm only worries
//! about consumption.
//!
//! Errors never stop the scanner: damaged literals come back as tokens
//! with error lists attached, undecodable bytes come back as
//! `InvalidEncoding` runs, and scanning resumes at the next byte that
//! can start a token.
//!
//! # Determinism
//!
//! Longest match wins. Where two classes could claim the same length,
//! dispatch order decides: newline/whitespace, comment, identifier,
//! number, string, punctuation, operator, then the error classes.

mod number;
mod operator;
mod string;
#[cfg(test)]
mod tests;

use crate::cursor::Cursor;
use crate::decode::{chars, decode_one, Decoded};
use crate::source_view::SourceView;
use crate::span::Span;
use crate::token::{IndentationError, IndentationErrorKind, IndentationInfo, Token, TokenKind};

/// Scanner knobs. Tab width only affects the indentation column of
/// [`IndentationInfo`]; positions always count code points.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScannerConfig {
    pub tab_width: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig { tab_width: 1 }
    }
}

/// Lazy tokenizer over one source view.
pub struct Scanner<'a> {
    view: SourceView<'a>,
    cursor: Cursor<'a>,
    config: ScannerConfig,
}

impl<'a> Scanner<'a> {
    pub fn new(view: SourceView<'a>) -> Self {
        Scanner::with_config(view, ScannerConfig::default())
    }

    pub fn with_config(view: SourceView<'a>, config: ScannerConfig) -> Self {
        Scanner {
            view,
            cursor: Cursor::new(view.as_bytes()),
            config,
        }
    }

    /// The view this scanner reads from.
    pub fn view(&self) -> SourceView<'a> {
        self.view
    }

    fn next_token(&mut self) -> Option<Token> {
        if self.cursor.is_at_end() {
            return None;
        }
        let start = self.cursor.pos();
        let position = self.cursor.position();
        let kind = match self.cursor.current() {
            b'\n' | b'\r' => self.newline_indentation(),
            // Indentation at the very start of the input has no line
            // break but still shapes the first line.
            b' ' | b'\t' if start == 0 => self.newline_indentation(),
            b' ' | b'\t' => self.whitespace(),
            b'#' => self.comment(start),
            b'"' => self.string(),
            b'0'..=b'9' => self.number(),
            b':' => self.single(TokenKind::ColonSeparator),
            b',' => self.single(TokenKind::CommaSeparator),
            b';' => self.single(TokenKind::SemicolonSeparator),
            b'(' => self.single(TokenKind::BracketOpen),
            b')' => self.single(TokenKind::BracketClose),
            b'[' => self.single(TokenKind::SquareBracketOpen),
            b']' => self.single(TokenKind::SquareBracketClose),
            b'_' | b'a'..=b'z' | b'A'..=b'Z' => self.identifier(),
            b'{' | b'}' => self.operator(),
            b if chars::is_ascii_operator(b) => self.operator(),
            _ => self.other(),
        };
        let span = Span::new(start, self.cursor.pos());
        debug_assert!(!span.is_empty(), "scanner must consume bytes per token");
        Some(Token {
            span,
            position,
            kind,
        })
    }

    // ─── Simple classes ─────────────────────────────────────────────

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance_ascii();
        kind
    }

    fn whitespace(&mut self) -> TokenKind {
        self.cursor.eat_while(chars::is_line_space);
        TokenKind::WhiteSpaceSeparator
    }

    /// One line break (`\n`, `\r`, `\r\n`, or nothing at stream start)
    /// plus the indentation run that follows. Mixing tabs and spaces
    /// records one error per byte disagreeing with the run's first
    /// whitespace kind; undecodable runs inside the indentation are
    /// consumed and recorded.
    fn newline_indentation(&mut self) -> TokenKind {
        self.cursor.advance_newline();
        let mut errors = Vec::new();
        let mut column = 0u32;
        let mut first_kind = None;
        loop {
            let b = self.cursor.current();
            if chars::is_line_space(b) {
                let expected = *first_kind.get_or_insert(b);
                if b != expected {
                    errors.push(IndentationError {
                        kind: IndentationErrorKind::MixedIndentCharacter,
                        span: Span::new(self.cursor.pos(), self.cursor.pos() + 1),
                    });
                }
                column += if b == b'\t' { self.config.tab_width } else { 1 };
                self.cursor.advance_ascii();
            } else if b >= 0x80 {
                match decode_one(self.view.as_bytes(), self.cursor.pos()) {
                    Decoded::Error(e) => {
                        errors.push(IndentationError {
                            kind: IndentationErrorKind::DecodedErrorPosition,
                            span: e.span,
                        });
                        self.cursor.advance_unit(e.span.len());
                    }
                    Decoded::CodePoint(_) => break,
                }
            } else {
                break;
            }
        }
        TokenKind::NewLineIndentation(IndentationInfo { column, errors })
    }

    fn comment(&mut self, start: u32) -> TokenKind {
        self.cursor.advance_ascii(); // '#'
        self.cursor.eat_until_newline_or_eof();
        let body = Span::new(start, self.cursor.pos());
        let decode_errors = self
            .view
            .decode(body)
            .filter_map(|d| match d {
                Decoded::Error(e) => Some(e.span),
                Decoded::CodePoint(_) => None,
            })
            .collect();
        TokenKind::CommentLiteral(decode_errors)
    }

    /// Identifier continuation, including undecodable runs which are
    /// consumed into the token and recorded. The caller guarantees the
    /// current position starts an identifier.
    fn identifier(&mut self) -> TokenKind {
        let mut decode_errors = Vec::new();
        loop {
            let b = self.cursor.current();
            if b == b'_' || b.is_ascii_alphanumeric() {
                self.cursor.advance_ascii();
            } else if b >= 0x80 {
                match decode_one(self.view.as_bytes(), self.cursor.pos()) {
                    Decoded::CodePoint(d) if chars::is_ident_continue(d.ch) => {
                        self.cursor.advance_unit(d.span.len());
                    }
                    Decoded::CodePoint(_) => break,
                    Decoded::Error(e) => {
                        decode_errors.push(e.span);
                        self.cursor.advance_unit(e.span.len());
                    }
                }
            } else {
                break;
            }
        }
        TokenKind::IdentifierLiteral(decode_errors)
    }

    /// Fallback for bytes no other class claims: a decodable code point
    /// either starts a non-ASCII identifier or is unexpected; anything
    /// else is a maximal invalid run.
    fn other(&mut self) -> TokenKind {
        match decode_one(self.view.as_bytes(), self.cursor.pos()) {
            Decoded::CodePoint(d) if chars::is_ident_start(d.ch) => self.identifier(),
            Decoded::CodePoint(d) => {
                self.cursor.advance_unit(d.span.len());
                TokenKind::UnexpectedCharacter
            }
            Decoded::Error(e) => {
                self.cursor.advance_unit(e.span.len());
                TokenKind::InvalidEncoding
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
