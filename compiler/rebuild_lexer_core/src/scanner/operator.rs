//! Operator scanning with bracket-pair tracking.
//!
//! An operator is a maximal run over the ASCII operator alphabet plus
//! curly braces. Inside a run, `{` always opens a nesting level and
//! round/square brackets open one only at depth > 0 — at depth 0 they
//! end the run and lex as punctuation, so `a+(b` stays three tokens.
//! Closers must match the innermost opener; every offender is recorded
//! with its span in source order.

use crate::decode::chars;
use crate::span::Span;
use crate::token::{OperatorError, OperatorErrorKind, OperatorValue, TokenKind};

use super::Scanner;

fn closer_for(open: u8) -> u8 {
    match open {
        b'{' => b'}',
        b'(' => b')',
        _ => b']',
    }
}

impl Scanner<'_> {
    pub(super) fn operator(&mut self) -> TokenKind {
        let mut errors = Vec::new();
        let mut opens: Vec<(u8, u32)> = Vec::new();
        loop {
            let b = self.cursor.current();
            let at = self.cursor.pos();
            match b {
                b'{' => {
                    opens.push((b, at));
                    self.cursor.advance_ascii();
                }
                b'(' | b'[' if !opens.is_empty() => {
                    opens.push((b, at));
                    self.cursor.advance_ascii();
                }
                b'}' | b')' | b']' => match opens.last().copied() {
                    Some((open, _)) => {
                        if closer_for(open) != b {
                            errors.push(OperatorError {
                                kind: OperatorErrorKind::WrongClose,
                                span: Span::new(at, at + 1),
                            });
                        }
                        opens.pop();
                        self.cursor.advance_ascii();
                    }
                    None if b == b'}' => {
                        errors.push(OperatorError {
                            kind: OperatorErrorKind::UnexpectedClose,
                            span: Span::new(at, at + 1),
                        });
                        self.cursor.advance_ascii();
                    }
                    // `)`/`]` at depth 0 are punctuation.
                    None => break,
                },
                b if chars::is_ascii_operator(b) => self.cursor.advance_ascii(),
                _ => break,
            }
        }
        for (_, at) in opens {
            errors.push(OperatorError {
                kind: OperatorErrorKind::NotClosed,
                span: Span::new(at, at + 1),
            });
        }
        // The unclosed opens sit earlier in the source than the point
        // where the run gave up; keep markers in source order.
        errors.sort_by_key(|e| e.span.start);
        TokenKind::OperatorLiteral(OperatorValue { errors })
    }
}
