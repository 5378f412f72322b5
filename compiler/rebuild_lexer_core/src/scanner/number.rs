//! Number literal scanning.
//!
//! Shape: optional radix prefix (`0x`, `0o`, `0b`), integer digits,
//! optional `.fraction`, optional `e`/`E` signed exponent (decimal
//! only), optional trailing suffix. `'` groups digits and is ignored.
//! A radix with no digits, an exponent sign with no digits, and a
//! trailing identifier run that is no recognized suffix each record an
//! error; several can attach to one token.

use crate::decode::{chars, decode_one, Decoded};
use crate::span::Span;
use crate::token::{NumberError, NumberErrorKind, NumberValue, Radix, TokenKind};

use super::Scanner;

impl Scanner<'_> {
    pub(super) fn number(&mut self) -> TokenKind {
        let start = self.cursor.pos();
        let mut errors = Vec::new();

        let radix = if self.cursor.current() == b'0' {
            match self.cursor.peek() {
                b'x' | b'X' => self.radix_prefix(Radix::Hexadecimal),
                b'o' | b'O' => self.radix_prefix(Radix::Octal),
                b'b' | b'B' => self.radix_prefix(Radix::Binary),
                _ => Radix::Decimal,
            }
        } else {
            Radix::Decimal
        };

        let integer_part = self.digit_run(radix);
        if integer_part.is_none() {
            errors.push(NumberError {
                kind: NumberErrorKind::MissingValue,
                span: Span::new(start, self.cursor.pos()),
            });
        }

        let mut fractional_part = None;
        let mut exponent_part = None;
        if radix == Radix::Decimal {
            if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
                self.cursor.advance_ascii();
                fractional_part = self.digit_run(Radix::Decimal);
            }
            if matches!(self.cursor.current(), b'e' | b'E') {
                let exponent_start = self.cursor.pos();
                if self.cursor.peek().is_ascii_digit() {
                    self.cursor.advance_ascii();
                    exponent_part = self.digit_run(Radix::Decimal);
                } else if matches!(self.cursor.peek(), b'+' | b'-') {
                    if self.cursor.peek2().is_ascii_digit() {
                        self.cursor.advance_ascii();
                        self.cursor.advance_ascii();
                        exponent_part = self.digit_run(Radix::Decimal);
                    } else {
                        // Sign without digits: consume `e` and the sign,
                        // record, and let the boundary check see what follows.
                        self.cursor.advance_ascii();
                        self.cursor.advance_ascii();
                        errors.push(NumberError {
                            kind: NumberErrorKind::MissingExponent,
                            span: Span::new(exponent_start, self.cursor.pos()),
                        });
                    }
                }
                // A bare `e` with nothing numeric after it is left for
                // the suffix run below.
            }
        }

        let suffix = self.suffix_run();
        if let Some(span) = suffix {
            errors.push(NumberError {
                kind: NumberErrorKind::MissingBoundary,
                span,
            });
        }

        TokenKind::NumberLiteral(NumberValue {
            radix,
            integer_part,
            fractional_part,
            exponent_part,
            suffix,
            errors,
        })
    }

    fn radix_prefix(&mut self, radix: Radix) -> Radix {
        self.cursor.advance_ascii(); // '0'
        self.cursor.advance_ascii(); // radix letter
        radix
    }

    /// Consume digits of `radix`, allowing `'` separators between
    /// digits. Returns the covered span, or `None` for an empty run.
    fn digit_run(&mut self, radix: Radix) -> Option<Span> {
        let is_digit = move |b: u8| match radix {
            Radix::Binary => matches!(b, b'0' | b'1'),
            Radix::Octal => matches!(b, b'0'..=b'7'),
            Radix::Decimal => b.is_ascii_digit(),
            Radix::Hexadecimal => b.is_ascii_hexdigit(),
        };
        let start = self.cursor.pos();
        loop {
            let b = self.cursor.current();
            if is_digit(b) {
                self.cursor.advance_ascii();
            } else if b == b'\'' && is_digit(self.cursor.peek()) {
                self.cursor.advance_ascii();
            } else {
                break;
            }
        }
        (self.cursor.pos() > start).then(|| Span::new(start, self.cursor.pos()))
    }

    /// Consume any trailing identifier-continue run. Undecodable bytes
    /// end the number; they become their own token.
    fn suffix_run(&mut self) -> Option<Span> {
        let start = self.cursor.pos();
        loop {
            let b = self.cursor.current();
            if b == b'_' || b.is_ascii_alphanumeric() {
                self.cursor.advance_ascii();
            } else if b >= 0x80 {
                match decode_one(self.view.as_bytes(), self.cursor.pos()) {
                    Decoded::CodePoint(d) if chars::is_ident_continue(d.ch) => {
                        self.cursor.advance_unit(d.span.len());
                    }
                    _ => break,
                }
            } else {
                break;
            }
        }
        (self.cursor.pos() > start).then(|| Span::new(start, self.cursor.pos()))
    }
}
