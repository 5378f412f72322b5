//! String literal scanning.
//!
//! Strings are `"`-delimited and single-line. Scanning does not stop at
//! the first error: it records each error with its span and recovers at
//! the closing quote, the end of the line, or the end of input. The
//! decoded text accumulates everything that decoded cleanly.

use crate::decode::decode_one;
use crate::decode::Decoded;
use crate::span::Span;
use crate::token::{StringError, StringErrorKind, StringValue, TokenKind};

use super::Scanner;

impl Scanner<'_> {
    pub(super) fn string(&mut self) -> TokenKind {
        self.cursor.advance_ascii(); // opening '"'
        let mut text = String::new();
        let mut errors = Vec::new();
        loop {
            if self.cursor.is_at_end() {
                errors.push(StringError {
                    kind: StringErrorKind::EndOfInput,
                    span: Span::point(self.cursor.pos()),
                });
                break;
            }
            match self.cursor.current() {
                b'"' => {
                    self.cursor.advance_ascii();
                    break;
                }
                // The literal never spans lines; the newline stays
                // outside the token and lexes normally.
                b'\n' | b'\r' => {
                    errors.push(StringError {
                        kind: StringErrorKind::EndOfInput,
                        span: Span::point(self.cursor.pos()),
                    });
                    break;
                }
                b'\\' => self.string_escape(&mut text, &mut errors),
                b @ 0x20..=0x7E => {
                    text.push(b as char);
                    self.cursor.advance_ascii();
                }
                b if b < 0x80 => {
                    // Raw C0 control or DEL: escapes are required.
                    errors.push(StringError {
                        kind: StringErrorKind::InvalidControl,
                        span: Span::new(self.cursor.pos(), self.cursor.pos() + 1),
                    });
                    self.cursor.advance_ascii();
                }
                _ => match decode_one(self.view.as_bytes(), self.cursor.pos()) {
                    Decoded::CodePoint(d) => {
                        if d.ch.is_control() {
                            errors.push(StringError {
                                kind: StringErrorKind::InvalidControl,
                                span: d.span,
                            });
                        } else {
                            text.push(d.ch);
                        }
                        self.cursor.advance_unit(d.span.len());
                    }
                    Decoded::Error(e) => {
                        errors.push(StringError {
                            kind: StringErrorKind::InvalidEncoding,
                            span: e.span,
                        });
                        self.cursor.advance_unit(e.span.len());
                    }
                },
            }
        }
        TokenKind::StringLiteral(StringValue { text, errors })
    }

    fn string_escape(&mut self, text: &mut String, errors: &mut Vec<StringError>) {
        let start = self.cursor.pos();
        self.cursor.advance_ascii(); // backslash
        match self.cursor.current() {
            b'n' => self.simple_escape(text, '\n'),
            b'r' => self.simple_escape(text, '\r'),
            b't' => self.simple_escape(text, '\t'),
            b'0' => self.simple_escape(text, '\0'),
            b'\\' => self.simple_escape(text, '\\'),
            b'"' => self.simple_escape(text, '"'),
            b'x' => self.hex_byte_escape(start, text, errors),
            b'u' => self.unicode_escape(start, 16, StringErrorKind::InvalidHexUnicode, text, errors),
            b'd' => self.unicode_escape(
                start,
                10,
                StringErrorKind::InvalidDecimalUnicode,
                text,
                errors,
            ),
            0 if self.cursor.is_at_end() => {
                // Dangling backslash; the loop records EndOfInput next.
                errors.push(StringError {
                    kind: StringErrorKind::InvalidEscape,
                    span: Span::new(start, self.cursor.pos()),
                });
            }
            b if b < 0x80 => {
                self.cursor.advance_ascii();
                errors.push(StringError {
                    kind: StringErrorKind::InvalidEscape,
                    span: Span::new(start, self.cursor.pos()),
                });
            }
            _ => {
                // Unknown non-ASCII escape: consume one decoded item so
                // the span names the offending character.
                match decode_one(self.view.as_bytes(), self.cursor.pos()) {
                    Decoded::CodePoint(d) => self.cursor.advance_unit(d.span.len()),
                    Decoded::Error(e) => self.cursor.advance_unit(e.span.len()),
                }
                errors.push(StringError {
                    kind: StringErrorKind::InvalidEscape,
                    span: Span::new(start, self.cursor.pos()),
                });
            }
        }
    }

    fn simple_escape(&mut self, text: &mut String, ch: char) {
        self.cursor.advance_ascii();
        text.push(ch);
    }

    /// `\xHH`: exactly two hex digits naming a code point in 0..=0xFF.
    fn hex_byte_escape(&mut self, start: u32, text: &mut String, errors: &mut Vec<StringError>) {
        self.cursor.advance_ascii(); // 'x'
        let mut value = 0u32;
        let mut digits = 0;
        while digits < 2 {
            match (self.cursor.current() as char).to_digit(16) {
                Some(d) => {
                    value = value * 16 + d;
                    self.cursor.advance_ascii();
                    digits += 1;
                }
                None => break,
            }
        }
        match (digits == 2).then(|| char::from_u32(value)).flatten() {
            Some(ch) => text.push(ch),
            None => errors.push(StringError {
                kind: StringErrorKind::InvalidHexUnicode,
                span: Span::new(start, self.cursor.pos()),
            }),
        }
    }

    /// `\u{…}` / `\d{…}`: a braced run of digits naming a code point.
    fn unicode_escape(
        &mut self,
        start: u32,
        radix: u32,
        kind: StringErrorKind,
        text: &mut String,
        errors: &mut Vec<StringError>,
    ) {
        self.cursor.advance_ascii(); // 'u' or 'd'
        if self.cursor.current() != b'{' {
            errors.push(StringError {
                kind,
                span: Span::new(start, self.cursor.pos()),
            });
            return;
        }
        self.cursor.advance_ascii();
        let mut value = 0u32;
        let mut any = false;
        while let Some(d) = (self.cursor.current() as char).to_digit(radix) {
            any = true;
            value = value.saturating_mul(radix).saturating_add(d);
            self.cursor.advance_ascii();
        }
        let closed = self.cursor.current() == b'}';
        if closed {
            self.cursor.advance_ascii();
        }
        match (any && closed).then(|| char::from_u32(value)).flatten() {
            Some(ch) => text.push(ch),
            None => errors.push(StringError {
                kind,
                span: Span::new(start, self.cursor.pos()),
            }),
        }
    }
}
