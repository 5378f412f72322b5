//! Low-level tokenizer for the Rebuild language.
//!
//! This crate is the "raw" half of Rebuild's staged lexical pipeline. It
//! knows nothing about indentation blocks or diagnostics rendering:
//!
//! - **`rebuild_lexer_core`** (this crate): source view, UTF-8 decoding,
//!   and the byte-level scanner producing span-carrying tokens with
//!   per-kind error lists.
//! - **`rebuild_lexer`**: lifts the raw stream through the filter
//!   (noise demotion, separation flags, block start/end rewrites) and the
//!   nesting stage (indentation-defined block tree), and extracts
//!   diagnostics from tainted tokens.
//!
//! # Error handling
//!
//! Errors are values, not control flow. Every fallible token variant
//! carries its own error list (`StringError`, `NumberError`,
//! `OperatorError`, `IndentationError`, decode-error spans) and scanning
//! always produces a best-effort token past any error. The scanner never
//! returns `Result`.
//!
//! # Usage
//!
//! ```
//! use rebuild_lexer_core::{Scanner, SourceView, TokenKind};
//!
//! let view = SourceView::new("demo.rebuild", b"print \"hi\"");
//! let tokens: Vec<_> = Scanner::new(view).collect();
//! assert!(matches!(tokens[0].kind, TokenKind::IdentifierLiteral(_)));
//! ```

mod cursor;
mod decode;
mod scanner;
mod source_view;
mod span;
mod token;

pub use cursor::Cursor;
pub use decode::{chars, decode_one, Decoded, DecodedCodePoint, DecodedError, Utf8Decoder};
pub use scanner::{Scanner, ScannerConfig};
pub use source_view::SourceView;
pub use span::Span;
pub use token::{
    DecodeErrors, IndentationError, IndentationErrorKind, IndentationInfo, NumberError,
    NumberErrorKind, NumberValue, OperatorError, OperatorErrorKind, OperatorValue, Position, Radix,
    StringError, StringErrorKind, StringValue, Token, TokenKind,
};
