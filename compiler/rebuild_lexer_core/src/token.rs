//! Raw token model.
//!
//! Every token carries its exact byte [`Span`] and the [`Position`] of
//! its first byte; the payload depends on the kind. Fallible kinds carry
//! their own error lists so scanning never fails — a damaged string
//! literal is still a string literal, with errors attached.

use crate::span::Span;

/// Derived location metadata for a token's first byte.
///
/// Lines are 1-based. Columns are 1-based and count decoded code points
/// since the last line start (an undecodable run counts one). Ordering
/// is lexicographic, which coincides with byte-offset ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Position {
    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Position {
            line,
            column,
            offset,
        }
    }
}

/// Spans of maximal undecodable runs inside a token.
pub type DecodeErrors = Vec<Span>;

// ─── Indentation ────────────────────────────────────────────────────

/// Indentation measured after a line break.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct IndentationInfo {
    /// Indentation column: spaces count 1, tabs count the configured
    /// tab width. Computed after normalization, so a line that mixes
    /// tabs and spaces still has a column.
    pub column: u32,
    pub errors: Vec<IndentationError>,
}

impl IndentationInfo {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Spans of one error kind, in source order.
    pub fn spans_of(&self, kind: IndentationErrorKind) -> impl Iterator<Item = Span> + '_ {
        self.errors
            .iter()
            .filter(move |e| e.kind == kind)
            .map(|e| e.span)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndentationError {
    pub kind: IndentationErrorKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IndentationErrorKind {
    /// A whitespace byte disagreeing with the first whitespace kind of
    /// its indentation run (tab after spaces or space after tabs).
    MixedIndentCharacter,
    /// An undecodable run inside the indentation.
    DecodedErrorPosition,
}

// ─── Strings ────────────────────────────────────────────────────────

/// Decoded string literal content plus scan errors.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StringValue {
    /// The decoded text with escapes resolved. Erroneous pieces
    /// contribute nothing.
    pub text: String,
    pub errors: Vec<StringError>,
}

impl StringValue {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StringError {
    pub kind: StringErrorKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StringErrorKind {
    /// The closing quote was never found on the line.
    EndOfInput,
    /// Undecodable bytes inside the literal.
    InvalidEncoding,
    /// Unknown escape sequence.
    InvalidEscape,
    /// Raw control character; escapes are required.
    InvalidControl,
    /// Malformed `\d{…}` payload.
    InvalidDecimalUnicode,
    /// Malformed `\x`/`\u{…}` payload.
    InvalidHexUnicode,
}

impl StringErrorKind {
    /// All kinds, in reporting order.
    pub const ALL: &'static [StringErrorKind] = &[
        StringErrorKind::EndOfInput,
        StringErrorKind::InvalidEncoding,
        StringErrorKind::InvalidEscape,
        StringErrorKind::InvalidControl,
        StringErrorKind::InvalidDecimalUnicode,
        StringErrorKind::InvalidHexUnicode,
    ];
}

// ─── Numbers ────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Radix {
    Binary,
    Octal,
    #[default]
    Decimal,
    Hexadecimal,
}

impl Radix {
    pub fn value(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
            Radix::Hexadecimal => 16,
        }
    }
}

/// Structural breakdown of a number literal. Parts are spans into the
/// source; `None` marks an absent part.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct NumberValue {
    pub radix: Radix,
    pub integer_part: Option<Span>,
    pub fractional_part: Option<Span>,
    pub exponent_part: Option<Span>,
    /// Trailing identifier characters that are not a recognized suffix.
    pub suffix: Option<Span>,
    pub errors: Vec<NumberError>,
}

impl NumberValue {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NumberError {
    pub kind: NumberErrorKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NumberErrorKind {
    /// Radix prefix with no digits after it.
    MissingValue,
    /// Exponent sign with no digits after it.
    MissingExponent,
    /// The literal runs into identifier characters that are not a
    /// recognized suffix.
    MissingBoundary,
}

impl NumberErrorKind {
    pub const ALL: &'static [NumberErrorKind] = &[
        NumberErrorKind::MissingValue,
        NumberErrorKind::MissingExponent,
        NumberErrorKind::MissingBoundary,
    ];
}

// ─── Operators ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct OperatorValue {
    pub errors: Vec<OperatorError>,
}

impl OperatorValue {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OperatorError {
    pub kind: OperatorErrorKind,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperatorErrorKind {
    /// The closing sign does not match the innermost opening sign.
    WrongClose,
    /// A closing sign with no opening sign before it.
    UnexpectedClose,
    /// The run ended before an opening sign was closed.
    NotClosed,
}

impl OperatorErrorKind {
    pub const ALL: &'static [OperatorErrorKind] = &[
        OperatorErrorKind::WrongClose,
        OperatorErrorKind::UnexpectedClose,
        OperatorErrorKind::NotClosed,
    ];
}

// ─── Token ──────────────────────────────────────────────────────────

/// One raw token: exact byte span, position of the first byte, kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub span: Span,
    pub position: Position,
    pub kind: TokenKind,
}

/// Raw token kind with per-kind payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Horizontal whitespace run not following a line break.
    WhiteSpaceSeparator,
    /// A line break plus the indentation run that follows it. Also
    /// produced for indentation at the very start of the input, with a
    /// zero-length line-break part.
    NewLineIndentation(IndentationInfo),
    /// `#` through the end of the line.
    CommentLiteral(DecodeErrors),
    IdentifierLiteral(DecodeErrors),
    OperatorLiteral(OperatorValue),
    StringLiteral(StringValue),
    NumberLiteral(NumberValue),
    ColonSeparator,
    CommaSeparator,
    SemicolonSeparator,
    SquareBracketOpen,
    SquareBracketClose,
    BracketOpen,
    BracketClose,
    /// A maximal undecodable byte run outside any other token.
    InvalidEncoding,
    /// A decodable code point that fits no token class.
    UnexpectedCharacter,
}

impl TokenKind {
    /// Human-readable kind name for debugging and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::WhiteSpaceSeparator => "whitespace",
            TokenKind::NewLineIndentation(_) => "newline indentation",
            TokenKind::CommentLiteral(_) => "comment",
            TokenKind::IdentifierLiteral(_) => "identifier",
            TokenKind::OperatorLiteral(_) => "operator",
            TokenKind::StringLiteral(_) => "string literal",
            TokenKind::NumberLiteral(_) => "number literal",
            TokenKind::ColonSeparator => "`:`",
            TokenKind::CommaSeparator => "`,`",
            TokenKind::SemicolonSeparator => "`;`",
            TokenKind::SquareBracketOpen => "`[`",
            TokenKind::SquareBracketClose => "`]`",
            TokenKind::BracketOpen => "`(`",
            TokenKind::BracketClose => "`)`",
            TokenKind::InvalidEncoding => "invalid encoding",
            TokenKind::UnexpectedCharacter => "unexpected character",
        }
    }

    /// Trivia that never carries meaning for the parser: whitespace and
    /// comments. Newlines are not trivia — they drive block structure.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            TokenKind::WhiteSpaceSeparator | TokenKind::CommentLiteral(_)
        )
    }

    pub fn is_newline(&self) -> bool {
        matches!(self, TokenKind::NewLineIndentation(_))
    }
}
