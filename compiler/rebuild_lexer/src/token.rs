//! Filtered token model.
//!
//! The filter re-expresses the raw stream without dropping bytes:
//! every raw token surfaces here, but noise is demoted rather than
//! deleted — collapsed newlines keep their indentation payload for the
//! reporter while losing line-driving force, and whitespace/comments
//! pass through as insignificants. The two rewritten variants,
//! [`FilterTokenKind::BlockStartColon`] and
//! [`FilterTokenKind::BlockEndIdentifier`], replace the raw colon and
//! `end`-identifier patterns that open and close indentation blocks.

use rebuild_lexer_core::{
    DecodeErrors, IndentationInfo, NumberValue, OperatorValue, Position, Span, StringValue,
};

/// One filtered token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterToken {
    pub span: Span,
    pub position: Position,
    pub kind: FilterTokenKind,
}

/// Filtered token kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterTokenKind {
    /// A line break with indentation. `collapsed` newlines lost their
    /// line-driving force to a later newline in the same run (or to the
    /// end of input) and nest as plain insignificants.
    NewLineIndentation {
        value: IndentationInfo,
        collapsed: bool,
    },
    /// A `:` whose line ends right after it: opens a block.
    BlockStartColon,
    /// A line-driving newline merged with the identifier `end`: closes
    /// a block. Carries the newline's indentation, which names the
    /// column of the `end` line.
    BlockEndIdentifier(IndentationInfo),

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

    WhiteSpaceSeparator,
    CommentLiteral(DecodeErrors),
    SemicolonSeparator,
    InvalidEncoding,
    UnexpectedCharacter,
}

impl FilterTokenKind {
    /// Tokens the parser consumes. Everything else is insignificant:
    /// the nesting stage routes it to `BlockLine::insignificants`.
    pub fn is_significant(&self) -> bool {
        matches!(
            self,
            FilterTokenKind::IdentifierLiteral { .. }
                | FilterTokenKind::OperatorLiteral(_)
                | FilterTokenKind::StringLiteral(_)
                | FilterTokenKind::NumberLiteral(_)
                | FilterTokenKind::ColonSeparator
                | FilterTokenKind::CommaSeparator
                | FilterTokenKind::SquareBracketOpen
                | FilterTokenKind::SquareBracketClose
                | FilterTokenKind::BracketOpen
                | FilterTokenKind::BracketClose
        )
    }

    /// `true` for a newline that still drives line structure.
    pub fn drives_line(&self) -> bool {
        matches!(
            self,
            FilterTokenKind::NewLineIndentation {
                collapsed: false,
                ..
            }
        )
    }
}

impl FilterToken {
    /// Both separation flags at once.
    pub fn is_both_separated(&self) -> bool {
        matches!(
            self.kind,
            FilterTokenKind::IdentifierLiteral {
                left_separated: true,
                right_separated: true,
                ..
            }
        )
    }
}
