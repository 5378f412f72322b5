//! Stable diagnostic codes.
//!
//! Every diagnostic carries a `Code { group, number }`; the pair is the
//! stable identity tools key on, so numbers are never reused. All lexer
//! codes are declared in one [`define_lexer_codes!`] invocation, which
//! generates the enum, `ALL`, `number()`, `description()` and `Display`.

use std::fmt;

/// Wire identity of a diagnostic: a group label and a number unique
/// within the group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Code {
    pub group: &'static str,
    pub number: u16,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.number)
    }
}

/// Group label of all lexical diagnostics.
pub const LEXER_GROUP: &str = "rebuild-lexer";

/// Declare the lexer code catalog in one place.
///
/// Each entry is `$variant = $number, $description`. Generates the
/// `LexerCode` enum plus `ALL`, `number()`, `description()`, `code()`
/// and `Display`.
macro_rules! define_lexer_codes {
    ($( $variant:ident = $number:literal, $desc:literal );+ $(;)?) => {
        /// Catalog of stable lexer diagnostic codes.
        ///
        /// Numbering: 1–9 byte/character level, 10–19 strings,
        /// 20–29 numbers, 30–39 operators.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
        pub enum LexerCode {
            $(
                #[doc = $desc]
                $variant,
            )+
        }

        impl LexerCode {
            /// All codes, for exhaustive iteration and testing.
            pub const ALL: &'static [LexerCode] = &[ $( LexerCode::$variant, )+ ];

            /// The stable number within the lexer group.
            pub fn number(self) -> u16 {
                match self {
                    $( LexerCode::$variant => $number, )+
                }
            }

            /// One-line summary.
            pub fn description(self) -> &'static str {
                match self {
                    $( LexerCode::$variant => $desc, )+
                }
            }
        }
    };
}

define_lexer_codes! {
    InvalidEncoding = 1, "Invalid UTF-8 encoding";
    UnexpectedCharacters = 2, "Unexpected characters";
    MixedIndentation = 3, "Mixed indentation (tab and space on one line)";

    StringUnterminated = 10, "String: unterminated";
    StringUnknownEscape = 11, "String: unknown escape";
    StringInvalidControl = 12, "String: invalid control character";
    StringInvalidDecimalUnicode = 13, "String: invalid decimal unicode";
    StringInvalidHexUnicode = 14, "String: invalid hexadecimal unicode";

    NumberMissingExponent = 20, "Number: missing exponent";
    NumberMissingValue = 21, "Number: missing value after radix";
    NumberMissingBoundary = 22, "Number: missing boundary / unknown suffix";

    OperatorWrongClose = 30, "Operator: closing sign mismatches opening";
    OperatorUnexpectedClose = 31, "Operator: unexpected close";
    OperatorNotClosed = 32, "Operator: not closed";
}

impl LexerCode {
    /// The wire form used on diagnostics.
    pub fn code(self) -> Code {
        Code {
            group: LEXER_GROUP,
            number: self.number(),
        }
    }
}

impl fmt::Display for LexerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in LexerCode::ALL {
            assert!(seen.insert(code.number()), "duplicate number {}", code);
        }
    }

    #[test]
    fn stable_numbers() {
        assert_eq!(LexerCode::InvalidEncoding.number(), 1);
        assert_eq!(LexerCode::UnexpectedCharacters.number(), 2);
        assert_eq!(LexerCode::MixedIndentation.number(), 3);
        assert_eq!(LexerCode::StringUnterminated.number(), 10);
        assert_eq!(LexerCode::StringInvalidHexUnicode.number(), 14);
        assert_eq!(LexerCode::NumberMissingExponent.number(), 20);
        assert_eq!(LexerCode::NumberMissingValue.number(), 21);
        assert_eq!(LexerCode::NumberMissingBoundary.number(), 22);
        assert_eq!(LexerCode::OperatorWrongClose.number(), 30);
        assert_eq!(LexerCode::OperatorNotClosed.number(), 32);
    }

    #[test]
    fn display_includes_group() {
        assert_eq!(LexerCode::InvalidEncoding.to_string(), "rebuild-lexer:1");
        assert_eq!(
            LexerCode::StringUnterminated.code().to_string(),
            "rebuild-lexer:10"
        );
    }

    #[test]
    fn descriptions_are_nonempty() {
        for code in LexerCode::ALL {
            assert!(!code.description().is_empty());
        }
    }
}
