use crate::span::Span;
use crate::token::{
    IndentationErrorKind, NumberErrorKind, OperatorErrorKind, Radix, StringErrorKind, Token,
    TokenKind,
};
use crate::{Scanner, ScannerConfig, SourceView};

fn scan(src: &[u8]) -> Vec<Token> {
    Scanner::new(SourceView::new("test", src)).collect()
}

fn scan_str(src: &str) -> Vec<Token> {
    scan(src.as_bytes())
}

fn single(src: &str) -> Token {
    let tokens = scan_str(src);
    assert_eq!(tokens.len(), 1, "expected one token in {src:?}: {tokens:#?}");
    tokens.into_iter().next().expect("checked length")
}

// === Coverage & positions ===

#[test]
fn spans_reassemble_source() {
    let src = "foo : \n  bar # baz\n\"s\" 0x1F +{-}+\n";
    let tokens = scan_str(src);
    let mut at = 0;
    for tok in &tokens {
        assert_eq!(tok.span.start, at, "gap before {tok:?}");
        at = tok.span.end;
    }
    assert_eq!(at as usize, src.len());
}

#[test]
fn positions_are_line_column() {
    let tokens = scan_str("ab\n  cd");
    // ab, newline+indent, cd
    assert_eq!(tokens[0].position.line, 1);
    assert_eq!(tokens[0].position.column, 1);
    assert_eq!(tokens[2].position.line, 2);
    assert_eq!(tokens[2].position.column, 3);
    assert_eq!(tokens[2].position.offset, 5);
}

#[test]
fn empty_source_has_no_tokens() {
    assert!(scan(b"").is_empty());
}

// === Whitespace & newlines ===

#[test]
fn whitespace_between_tokens() {
    let tokens = scan_str("a  \t b");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[1].kind, TokenKind::WhiteSpaceSeparator));
    assert_eq!(tokens[1].span, Span::new(1, 5));
}

#[test]
fn newline_absorbs_indentation() {
    let tokens = scan_str("a\n  b");
    let TokenKind::NewLineIndentation(info) = &tokens[1].kind else {
        panic!("expected newline, got {:?}", tokens[1]);
    };
    assert_eq!(info.column, 2);
    assert!(info.errors.is_empty());
    assert_eq!(tokens[1].span, Span::new(1, 4));
}

#[test]
fn newline_variants_are_one_token() {
    for src in ["a\nb", "a\rb", "a\r\nb"] {
        let tokens = scan_str(src);
        assert_eq!(tokens.len(), 3, "{src:?}");
        assert!(tokens[1].kind.is_newline());
        assert_eq!(tokens[2].position.line, 2);
    }
}

#[test]
fn leading_indentation_forms_newline_token() {
    let tokens = scan_str("  x");
    let TokenKind::NewLineIndentation(info) = &tokens[0].kind else {
        panic!("expected stream-start indentation: {tokens:#?}");
    };
    assert_eq!(info.column, 2);
    assert_eq!(tokens[0].span, Span::new(0, 2));
    assert_eq!(tokens[0].position.line, 1);
}

#[test]
fn mixed_indentation_records_offenders() {
    // first kind is tab; the space at offset 1 disagrees
    let tokens = scan_str("\t \tx");
    let TokenKind::NewLineIndentation(info) = &tokens[0].kind else {
        panic!("expected indentation");
    };
    assert_eq!(info.column, 3);
    let mixed: Vec<_> = info
        .spans_of(IndentationErrorKind::MixedIndentCharacter)
        .collect();
    assert_eq!(mixed, vec![Span::new(1, 2)]);
}

#[test]
fn tab_width_scales_column() {
    let view = SourceView::new("test", b"\n\tx");
    let tokens: Vec<_> = Scanner::with_config(view, ScannerConfig { tab_width: 4 }).collect();
    let TokenKind::NewLineIndentation(info) = &tokens[0].kind else {
        panic!("expected newline");
    };
    assert_eq!(info.column, 4);
}

#[test]
fn invalid_bytes_inside_indentation_are_recorded() {
    let tokens = scan(b"\n \xFF\xFF x");
    let TokenKind::NewLineIndentation(info) = &tokens[0].kind else {
        panic!("expected newline");
    };
    assert_eq!(info.column, 2);
    let decode: Vec<_> = info
        .spans_of(IndentationErrorKind::DecodedErrorPosition)
        .collect();
    assert_eq!(decode, vec![Span::new(2, 4)]);
    assert_eq!(tokens[0].span, Span::new(0, 5));
}

// === Comments ===

#[test]
fn comment_runs_to_line_end() {
    let tokens = scan_str("# hello\nx");
    assert!(matches!(tokens[0].kind, TokenKind::CommentLiteral(ref e) if e.is_empty()));
    assert_eq!(tokens[0].span, Span::new(0, 7));
    assert!(tokens[1].kind.is_newline());
}

#[test]
fn comment_at_eof() {
    let tokens = scan_str("# tail");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].span, Span::new(0, 6));
}

#[test]
fn comment_collects_decode_errors_without_splitting() {
    let tokens = scan(b"# a\xFF\xFEb\nx");
    let TokenKind::CommentLiteral(errors) = &tokens[0].kind else {
        panic!("expected comment");
    };
    assert_eq!(errors.as_slice(), &[Span::new(3, 5)]);
    assert_eq!(tokens[0].span, Span::new(0, 6));
}

// === Identifiers ===

#[test]
fn ascii_identifier() {
    let tok = single("foo_bar3");
    assert!(matches!(tok.kind, TokenKind::IdentifierLiteral(ref e) if e.is_empty()));
    assert_eq!(tok.span, Span::new(0, 8));
}

#[test]
fn unicode_identifier() {
    let tok = single("héllo");
    assert!(matches!(tok.kind, TokenKind::IdentifierLiteral(_)));
    assert_eq!(tok.span.len() as usize, "héllo".len());
}

#[test]
fn identifier_swallows_interior_invalid_run() {
    let tokens = scan(b"ab\xFFcd");
    assert_eq!(tokens.len(), 1);
    let TokenKind::IdentifierLiteral(errors) = &tokens[0].kind else {
        panic!("expected identifier");
    };
    assert_eq!(errors.as_slice(), &[Span::new(2, 3)]);
    assert_eq!(tokens[0].span, Span::new(0, 5));
}

// === Numbers ===

fn number_value(src: &str) -> crate::token::NumberValue {
    match single(src).kind {
        TokenKind::NumberLiteral(v) => v,
        other => panic!("expected number, got {other:?}"),
    }
}

#[test]
fn decimal_integer() {
    let v = number_value("1234");
    assert_eq!(v.radix, Radix::Decimal);
    assert_eq!(v.integer_part, Some(Span::new(0, 4)));
    assert!(v.errors.is_empty());
}

#[test]
fn radix_prefixes() {
    assert_eq!(number_value("0x1F").radix, Radix::Hexadecimal);
    assert_eq!(number_value("0o17").radix, Radix::Octal);
    assert_eq!(number_value("0b101").radix, Radix::Binary);
    assert_eq!(number_value("0XAB").radix, Radix::Hexadecimal);
}

#[test]
fn digit_group_separators() {
    let v = number_value("1'000'000");
    assert_eq!(v.integer_part, Some(Span::new(0, 9)));
    assert!(v.errors.is_empty());
}

#[test]
fn fraction_and_exponent() {
    let v = number_value("1.5e-3");
    assert_eq!(v.integer_part, Some(Span::new(0, 1)));
    assert_eq!(v.fractional_part, Some(Span::new(2, 3)));
    assert_eq!(v.exponent_part, Some(Span::new(5, 6)));
    assert!(v.errors.is_empty());
}

#[test]
fn dot_without_digit_is_not_fraction() {
    let tokens = scan_str("1.x");
    assert_eq!(tokens.len(), 3);
    assert!(matches!(tokens[0].kind, TokenKind::NumberLiteral(_)));
    assert!(matches!(tokens[1].kind, TokenKind::OperatorLiteral(_)));
    assert!(matches!(tokens[2].kind, TokenKind::IdentifierLiteral(_)));
}

#[test]
fn missing_value_after_radix() {
    let v = number_value("0x");
    assert_eq!(v.integer_part, None);
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, NumberErrorKind::MissingValue);
}

#[test]
fn missing_exponent_after_sign() {
    let v = number_value("1e+");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, NumberErrorKind::MissingExponent);
    assert_eq!(v.errors[0].span, Span::new(1, 3));
}

#[test]
fn bare_exponent_letter_is_suffix() {
    let v = number_value("1everything");
    assert_eq!(v.suffix, Some(Span::new(1, 11)));
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, NumberErrorKind::MissingBoundary);
}

#[test]
fn several_errors_on_one_token() {
    let v = number_value("0xzz");
    let kinds: Vec<_> = v.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![NumberErrorKind::MissingValue, NumberErrorKind::MissingBoundary]
    );
}

// === Strings ===

fn string_value(src: &str) -> crate::token::StringValue {
    let tokens = scan_str(src);
    match &tokens[0].kind {
        TokenKind::StringLiteral(v) => v.clone(),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn plain_string() {
    let v = string_value("\"hello\"");
    assert_eq!(v.text, "hello");
    assert!(v.errors.is_empty());
}

#[test]
fn simple_escapes() {
    let v = string_value(r#""a\n\t\r\0\\\"b""#);
    assert_eq!(v.text, "a\n\t\r\0\\\"b");
    assert!(v.errors.is_empty());
}

#[test]
fn hex_and_unicode_escapes() {
    assert_eq!(string_value(r#""\x41""#).text, "A");
    assert_eq!(string_value(r#""\u{1F600}""#).text, "😀");
    assert_eq!(string_value(r#""\d{65}""#).text, "A");
}

#[test]
fn unterminated_string_records_end_of_input() {
    let tokens = scan_str("\"hi\n");
    let TokenKind::StringLiteral(v) = &tokens[0].kind else {
        panic!("expected string");
    };
    assert_eq!(v.text, "hi");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, StringErrorKind::EndOfInput);
    // the newline lexes on its own
    assert_eq!(tokens[0].span, Span::new(0, 3));
    assert!(tokens[1].kind.is_newline());
}

#[test]
fn unterminated_string_at_eof() {
    let v = string_value("\"hi");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, StringErrorKind::EndOfInput);
}

#[test]
fn unknown_escape_recovers() {
    let v = string_value(r#""a\qb""#);
    assert_eq!(v.text, "ab");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, StringErrorKind::InvalidEscape);
    assert_eq!(v.errors[0].span, Span::new(2, 4));
}

#[test]
fn raw_control_character_rejected() {
    let v = string_value("\"a\u{0007}b\"");
    assert_eq!(v.text, "ab");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, StringErrorKind::InvalidControl);
}

#[test]
fn invalid_encoding_inside_string() {
    let tokens = scan(b"\"a\xFFb\"");
    let TokenKind::StringLiteral(v) = &tokens[0].kind else {
        panic!("expected string");
    };
    assert_eq!(v.text, "ab");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, StringErrorKind::InvalidEncoding);
    assert_eq!(v.errors[0].span, Span::new(2, 3));
}

#[test]
fn bad_unicode_payloads() {
    assert_eq!(
        string_value(r#""\u{}""#).errors[0].kind,
        StringErrorKind::InvalidHexUnicode
    );
    assert_eq!(
        string_value(r#""\uX""#).errors[0].kind,
        StringErrorKind::InvalidHexUnicode
    );
    assert_eq!(
        string_value(r#""\d{9999999999}""#).errors[0].kind,
        StringErrorKind::InvalidDecimalUnicode
    );
    assert_eq!(
        string_value(r#""\x4""#).errors[0].kind,
        StringErrorKind::InvalidHexUnicode
    );
}

#[test]
fn scanning_continues_past_errors() {
    let v = string_value(r#""\q mid \p""#);
    let kinds: Vec<_> = v.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![StringErrorKind::InvalidEscape, StringErrorKind::InvalidEscape]
    );
    assert_eq!(v.text, " mid ");
}

// === Operators ===

fn operator_value(src: &str) -> crate::token::OperatorValue {
    match single(src).kind {
        TokenKind::OperatorLiteral(v) => v,
        other => panic!("expected operator, got {other:?}"),
    }
}

#[test]
fn maximal_operator_run() {
    assert!(operator_value("+-*/%^=<>!").errors.is_empty());
    assert!(operator_value("&&").errors.is_empty());
}

#[test]
fn braces_nest_inside_runs() {
    assert!(operator_value("{+}").errors.is_empty());
    assert!(operator_value("+{[-]}+").errors.is_empty());
}

#[test]
fn round_brackets_at_depth_zero_are_punctuation() {
    let tokens = scan_str("a+(b");
    assert_eq!(tokens.len(), 4);
    assert!(matches!(tokens[1].kind, TokenKind::OperatorLiteral(_)));
    assert_eq!(tokens[1].span, Span::new(1, 2));
    assert!(matches!(tokens[2].kind, TokenKind::BracketOpen));
}

#[test]
fn wrong_close_recorded() {
    let v = operator_value("{+)");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, OperatorErrorKind::WrongClose);
    assert_eq!(v.errors[0].span, Span::new(2, 3));
}

#[test]
fn unexpected_close_recorded() {
    let v = operator_value("}");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, OperatorErrorKind::UnexpectedClose);
}

#[test]
fn not_closed_recorded_at_the_open() {
    let v = operator_value("+{-");
    assert_eq!(v.errors.len(), 1);
    assert_eq!(v.errors[0].kind, OperatorErrorKind::NotClosed);
    assert_eq!(v.errors[0].span, Span::new(1, 2));
}

#[test]
fn offenders_in_source_order() {
    // `{` at 0 never closes; `)` at 3 closes the inner `{` wrongly.
    let v = operator_value("{+{)");
    let kinds: Vec<_> = v.errors.iter().map(|e| (e.kind, e.span.start)).collect();
    assert_eq!(
        kinds,
        vec![
            (OperatorErrorKind::NotClosed, 0),
            (OperatorErrorKind::WrongClose, 3),
        ]
    );
}

// === Punctuation ===

#[test]
fn punctuation_singles() {
    let tokens = scan_str(":,;()[]");
    let names: Vec<_> = tokens.iter().map(|t| t.kind.name()).collect();
    assert_eq!(names, vec!["`:`", "`,`", "`;`", "`(`", "`)`", "`[`", "`]`"]);
}

// === Error classes ===

#[test]
fn unexpected_character() {
    let tok = single("€");
    assert!(matches!(tok.kind, TokenKind::UnexpectedCharacter));
}

#[test]
fn control_byte_is_unexpected_character() {
    let tokens = scan(b"\x07");
    assert!(matches!(tokens[0].kind, TokenKind::UnexpectedCharacter));
}

#[test]
fn invalid_encoding_run_is_one_token() {
    let tokens = scan(b"a \xFF\xFE\x80 b");
    assert_eq!(tokens.len(), 5);
    assert!(matches!(tokens[2].kind, TokenKind::InvalidEncoding));
    assert_eq!(tokens[2].span, Span::new(2, 5));
}

// === Properties ===

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn span_coverage_on_arbitrary_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let tokens = scan(&bytes);
            let mut at = 0u32;
            for tok in &tokens {
                prop_assert_eq!(tok.span.start, at);
                prop_assert!(tok.span.end > tok.span.start);
                at = tok.span.end;
            }
            prop_assert_eq!(at as usize, bytes.len());
        }

        #[test]
        fn span_coverage_on_valid_text(s in "\\PC*") {
            let tokens = scan_str(&s);
            let mut at = 0u32;
            for tok in &tokens {
                prop_assert_eq!(tok.span.start, at);
                at = tok.span.end;
            }
            prop_assert_eq!(at as usize, s.len());
        }

        #[test]
        fn positions_monotonic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let tokens = scan(&bytes);
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].position <= pair[1].position);
            }
        }
    }
}
