use rebuild_diagnostic::{Diagnostic, DocumentElement, SourceCodeBlock, TerminalEmitter, TextSpan};
use rebuild_lexer_core::SourceView;

use super::Reporter;

fn diagnostics(src: &[u8]) -> Vec<Diagnostic> {
    let view = SourceView::new("test", src);
    let root = crate::lex(view);
    let mut out: Vec<Diagnostic> = Vec::new();
    Reporter::new().report(&root, &view, &mut out);
    out
}

fn codes(src: &[u8]) -> Vec<u16> {
    diagnostics(src).iter().map(|d| d.code.number).collect()
}

fn source_block(diagnostic: &Diagnostic) -> &SourceCodeBlock {
    diagnostic
        .parts
        .iter()
        .flat_map(|p| &p.document)
        .find_map(|e| match e {
            DocumentElement::SourceCodeBlock(b) => Some(b),
            _ => None,
        })
        .expect("diagnostic has a source block")
}

// === Clean sources ===

#[test]
fn clean_source_reports_nothing() {
    assert!(codes(b"# comment\nfoo\n").is_empty());
    assert!(codes(b"main :\n  print \"ok\"\nend\n").is_empty());
}

#[test]
fn structural_errors_are_not_lexer_diagnostics() {
    // missing end, unexpected indent, unexpected block end: all silent
    assert!(codes(b"a : \n  b\n").is_empty());
    assert!(codes(b"a\n  b\nend\n").is_empty());
}

// === Strings (scenario: unterminated) ===

#[test]
fn unterminated_string_is_code_10() {
    let diags = diagnostics(b"\"hi\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 10);
    let block = source_block(&diags[0]);
    assert_eq!(block.text, "\"hi");
    assert_eq!(block.highlights.len(), 1);
    assert_eq!(block.highlights[0].span, TextSpan::new(3, 0));
    assert_eq!(block.line, 1);
}

#[test]
fn unknown_escapes_aggregate_on_one_token() {
    let diags = diagnostics(b"\"a\\q b\\p\"\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 11);
    assert_eq!(source_block(&diags[0]).highlights.len(), 2);
}

#[test]
fn string_control_character_is_code_12() {
    assert_eq!(codes(b"\"a\x07b\"\n"), vec![12]);
}

#[test]
fn string_bad_decimal_unicode_is_code_13() {
    assert_eq!(codes(b"\"\\d{}\"\n"), vec![13]);
}

#[test]
fn string_bad_hex_unicode_is_code_14() {
    assert_eq!(codes(b"\"\\uX\"\n"), vec![14]);
}

#[test]
fn string_encoding_damage_is_code_1() {
    assert_eq!(codes(b"\"a\xFFb\"\n"), vec![1]);
}

// === Mixed indentation (scenario: one aggregated report) ===

#[test]
fn mixed_indentation_aggregates_both_lines_into_one_report() {
    let diags = diagnostics(b"\t \tx\n \t y\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 3);
    let block = source_block(&diags[0]);
    assert_eq!(block.highlights.len(), 2);
    // tabs render as visible escapes
    assert!(block.text.contains("\\t"), "got {:?}", block.text);
    assert_eq!(block.line, 1);
}

#[test]
fn single_mixed_line_reports_once() {
    let diags = diagnostics(b"a\n\t x\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 3);
    assert_eq!(source_block(&diags[0]).highlights.len(), 1);
}

// === Numbers (scenario: 0x) ===

#[test]
fn number_missing_value_is_code_21() {
    let diags = diagnostics(b"0x\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 21);
    assert_eq!(source_block(&diags[0]).text, "0x");
}

#[test]
fn number_missing_exponent_is_code_20() {
    assert_eq!(codes(b"1e+\n"), vec![20]);
}

#[test]
fn number_unknown_suffix_is_code_22() {
    assert_eq!(codes(b"10different\n"), vec![22]);
}

// === Operators ===

#[test]
fn operator_wrong_close_is_code_30() {
    assert_eq!(codes(b"{+)\n"), vec![30]);
}

#[test]
fn operator_unexpected_close_is_code_31() {
    assert_eq!(codes(b"}\n"), vec![31]);
}

#[test]
fn operator_not_closed_is_code_32() {
    assert_eq!(codes(b"+{-\n"), vec![32]);
}

// === Invalid encoding & unexpected characters ===

#[test]
fn one_decode_report_per_damaged_line() {
    assert_eq!(codes(b"a\xFF\xFFb\nc\xFF d\n"), vec![1, 1]);
}

#[test]
fn decode_errors_on_one_line_aggregate() {
    let diags = diagnostics(b"a\xFF b\xFF\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 1);
    assert_eq!(source_block(&diags[0]).highlights.len(), 2);
    // the damaged bytes render as hex escapes
    assert!(source_block(&diags[0]).text.contains("\\[ff]"));
}

#[test]
fn unexpected_characters_on_one_line_aggregate() {
    let diags = diagnostics("€ €\n".as_bytes());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 2);
    assert_eq!(source_block(&diags[0]).highlights.len(), 2);
}

// === Taint latch ===

#[test]
fn reporting_twice_is_silent_the_second_time() {
    let src = b"0x and \"broken\n";
    let view = SourceView::new("test", src);
    let root = crate::lex(view);
    let mut reporter = Reporter::new();

    let mut first: Vec<Diagnostic> = Vec::new();
    reporter.report(&root, &view, &mut first);
    assert!(!first.is_empty());

    let mut second: Vec<Diagnostic> = Vec::new();
    reporter.report(&root, &view, &mut second);
    assert!(second.is_empty(), "second run reported {second:#?}");
}

#[test]
fn fresh_reporter_reports_again() {
    let src = b"0x\n";
    let view = SourceView::new("test", src);
    let root = crate::lex(view);

    let mut first: Vec<Diagnostic> = Vec::new();
    Reporter::new().report(&root, &view, &mut first);
    let mut second: Vec<Diagnostic> = Vec::new();
    Reporter::new().report(&root, &view, &mut second);
    assert_eq!(first, second);
}

// === Nested blocks ===

#[test]
fn errors_inside_nested_blocks_are_found() {
    let diags = diagnostics(b"a:\n  0x\nend\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code.number, 21);
}

// === Rendering ===

#[test]
fn diagnostics_render_through_the_terminal_emitter() {
    let diags = diagnostics(b"\"hi\n");
    let text = TerminalEmitter::new().render(&diags[0]);
    assert!(text.contains("error[rebuild-lexer:10]"));
    assert!(text.contains("The string was not terminated."));
    assert!(text.contains("\"hi"));
}

// === Properties ===

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// One invalid-encoding diagnostic per damaged line: damage on
        /// distinct lines never merges, damage on one line never
        /// duplicates.
        #[test]
        fn one_invalid_encoding_diagnostic_per_damaged_line(
            lines in proptest::collection::vec(("[a-z]{1,8}", any::<bool>()), 1..6)
        ) {
            let mut src = Vec::new();
            let mut damaged = 0;
            for (word, damage) in &lines {
                src.extend_from_slice(word.as_bytes());
                if *damage {
                    src.push(0xFF);
                    damaged += 1;
                }
                src.push(b'\n');
            }
            let count = codes(&src).iter().filter(|&&c| c == 1).count();
            prop_assert_eq!(count, damaged);
        }

        /// The reporter never panics and reports each (excerpt, kind)
        /// group at most once per run.
        #[test]
        fn report_is_stable_on_arbitrary_text(s in "[ -~\\n\\t]{0,120}") {
            let view = SourceView::new("test", s.as_bytes());
            let root = crate::lex(view);
            let mut reporter = Reporter::new();
            let mut first: Vec<Diagnostic> = Vec::new();
            reporter.report(&root, &view, &mut first);
            let mut second: Vec<Diagnostic> = Vec::new();
            reporter.report(&root, &view, &mut second);
            prop_assert!(second.is_empty());
        }
    }
}
