//! Plain-text terminal rendering.
//!
//! Renders one diagnostic as a header line, its paragraphs, and each
//! source block with line numbers and caret underlines:
//!
//! ```text
//! error[rebuild-lexer:10]: Unexpected end of input
//!   The string was not terminated.
//!    1 | "hi
//!      |    ^
//! ```
//!
//! Marker offsets index the block's escaped text in bytes; carets are
//! placed by counting characters up to those offsets, so multi-byte
//! code points underline as one column.

use crate::document::{Diagnostic, DocumentElement, SourceCodeBlock};

/// Stateless plain-text emitter.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalEmitter;

impl TerminalEmitter {
    pub fn new() -> Self {
        TerminalEmitter
    }

    /// Render a whole diagnostic.
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        for (index, part) in diagnostic.parts.iter().enumerate() {
            if index == 0 {
                out.push_str(&format!("error[{}]: {}\n", diagnostic.code, part.title));
            } else {
                out.push_str(&format!("note: {}\n", part.title));
            }
            for element in &part.document {
                match element {
                    DocumentElement::Paragraph(p) => {
                        out.push_str("  ");
                        out.push_str(&p.text);
                        out.push('\n');
                    }
                    DocumentElement::SourceCodeBlock(block) => {
                        self.render_block(&mut out, block);
                    }
                }
            }
        }
        out
    }

    fn render_block(&self, out: &mut String, block: &SourceCodeBlock) {
        let gutter = gutter_width(block);
        if !block.caption.is_empty() {
            out.push_str(&format!("{:gutter$} ({})\n", "", block.caption));
        }
        let mut offset = 0usize;
        let mut line_no = block.line;
        for line_text in block.text.split('\n') {
            out.push_str(&format!("{line_no:>gutter$} | {line_text}\n"));
            let underline = self.underline(block, offset, line_text);
            if !underline.trim().is_empty() {
                out.push_str(&format!("{:gutter$} | {underline}\n", ""));
            }
            offset += line_text.len() + 1;
            line_no += 1;
        }
    }

    /// Caret row for one text line of the block.
    fn underline(&self, block: &SourceCodeBlock, line_start: usize, line_text: &str) -> String {
        let line_end = line_start + line_text.len();
        let mut row = String::new();
        let mut column = 0usize;
        for marker in &block.highlights {
            let start = marker.span.start as usize;
            let end = marker.span.end() as usize;
            // Clamp the marker to this line; skip non-overlapping ones.
            // Zero-length markers render one caret at their position.
            let (start, end) = if start >= line_start && start <= line_end {
                (start.max(line_start), end.min(line_end).max(start))
            } else {
                continue;
            };
            let col_start = line_text[..start - line_start].chars().count();
            let width = block.text[start..end].chars().count().max(1);
            if col_start < column {
                continue; // overlapping marker, already underlined
            }
            row.push_str(&" ".repeat(col_start - column));
            row.push_str(&"^".repeat(width));
            column = col_start + width;
        }
        row
    }
}

fn gutter_width(block: &SourceCodeBlock) -> usize {
    let last = block.line + count_newlines(&block.text);
    last.to_string().len().max(2)
}

fn count_newlines(text: &str) -> u32 {
    text.bytes().filter(|&b| b == b'\n').count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::LexerCode;
    use crate::document::{Marker, TextSpan};

    fn render(diagnostic: &Diagnostic) -> String {
        TerminalEmitter::new().render(diagnostic)
    }

    #[test]
    fn header_and_paragraph() {
        let d = Diagnostic::explained(
            LexerCode::StringUnterminated.code(),
            "Unexpected end of input",
            "The string was not terminated.",
            SourceCodeBlock::new("\"hi", vec![Marker::new(TextSpan::new(3, 0))], 1),
        );
        let text = render(&d);
        assert!(text.starts_with("error[rebuild-lexer:10]: Unexpected end of input\n"));
        assert!(text.contains("The string was not terminated."));
        assert!(text.contains(" 1 | \"hi"));
    }

    #[test]
    fn caret_under_marker() {
        let d = Diagnostic::explained(
            LexerCode::UnexpectedCharacters.code(),
            "Unexpected characters",
            "p",
            SourceCodeBlock::new("ab cd", vec![Marker::new(TextSpan::new(3, 2))], 1),
        );
        let text = render(&d);
        let caret_line = text
            .lines()
            .find(|l| l.contains('^'))
            .expect("caret row missing");
        assert!(caret_line.ends_with("   ^^"), "got {caret_line:?}");
    }

    #[test]
    fn zero_length_marker_gets_one_caret() {
        let d = Diagnostic::explained(
            LexerCode::StringUnterminated.code(),
            "t",
            "p",
            SourceCodeBlock::new("\"hi", vec![Marker::new(TextSpan::new(3, 0))], 1),
        );
        assert!(render(&d).lines().any(|l| l.trim_end().ends_with("^")));
    }

    #[test]
    fn multiline_blocks_number_lines() {
        let d = Diagnostic::explained(
            LexerCode::MixedIndentation.code(),
            "t",
            "p",
            SourceCodeBlock::new("\\t x\n \\t y", Vec::new(), 4),
        );
        let text = render(&d);
        assert!(text.contains(" 4 | "));
        assert!(text.contains(" 5 | "));
    }

    #[test]
    fn extra_parts_render_as_notes() {
        let mut d = Diagnostic::explained(
            LexerCode::InvalidEncoding.code(),
            "first",
            "p",
            SourceCodeBlock::new("x", Vec::new(), 1),
        );
        d.parts.push(crate::document::Explanation::new(
            "second",
            vec![DocumentElement::Paragraph(crate::document::Paragraph::new(
                "more",
            ))],
        ));
        let text = render(&d);
        assert!(text.contains("note: second"));
    }
}
