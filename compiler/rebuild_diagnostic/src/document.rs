//! The diagnostic document model.
//!
//! A diagnostic is built from plain data, not format strings: paragraphs
//! carry prose, source blocks carry already-escaped excerpt text plus
//! highlight markers whose offsets index that text. Emitters decide how
//! the pieces look on a terminal, in an IDE, or on the wire.

use crate::code::Code;

/// Byte range into the escaped text of a [`SourceCodeBlock`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct TextSpan {
    pub start: u32,
    pub length: u32,
}

impl TextSpan {
    pub fn new(start: u32, length: u32) -> Self {
        TextSpan { start, length }
    }

    pub fn end(&self) -> u32 {
        self.start + self.length
    }
}

/// One highlighted region with optional notes.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Marker {
    pub span: TextSpan,
    pub notes: Vec<String>,
}

impl Marker {
    pub fn new(span: TextSpan) -> Self {
        Marker {
            span,
            notes: Vec::new(),
        }
    }
}

/// Prose element.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub text: String,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Paragraph { text: text.into() }
    }
}

/// An escaped source excerpt with highlights.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SourceCodeBlock {
    /// Escaped excerpt text; may span several lines.
    pub text: String,
    pub highlights: Vec<Marker>,
    pub caption: String,
    /// 1-based source line of the excerpt's first line.
    pub line: u32,
}

impl SourceCodeBlock {
    pub fn new(text: impl Into<String>, highlights: Vec<Marker>, line: u32) -> Self {
        SourceCodeBlock {
            text: text.into(),
            highlights,
            caption: String::new(),
            line,
        }
    }
}

/// Ordered document element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentElement {
    Paragraph(Paragraph),
    SourceCodeBlock(SourceCodeBlock),
}

/// Ordered list of document elements.
pub type Document = Vec<DocumentElement>;

/// One titled part of a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Explanation {
    pub title: String,
    pub document: Document,
}

impl Explanation {
    pub fn new(title: impl Into<String>, document: Document) -> Self {
        Explanation {
            title: title.into(),
            document,
        }
    }
}

/// A structured, code-tagged, source-referenced explanation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: Code,
    pub parts: Vec<Explanation>,
}

impl Diagnostic {
    pub fn new(code: Code, parts: Vec<Explanation>) -> Self {
        Diagnostic { code, parts }
    }

    /// Convenience constructor for the common one-part shape: a title,
    /// one paragraph, one source block.
    pub fn explained(
        code: Code,
        title: impl Into<String>,
        paragraph: impl Into<String>,
        block: SourceCodeBlock,
    ) -> Self {
        Diagnostic {
            code,
            parts: vec![Explanation::new(
                title,
                vec![
                    DocumentElement::Paragraph(Paragraph::new(paragraph)),
                    DocumentElement::SourceCodeBlock(block),
                ],
            )],
        }
    }

    /// The source line of the first source block, for sorting.
    pub fn primary_line(&self) -> Option<u32> {
        self.parts.iter().flat_map(|p| &p.document).find_map(|e| {
            if let DocumentElement::SourceCodeBlock(block) = e {
                Some(block.line)
            } else {
                None
            }
        })
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = self.parts.first().map_or("", |p| p.title.as_str());
        write!(f, "error[{}]: {}", self.code, title)
    }
}
