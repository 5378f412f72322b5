//! Diagnostic system for rich error reporting.
//!
//! A [`Diagnostic`] is a structured, code-tagged, source-referenced
//! explanation: one stable [`Code`], one or more [`Explanation`]s, each
//! holding a [`Document`] of paragraphs and highlighted source blocks.
//! Producers hand diagnostics to a [`Sink`]; rendering is the sink's
//! business (the bundled [`TerminalEmitter`] renders plain text, IDE and
//! JSON front ends bring their own).
//!
//! The crate is standalone by design: it knows nothing about tokens or
//! blocks, only about what a human needs to see.

pub mod emitter;

mod code;
mod document;
mod sink;

pub use code::{Code, LexerCode};
pub use document::{
    Diagnostic, Document, DocumentElement, Explanation, Marker, Paragraph, SourceCodeBlock,
    TextSpan,
};
pub use emitter::TerminalEmitter;
pub use sink::{DiagnosticQueue, QueueConfig, Sink};
