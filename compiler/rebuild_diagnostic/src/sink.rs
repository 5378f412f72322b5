//! Diagnostic sinks.
//!
//! Producers report through the [`Sink`] trait and never render
//! anything themselves. [`DiagnosticQueue`] is the standard collecting
//! sink: it counts, optionally caps, and hands back diagnostics sorted
//! by source line.

use crate::document::Diagnostic;

/// Receiver of diagnostics. The single entry point the pipeline needs.
pub trait Sink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Plain `Vec` collection, handy in tests.
impl Sink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Queue behavior knobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum diagnostics kept (0 = unlimited). Overflow is counted
    /// but dropped.
    pub limit: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        QueueConfig { limit: 100 }
    }
}

impl QueueConfig {
    /// No limits, for testing.
    pub fn unlimited() -> Self {
        QueueConfig { limit: 0 }
    }
}

/// Collecting sink with counting, a cap, and line-sorted output.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    reported: usize,
    config: QueueConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        DiagnosticQueue::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        DiagnosticQueue {
            diagnostics: Vec::new(),
            reported: 0,
            config,
        }
    }

    /// Total reported, including any dropped past the cap.
    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn is_empty(&self) -> bool {
        self.reported == 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the queue sorted by primary source line (stable for equal
    /// lines, so reporting order breaks ties).
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut out = std::mem::take(&mut self.diagnostics);
        out.sort_by_key(|d| d.primary_line().unwrap_or(0));
        out
    }
}

impl Sink for DiagnosticQueue {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.reported += 1;
        if self.config.limit == 0 || self.diagnostics.len() < self.config.limit {
            self.diagnostics.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::LexerCode;
    use crate::document::{Marker, SourceCodeBlock, TextSpan};

    fn diag(code: LexerCode, line: u32) -> Diagnostic {
        Diagnostic::explained(
            code.code(),
            "t",
            "p",
            SourceCodeBlock::new("x", vec![Marker::new(TextSpan::new(0, 1))], line),
        )
    }

    #[test]
    fn collects_and_counts() {
        let mut q = DiagnosticQueue::new();
        assert!(q.is_empty());
        q.report(diag(LexerCode::InvalidEncoding, 1));
        q.report(diag(LexerCode::MixedIndentation, 2));
        assert_eq!(q.reported(), 2);
        assert_eq!(q.diagnostics().len(), 2);
    }

    #[test]
    fn flush_sorts_by_line() {
        let mut q = DiagnosticQueue::new();
        q.report(diag(LexerCode::MixedIndentation, 7));
        q.report(diag(LexerCode::InvalidEncoding, 2));
        q.report(diag(LexerCode::StringUnterminated, 4));
        let lines: Vec<_> = q.flush().iter().filter_map(|d| d.primary_line()).collect();
        assert_eq!(lines, vec![2, 4, 7]);
        assert!(q.diagnostics().is_empty());
    }

    #[test]
    fn cap_drops_but_keeps_counting() {
        let mut q = DiagnosticQueue::with_config(QueueConfig { limit: 2 });
        for i in 0..5 {
            q.report(diag(LexerCode::UnexpectedCharacters, i));
        }
        assert_eq!(q.reported(), 5);
        assert_eq!(q.diagnostics().len(), 2);
    }

    #[test]
    fn vec_is_a_sink() {
        let mut v: Vec<Diagnostic> = Vec::new();
        v.report(diag(LexerCode::InvalidEncoding, 1));
        assert_eq!(v.len(), 1);
    }
}
