//! Staged lexical pipeline for the Rebuild language.
//!
//! Lifts the raw token stream from `rebuild_lexer_core` into the tree
//! the parser consumes, in three pull-based stages plus a reporter:
//!
//! - **[`Filter`]**: demotes noise, collapses newline runs, marks
//!   identifier separation, rewrites block starts (`: ⏎`) and block
//!   ends (`⏎ end`).
//! - **[`nesting`]**: groups filtered tokens into [`BlockLine`]s and
//!   lines into [`BlockLiteral`]s by comparing indentation columns.
//! - **[`Reporter`]**: walks the finished tree and extracts one
//!   deduplicated [`Diagnostic`](rebuild_diagnostic::Diagnostic) per
//!   aggregated error group.
//!
//! Every stage is a lazy sequence: no stage owns a thread, each
//! suspends after one token, and dropping the pipeline cancels it. All
//! spans borrow from the caller's source buffer, which must outlive the
//! pipeline and any diagnostics that quote it.
//!
//! # Usage
//!
//! ```
//! use rebuild_lexer::{lex, Reporter};
//! use rebuild_lexer_core::SourceView;
//!
//! let view = SourceView::new("demo.rebuild", b"main :\n  print\nend\n");
//! let root = lex(view);
//! assert_eq!(root.lines.len(), 1);
//!
//! let mut diagnostics: Vec<rebuild_diagnostic::Diagnostic> = Vec::new();
//! Reporter::new().report(&root, &view, &mut diagnostics);
//! assert!(diagnostics.is_empty());
//! ```

pub mod filter;
pub mod nesting;
pub mod reporter;
mod token;

use rebuild_lexer_core::{Scanner, ScannerConfig, SourceView};
use tracing::debug;

pub use filter::Filter;
pub use nesting::{
    nest, BlockLine, BlockLiteral, InsignificantKind, InsignificantToken, LineItem, Nested,
    NestedKind,
};
pub use reporter::Reporter;
pub use token::{FilterToken, FilterTokenKind};

/// Run scanner, filter and nesting over one source view.
pub fn lex(view: SourceView<'_>) -> BlockLiteral {
    lex_with_config(view, ScannerConfig::default())
}

/// [`lex`] with explicit scanner configuration (tab width).
pub fn lex_with_config(view: SourceView<'_>, config: ScannerConfig) -> BlockLiteral {
    debug!(file = view.name(), bytes = view.len(), "lexing");
    let scanner = Scanner::with_config(view, config);
    nest(Filter::new(view, scanner))
}

/// The filter stage alone, for callers that want the flat stream.
pub fn filter_tokens<'a>(view: SourceView<'a>) -> Filter<'a, Scanner<'a>> {
    Filter::new(view, Scanner::new(view))
}
