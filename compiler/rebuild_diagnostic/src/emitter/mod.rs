//! Diagnostic emitters.
//!
//! Emitters turn the structured [`Diagnostic`](crate::Diagnostic) model
//! into a concrete surface. Only the terminal emitter ships here; IDE
//! and machine-readable surfaces live with their consumers.

mod terminal;

pub use terminal::TerminalEmitter;
